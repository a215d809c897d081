//! # stvconfig - Configuration du channel SimpleTV
//!
//! Un fichier `config.yaml` unique, fusionné au chargement avec la
//! configuration par défaut embarquée (`simpletv.yaml`). Les clés sont
//! insensibles à la casse et toute valeur peut être surchargée par une
//! variable d'environnement `SIMPLETV_CONFIG__<CLE>__<SOUS_CLE>`.
//!
//! Les réglages propres au service (compte, API, caches) ne sont pas décrits
//! ici : `stvchannel` les ajoute via un trait d'extension sur [`Config`].
//!
//! ```no_run
//! use stvconfig::get_config;
//!
//! let config = get_config();
//! let level = config.get_log_min_level()?;
//! config.set_log_enable_console(false)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context as _, Result, anyhow, bail};
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Value};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

pub mod encryption;

const DEFAULT_CONFIG: &str = include_str!("simpletv.yaml");

/// Répertoire de configuration imposé
const ENV_CONFIG_DIR: &str = "SIMPLETV_CONFIG";
/// Préfixe des surcharges, `__` séparant les niveaux
const ENV_PREFIX: &str = "SIMPLETV_CONFIG__";
const CONFIG_DIR_NAME: &str = ".simpletv";
const CONFIG_FILE_NAME: &str = "config.yaml";

const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load SimpleTV configuration"));
}

/// Accesseurs booléens avec valeur par défaut
macro_rules! bool_setting {
    ($getter:ident, $setter:ident, [$($key:literal),+], $default:expr) => {
        pub fn $getter(&self) -> Result<bool> {
            Ok(match self.get_value(&[$($key),+]) {
                Ok(Value::Bool(value)) => value,
                _ => $default,
            })
        }

        pub fn $setter(&self, value: bool) -> Result<()> {
            self.set_value(&[$($key),+], Value::Bool(value))
        }
    };
}

/// Configuration chargée et son fichier de sauvegarde
///
/// Chaque écriture via [`Config::set_value`] est aussitôt persistée.
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

impl Config {
    /// Choisit le répertoire : `directory` s'il est fourni, puis
    /// `$SIMPLETV_CONFIG`, `./.simpletv` et `~/.simpletv`.
    fn locate_dir(directory: &str) -> PathBuf {
        if !directory.is_empty() {
            return PathBuf::from(directory);
        }

        if let Ok(from_env) = env::var(ENV_CONFIG_DIR) {
            debug!(env_var = ENV_CONFIG_DIR, path = %from_env, "Config directory from environment");
            return PathBuf::from(from_env);
        }

        let candidates = std::iter::once(PathBuf::from(CONFIG_DIR_NAME))
            .chain(dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME)));
        for candidate in candidates {
            if candidate.exists() {
                return candidate;
            }
        }

        // rien n'existe encore : on crée ./.simpletv
        PathBuf::from(CONFIG_DIR_NAME)
    }

    /// Crée le répertoire si besoin et vérifie qu'on peut y lire et écrire
    fn ensure_usable(dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create config directory {}", dir.display()))?;
        if !dir.is_dir() {
            bail!("{} is not a directory", dir.display());
        }

        let probe = dir.join(".write_test");
        fs::write(&probe, b"ok")
            .with_context(|| format!("Config directory {} is not writable", dir.display()))?;
        fs::remove_file(&probe)?;
        fs::read_dir(dir)
            .with_context(|| format!("Config directory {} is not readable", dir.display()))?;
        Ok(())
    }

    /// Résout et valide le répertoire de configuration
    pub fn resolve_config_dir(directory: &str) -> Result<String> {
        let dir = Self::locate_dir(directory);
        Self::ensure_usable(&dir)?;
        Ok(dir.to_string_lossy().into_owned())
    }

    /// Charge la configuration de `directory` (vide : recherche par défaut)
    ///
    /// Défauts embarqués, puis `config.yaml` s'il existe, puis variables
    /// d'environnement. Le résultat est réécrit sur disque.
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::resolve_config_dir(directory)?;
        let path = Path::new(&config_dir)
            .join(CONFIG_FILE_NAME)
            .to_string_lossy()
            .into_owned();
        info!(config_file = %path, "Loading configuration");

        let mut merged: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;
        match fs::read_to_string(&path) {
            Ok(text) => {
                // un fichier vide donne Null, les défauts restent
                let external: Value = serde_yaml::from_str(&text)
                    .with_context(|| format!("Invalid YAML in {}", path))?;
                merge_yaml(&mut merged, &external);
            }
            Err(_) => debug!(config_file = %path, "No config file yet, using defaults"),
        }

        let mut data = lowercase_keys(merged);
        apply_env_overrides(&mut data, env::vars());

        let config = Config {
            config_dir,
            path,
            data: Mutex::new(data),
        };
        config.save()?;
        Ok(config)
    }

    pub fn directory(&self) -> &str {
        &self.config_dir
    }

    /// Chemin du `config.yaml`
    pub fn file_path(&self) -> &str {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Value>> {
        self.data
            .lock()
            .map_err(|_| anyhow!("Configuration lock poisoned"))
    }

    /// Écrit la configuration courante dans `config.yaml`
    pub fn save(&self) -> Result<()> {
        let yaml = serde_yaml::to_string(&*self.lock()?)?;
        fs::write(&self.path, yaml).with_context(|| format!("Cannot write {}", self.path))
    }

    /// Écrit `value` sous `path` (ex: `&["host", "logger", "min_level"]`) et
    /// sauvegarde. Les niveaux manquants sont créés.
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        {
            let mut data = self.lock()?;
            insert_at(&mut data, path, value)?;
        }
        self.save()
    }

    /// Lit la valeur sous `path`; erreur si le chemin n'existe pas
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.lock()?;
        let mut node: &Value = &data;
        for (depth, key) in path.iter().enumerate() {
            let Value::Mapping(map) = node else {
                bail!("{} is not a section", path[..depth].join("."));
            };
            node = map
                .get(key.to_lowercase().as_str())
                .ok_or_else(|| anyhow!("Path {} does not exist", path[..=depth].join(".")))?;
        }
        Ok(node.clone())
    }

    bool_setting!(
        get_log_enable_console,
        set_log_enable_console,
        ["host", "logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    /// Niveau de log minimum (`INFO` si absent)
    pub fn get_log_min_level(&self) -> Result<String> {
        Ok(match self.get_value(&["host", "logger", "min_level"]) {
            Ok(Value::String(level)) if !level.is_empty() => level,
            _ => DEFAULT_LOG_MIN_LEVEL.to_string(),
        })
    }

    pub fn set_log_min_level(&self, level: String) -> Result<()> {
        self.set_value(&["host", "logger", "min_level"], Value::String(level))
    }
}

/// Instance globale, chargée au premier accès
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// Insère `value` sous `path`, en créant les sections manquantes
fn insert_at(node: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let Some((first, rest)) = path.split_first() else {
        *node = value;
        return Ok(());
    };

    // une section vide (null) devient une map à la première écriture
    if node.is_null() {
        *node = Value::Mapping(Mapping::new());
    }
    let Value::Mapping(map) = node else {
        bail!("Cannot set {}: parent is not a section", first);
    };

    let key = Value::String(first.to_lowercase());
    if rest.is_empty() {
        map.insert(key, value);
        Ok(())
    } else {
        let child = map.entry(key).or_insert(Value::Null);
        insert_at(child, rest, value)
    }
}

/// Fusionne `external` dans `default` : les sections sont fusionnées
/// récursivement, les scalaires et listes remplacés. Null ne change rien.
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (_, Value::Null) => {}
        (Value::Mapping(target), Value::Mapping(source)) => {
            for (key, value) in source {
                match target.get_mut(key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, value) => *target = value.clone(),
    }
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, value)| {
                    let key = match key {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    (key, lowercase_keys(value))
                })
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// `SIMPLETV_CONFIG__A__B=v` écrit `v` sous `a.b`
fn apply_env_overrides(data: &mut Value, vars: impl Iterator<Item = (String, String)>) {
    for (name, raw) in vars {
        let Some(suffix) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let path: Vec<&str> = suffix.split("__").filter(|part| !part.is_empty()).collect();
        if path.is_empty() {
            continue;
        }
        debug!(var = %name, "Applying environment override");
        if let Err(e) = insert_at(data, &path, env_value(&raw)) {
            debug!(var = %name, "Ignoring environment override: {}", e);
        }
    }
}

/// Valeur YAML d'une variable d'environnement : `42` est un nombre,
/// `true` un booléen, le reste une chaîne
fn env_value(raw: &str) -> Value {
    serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        (dir, config)
    }

    #[test]
    fn test_load_writes_defaults() {
        let (dir, config) = temp_config();
        assert!(dir.path().join("config.yaml").exists());
        assert_eq!(config.get_log_min_level().unwrap(), "INFO");
        assert!(config.get_log_enable_console().unwrap());
        assert_eq!(
            config.get_value(&["simpletv", "api", "cache_ttl_secs"]).unwrap(),
            Value::Number(300.into())
        );
    }

    #[test]
    fn test_set_value_persists() {
        let (dir, config) = temp_config();
        config
            .set_value(&["Accounts", "SimpleTV", "Username"], Value::String("bob".into()))
            .unwrap();

        let reloaded = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(
            reloaded
                .get_value(&["accounts", "simpletv", "username"])
                .unwrap(),
            Value::String("bob".into())
        );
    }

    #[test]
    fn test_set_value_creates_sections() {
        let (_dir, config) = temp_config();
        config
            .set_value(&["extra", "nested", "flag"], Value::Bool(true))
            .unwrap();
        assert_eq!(
            config.get_value(&["extra", "nested", "flag"]).unwrap(),
            Value::Bool(true)
        );
        assert!(
            config
                .set_value(&["host", "logger", "min_level", "deeper"], Value::Null)
                .is_err()
        );
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let (_dir, config) = temp_config();
        assert!(config.get_value(&["nope", "missing"]).is_err());
        assert!(config.get_value(&["host", "logger", "min_level", "x"]).is_err());
    }

    #[test]
    fn test_external_file_is_merged_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "host:\n  logger:\n    min_level: DEBUG\n",
        )
        .unwrap();

        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config.get_log_min_level().unwrap(), "DEBUG");
        assert_eq!(
            config.get_value(&["host", "logger", "enable_console"]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_empty_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.yaml"), "").unwrap();

        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config.get_log_min_level().unwrap(), "INFO");
    }

    #[test]
    fn test_merge_yaml_replaces_scalars() {
        let mut default: Value = serde_yaml::from_str("a: 1\nb:\n  c: 2\n").unwrap();
        let external: Value = serde_yaml::from_str("b:\n  c: 3\n  d: 4\n").unwrap();
        merge_yaml(&mut default, &external);

        let expected: Value = serde_yaml::from_str("a: 1\nb:\n  c: 3\n  d: 4\n").unwrap();
        assert_eq!(default, expected);
    }

    #[test]
    fn test_lowercase_keys() {
        let value: Value = serde_yaml::from_str("Host:\n  Logger:\n    Min_Level: WARN\n").unwrap();
        let expected: Value = serde_yaml::from_str("host:\n  logger:\n    min_level: WARN\n").unwrap();
        assert_eq!(lowercase_keys(value), expected);
    }

    #[test]
    fn test_env_overrides() {
        let mut data: Value = serde_yaml::from_str(DEFAULT_CONFIG).unwrap();
        let vars = vec![
            ("SIMPLETV_CONFIG__simpletv__api__ping_timeout_secs".to_string(), "2".to_string()),
            ("SIMPLETV_CONFIG__host__logger__min_level".to_string(), "debug".to_string()),
            ("SIMPLETV_CONFIG".to_string(), "/somewhere".to_string()),
            ("PATH".to_string(), "/usr/bin".to_string()),
        ];
        apply_env_overrides(&mut data, vars.into_iter());

        assert_eq!(data["simpletv"]["api"]["ping_timeout_secs"], Value::Number(2.into()));
        assert_eq!(data["host"]["logger"]["min_level"], Value::String("debug".into()));
    }

    #[test]
    fn test_env_value() {
        assert_eq!(env_value("42"), Value::Number(42.into()));
        assert_eq!(env_value("true"), Value::Bool(true));
        assert_eq!(
            env_value("https://example.com"),
            Value::String("https://example.com".into())
        );
    }
}
