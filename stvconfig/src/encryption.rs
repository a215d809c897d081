//! Chiffrement des mots de passe stockés dans `config.yaml`
//!
//! Le mot de passe du compte SimpleTV est écrit chiffré (AES-256-GCM) avec une
//! clé dérivée de l'identifiant de la machine. Le fichier de configuration
//! n'est donc pas portable d'une machine à l'autre, mais le mot de passe
//! n'y apparaît jamais en clair.
//!
//! Format stocké : `encrypted:` + base64(nonce (12 octets) || ciphertext).

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};

/// Préfixe pour identifier les mots de passe chiffrés
const ENCRYPTED_PREFIX: &str = "encrypted:";

const KEY_SALT: &[u8] = b"simpletv-config-encryption-v1";
const NONCE_SALT: &[u8] = b"simpletv-nonce-v1";
const NONCE_LEN: usize = 12;

/// Lit l'identifiant de la machine
///
/// Linux : `/etc/machine-id` puis `/var/lib/dbus/machine-id`.
/// macOS : `IOPlatformUUID` via `ioreg`.
/// Windows : `wmic csproduct get UUID`.
fn machine_id() -> Result<String> {
    #[cfg(target_os = "linux")]
    {
        ["/etc/machine-id", "/var/lib/dbus/machine-id"]
            .iter()
            .filter_map(|path| std::fs::read_to_string(path).ok())
            .map(|id| id.trim().to_string())
            .find(|id| !id.is_empty())
            .ok_or_else(|| anyhow!("Failed to read machine-id"))
    }

    #[cfg(target_os = "macos")]
    {
        let output = std::process::Command::new("ioreg")
            .args(["-d2", "-c", "IOPlatformExpertDevice"])
            .output()?;
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .find(|line| line.contains("IOPlatformUUID"))
            .and_then(|line| line.split('"').nth(3))
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Failed to extract IOPlatformUUID from ioreg"))
    }

    #[cfg(target_os = "windows")]
    {
        let output = std::process::Command::new("wmic")
            .args(["csproduct", "get", "UUID"])
            .output()?;
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .nth(1)
            .map(|line| line.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| anyhow!("Failed to extract UUID from wmic"))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        Err(anyhow!("Unsupported platform for machine id extraction"))
    }
}

fn cipher() -> Result<Aes256Gcm> {
    let key = Sha256::new()
        .chain_update(machine_id()?.as_bytes())
        .chain_update(KEY_SALT)
        .finalize();
    Aes256Gcm::new_from_slice(&key).map_err(|e| anyhow!("Failed to create cipher: {}", e))
}

/// Chiffre un mot de passe avec la clé de la machine
///
/// Le nonce est dérivé du mot de passe : un même mot de passe donne toujours
/// la même valeur chiffrée, et le fichier de configuration ne change pas
/// lorsqu'on ré-enregistre des credentials identiques.
pub fn encrypt_password(password: &str) -> Result<String> {
    let digest = Sha256::new()
        .chain_update(password.as_bytes())
        .chain_update(NONCE_SALT)
        .finalize();
    let nonce_bytes = &digest[..NONCE_LEN];

    let ciphertext = cipher()?
        .encrypt(Nonce::from_slice(nonce_bytes), password.as_bytes())
        .map_err(|e| anyhow!("Encryption failed: {}", e))?;

    let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    payload.extend_from_slice(nonce_bytes);
    payload.extend_from_slice(&ciphertext);

    Ok(format!("{}{}", ENCRYPTED_PREFIX, STANDARD.encode(payload)))
}

/// Déchiffre une valeur au format `encrypted:BASE64`
///
/// # Errors
///
/// Préfixe absent, base64 invalide, payload trop court, ou clé différente
/// (fichier copié depuis une autre machine).
pub fn decrypt_password(encrypted: &str) -> Result<String> {
    let encoded = encrypted
        .strip_prefix(ENCRYPTED_PREFIX)
        .ok_or_else(|| anyhow!("Invalid encrypted password format (missing prefix)"))?;

    let payload = STANDARD
        .decode(encoded)
        .map_err(|e| anyhow!("Invalid base64: {}", e))?;

    if payload.len() < NONCE_LEN {
        return Err(anyhow!("Invalid ciphertext (too short)"));
    }
    let (nonce, ciphertext) = payload.split_at(NONCE_LEN);

    let plaintext = cipher()?
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|e| anyhow!("Decryption failed (wrong machine or corrupted data): {}", e))?;

    String::from_utf8(plaintext).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
}

/// Indique si une valeur de configuration est un mot de passe chiffré
pub fn is_encrypted(value: &str) -> bool {
    value.starts_with(ENCRYPTED_PREFIX)
}

/// Retourne le mot de passe en clair, qu'il soit stocké chiffré ou non
///
/// Les mots de passe saisis à la main dans `config.yaml` restent acceptés.
pub fn get_password(value: &str) -> Result<String> {
    if is_encrypted(value) {
        decrypt_password(value)
    } else {
        Ok(value.to_string())
    }
}
