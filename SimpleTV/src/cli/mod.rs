use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use stvchannel::{Session, SimpleTvChannel};
use stvconfig::Config;

mod account;
mod browse;

pub use account::{LoginCommand, LogoutCommand};
pub use browse::{EpisodesCommand, GroupsCommand, PlayCommand, ServersCommand};

#[derive(Parser, Debug)]
#[command(name = "simpletv")]
#[command(about = "Browse and play recordings of Simple.TV DVRs")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct GlobalOptions {
    /// Configuration directory (defaults to $SIMPLETV_CONFIG, ./.simpletv, ~/.simpletv)
    #[arg(long, global = true, value_name = "DIR")]
    pub config: Option<String>,

    /// Print responses as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check and store the account credentials
    Login(LoginCommand),
    /// Forget the stored credentials
    Logout(LogoutCommand),
    /// List the media servers of the account
    Servers(ServersCommand),
    /// List the recorded shows of a media server
    Groups(GroupsCommand),
    /// List the recorded episodes of a show
    Episodes(EpisodesCommand),
    /// Resolve the stream URL of a recorded episode
    Play(PlayCommand),
}

/// Ce dont chaque commande a besoin : configuration, channel et session
pub struct Context {
    pub config: Arc<Config>,
    pub channel: SimpleTvChannel,
    pub session: Session,
    pub json: bool,
}

impl Context {
    fn load(options: &GlobalOptions) -> Result<Self> {
        let config = match options.config.as_deref() {
            Some(directory) => Arc::new(Config::load_config(directory)?),
            None => stvconfig::get_config(),
        };
        crate::logs::init_logging(&config);

        let channel = SimpleTvChannel::from_config(&config)?;
        let session = Session::from_config(&config)?;

        Ok(Self {
            config,
            channel,
            session,
            json: options.json,
        })
    }
}

impl Args {
    pub async fn run(self) -> Result<ExitCode> {
        let mut ctx = Context::load(&self.global)?;

        match self.command {
            Command::Login(cmd) => cmd.run(&mut ctx).await,
            Command::Logout(cmd) => cmd.run(&mut ctx).await,
            Command::Servers(cmd) => cmd.run(&mut ctx).await,
            Command::Groups(cmd) => cmd.run(&mut ctx).await,
            Command::Episodes(cmd) => cmd.run(&mut ctx).await,
            Command::Play(cmd) => cmd.run(&mut ctx).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_episodes() {
        let args = Args::parse_from([
            "simpletv", "--json", "episodes", "s1", "g1", "--name", "News", "--page", "2",
        ]);
        assert!(args.global.json);
        match args.command {
            Command::Episodes(cmd) => {
                assert_eq!(cmd.server, "s1");
                assert_eq!(cmd.group, "g1");
                assert_eq!(cmd.name.as_deref(), Some("News"));
                assert_eq!(cmd.page, 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["simpletv", "groups", "s1", "--config", "/tmp/stv"]);
        assert_eq!(args.global.config.as_deref(), Some("/tmp/stv"));
        match args.command {
            Command::Groups(cmd) => assert_eq!(cmd.page, 1),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
