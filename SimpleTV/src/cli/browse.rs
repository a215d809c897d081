use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Parser;
use stvchannel::{ChannelResponse, resolve_episode};

use super::Context;
use crate::output::{
    episode_line, exit_code, group_line, print_json, print_message, print_response, server_line,
};

/// Charge la table des serveurs de la session.
///
/// Retourne un code d'échec si le listing s'est terminé en erreur, ou s'il
/// ne porte qu'une notice d'erreur (credentials absents).
async fn load_servers(ctx: &mut Context) -> Result<Option<ExitCode>> {
    let response = ctx.channel.main_menu(&mut ctx.session).await;
    let Some(failure) = response.failure() else {
        return Ok(None);
    };
    if ctx.json {
        print_json(failure)?;
    } else {
        print_message(failure);
    }
    Ok(Some(exit_code(failure)))
}

#[derive(Parser, Debug)]
pub struct ServersCommand;

impl ServersCommand {
    pub async fn run(self, ctx: &mut Context) -> Result<ExitCode> {
        let response = ctx.channel.main_menu(&mut ctx.session).await;
        print_response(&response, ctx.json, server_line)
    }
}

#[derive(Parser, Debug)]
pub struct GroupsCommand {
    /// Media server id
    pub server: String,
    /// Page number (50 shows per page)
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

impl GroupsCommand {
    pub async fn run(self, ctx: &mut Context) -> Result<ExitCode> {
        if let Some(code) = load_servers(ctx).await? {
            return Ok(code);
        }
        let response = ctx
            .channel
            .library_groups(&ctx.session, &self.server, self.page)
            .await;
        print_response(&response, ctx.json, group_line)
    }
}

#[derive(Parser, Debug)]
pub struct EpisodesCommand {
    /// Media server id
    pub server: String,
    /// Show (group) id
    pub group: String,
    /// Show name used as the listing title (defaults to the group id)
    #[arg(long)]
    pub name: Option<String>,
    /// Page number (50 episodes per page)
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

impl EpisodesCommand {
    pub async fn run(self, ctx: &mut Context) -> Result<ExitCode> {
        if let Some(code) = load_servers(ctx).await? {
            return Ok(code);
        }
        let name = self.name.as_deref().unwrap_or(&self.group);
        let response = ctx
            .channel
            .group_episodes(&ctx.session, &self.server, &self.group, name, self.page)
            .await;
        print_response(&response, ctx.json, episode_line)
    }
}

#[derive(Parser, Debug)]
pub struct PlayCommand {
    /// Media server id
    pub server: String,
    /// Show (group) id
    pub group: String,
    /// Episode instance id
    pub instance: String,
    /// Page of the episode listing holding the instance
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

impl PlayCommand {
    pub async fn run(self, ctx: &mut Context) -> Result<ExitCode> {
        if let Some(code) = load_servers(ctx).await? {
            return Ok(code);
        }

        let response = ctx
            .channel
            .group_episodes(&ctx.session, &self.server, &self.group, &self.group, self.page)
            .await;

        let listing = match response {
            ChannelResponse::Listing(listing) => listing,
            ChannelResponse::Message(message) => {
                if ctx.json {
                    print_json(&message)?;
                } else {
                    print_message(&message);
                }
                return Ok(exit_code(&message));
            }
        };

        let Some(descriptor) = listing
            .items
            .iter()
            .find(|episode| episode.fields.instance_id == self.instance)
        else {
            bail!(
                "Instance {} not found on page {} of group {}",
                self.instance,
                self.page,
                self.group
            );
        };

        let item = resolve_episode(descriptor);
        if ctx.json {
            print_json(&item)?;
        } else if let Some(url) = item.stream_url() {
            println!("{}", url);
        }
        Ok(ExitCode::SUCCESS)
    }
}
