use std::process::ExitCode;

use anyhow::{Result, anyhow};
use clap::Parser;
use stvchannel::{MessageKind, SimpleTvConfigExt};
use tracing::info;

use super::Context;
use crate::output::{exit_code, print_json, print_message};

#[derive(Parser, Debug)]
pub struct LoginCommand {
    /// Account username (e-mail address)
    pub username: String,
    /// Account password
    pub password: String,
}

impl LoginCommand {
    pub async fn run(self, ctx: &mut Context) -> Result<ExitCode> {
        let message = ctx
            .channel
            .validate_credentials(&mut ctx.session, &self.username, &self.password)
            .await;

        if message.kind == MessageKind::Success {
            let credentials = ctx
                .session
                .credentials()
                .ok_or_else(|| anyhow!("Validated credentials missing from session"))?;
            ctx.config.set_simpletv_credentials(credentials)?;
            info!("Credentials saved to {}", ctx.config.file_path());
        }

        if ctx.json {
            print_json(&message)?;
        } else {
            print_message(&message);
        }
        Ok(exit_code(&message))
    }
}

#[derive(Parser, Debug)]
pub struct LogoutCommand;

impl LogoutCommand {
    pub async fn run(self, ctx: &mut Context) -> Result<ExitCode> {
        ctx.config.clear_simpletv_credentials()?;
        ctx.session.clear_credentials();
        ctx.channel.api().clear_cache();

        if ctx.json {
            print_json(&serde_json::json!({"logged_out": true}))?;
        } else {
            println!("Credentials removed from {}", ctx.config.file_path());
        }
        Ok(ExitCode::SUCCESS)
    }
}
