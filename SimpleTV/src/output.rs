//! Affichage des réponses du channel, en texte ou en JSON

use std::process::ExitCode;

use anyhow::Result;
use serde::Serialize;
use stvchannel::{ChannelResponse, EpisodeDescriptor, GroupEntry, Listing, Message, ServerEntry};

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_message(message: &Message) {
    if message.kind.is_error() {
        eprintln!("{}: {}", message.header, message.text);
    } else {
        println!("{}: {}", message.header, message.text);
    }
}

/// Code de sortie d'un message : échec pour les erreurs
pub fn exit_code(message: &Message) -> ExitCode {
    if message.kind.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_listing<T>(listing: &Listing<T>, line: impl Fn(&T) -> String) {
    println!("{}", listing.title);
    if let Some(notice) = &listing.notice {
        print_message(notice);
    }
    for item in &listing.items {
        println!("  {}", line(item));
    }
    if let Some(next) = &listing.next_page {
        println!("  {} (--page {})", next.title, next.page);
    }
}

/// Affiche une réponse et retourne le code de sortie correspondant
pub fn print_response<T: Serialize>(
    response: &ChannelResponse<T>,
    json: bool,
    line: impl Fn(&T) -> String,
) -> Result<ExitCode> {
    if json {
        print_json(response)?;
    } else {
        match response {
            ChannelResponse::Listing(listing) => print_listing(listing, line),
            ChannelResponse::Message(message) => print_message(message),
        }
    }

    Ok(match response {
        ChannelResponse::Listing(listing) => match &listing.notice {
            Some(notice) => exit_code(notice),
            None => ExitCode::SUCCESS,
        },
        ChannelResponse::Message(message) => exit_code(message),
    })
}

pub fn server_line(entry: &ServerEntry) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        entry.server.id, entry.server.name, entry.tagline, entry.server.model
    )
}

pub fn group_line(group: &GroupEntry) -> String {
    let count = group
        .episode_count
        .map(|c| c.to_string())
        .unwrap_or_else(|| "?".to_string());
    format!("{}\t{}\t{} episodes", group.id, group.title, count)
}

pub fn episode_line(episode: &EpisodeDescriptor) -> String {
    let number = match (episode.season, episode.index) {
        (Some(season), Some(index)) => format!("S{:02}E{:02}", season, index),
        _ => "-".to_string(),
    };
    let duration = episode
        .duration_ms
        .map(|ms| format!("{} min", ms / 60_000))
        .unwrap_or_else(|| "?".to_string());
    format!(
        "{}\t{}\t{}\t{}",
        episode.fields.instance_id, number, episode.title, duration
    )
}
