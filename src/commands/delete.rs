//! Bulk channel deletion, behind a confirmation step.

use crate::cli::confirm;
use crate::discord::api::{DiscordClient, API_BASE};
use crate::discord::auth::{AuthHeader, BotToken};
use crate::discord::channel::{DeleteChannels, GuildId};
use crate::dispatch::policy::DispatchPolicy;
use crate::dispatch::runner;
use crate::error::Failure;
use tracing::info;

/// How many channels to preview before eliding the rest.
const PREVIEW_LIMIT: usize = 10;

pub async fn run(
    token: String,
    guild: String,
    yes: bool,
    policy: DispatchPolicy,
) -> Result<(), Failure> {
    let client = DiscordClient::new(API_BASE.into());
    let auth = AuthHeader::from(&BotToken(token));
    let guild = GuildId(guild);

    info!("Fetching channels");
    let channels = client.list_channels(&guild, &auth).await?;

    if channels.is_empty() {
        return Err(Failure::NoChannels);
    }

    println!("Found {} channels.", channels.len());
    for channel in channels.iter().take(PREVIEW_LIMIT) {
        println!("  {} ({})", channel.name, channel.id);
    }
    if channels.len() > PREVIEW_LIMIT {
        println!("  ... and {} more", channels.len() - PREVIEW_LIMIT);
    }

    if !yes && !confirm(&format!("Delete ALL {} channels?", channels.len())) {
        return Err(Failure::Cancelled);
    }

    let op = DeleteChannels { client, auth };
    let report = runner::run(&op, &channels, &policy).await;
    println!("{}", report.render("channels"));

    Ok(())
}
