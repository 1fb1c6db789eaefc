//! Bulk channel creation.

use crate::discord::api::{DiscordClient, API_BASE};
use crate::discord::auth::{AuthHeader, BotToken};
use crate::discord::channel::{ChannelName, CreateChannels, GuildId};
use crate::dispatch::policy::DispatchPolicy;
use crate::dispatch::runner;
use crate::error::Failure;
use tracing::info;

/// Channel names for a run of `count`: `<prefix>-1` through
/// `<prefix>-<count>`.
fn channel_names(prefix: &str, count: usize) -> Vec<ChannelName> {
    (1..=count)
        .map(|i| ChannelName(format!("{}-{}", prefix, i)))
        .collect()
}

pub async fn run(
    token: String,
    guild: String,
    count: usize,
    prefix: String,
    policy: DispatchPolicy,
) -> Result<(), Failure> {
    let op = CreateChannels {
        client: DiscordClient::new(API_BASE.into()),
        auth: AuthHeader::from(&BotToken(token)),
        guild: GuildId(guild),
    };

    info!(
        "Creating {} channels in batches of {}",
        count, policy.batching.batch_size
    );

    let report = runner::run(&op, &channel_names(&prefix, count), &policy).await;
    println!("{}", report.render("channels"));

    Ok(())
}
