//! Replay a slash command at speed, e.g. to exercise a bot's own
//! rate-limit handling.

use crate::cli::confirm;
use crate::discord::api::{DiscordClient, API_BASE};
use crate::discord::auth::{AuthHeader, UserToken};
use crate::discord::channel::{ChannelId, GuildId};
use crate::discord::interaction::{CommandData, SendCommands};
use crate::dispatch::policy::DispatchPolicy;
use crate::dispatch::runner;
use crate::error::Failure;
use tracing::info;

pub async fn run(
    token: String,
    guild: String,
    channel: String,
    command: String,
    count: usize,
    yes: bool,
    policy: DispatchPolicy,
) -> Result<(), Failure> {
    let client = DiscordClient::new(API_BASE.into());
    let auth = AuthHeader::from(&UserToken(token));
    let channel = ChannelId(channel);

    info!("Searching for /{}", command);
    let commands = client
        .search_commands(&channel, Some(&command), &auth)
        .await?;

    let cmd = commands
        .into_iter()
        .find(|c| c.name == command)
        .ok_or(Failure::UnknownCommand(command))?;

    println!("Selected /{}: {}", cmd.name, cmd.description);

    if !yes && !confirm(&format!("Send /{} {} times?", cmd.name, count)) {
        return Err(Failure::Cancelled);
    }

    let op = SendCommands {
        client,
        auth,
        guild: GuildId(guild),
        channel,
        data: CommandData::from_command(cmd),
    };

    let items: Vec<usize> = (1..=count).collect();
    let report = runner::run(&op, &items, &policy).await;
    println!("{}", report.render("commands"));

    Ok(())
}
