//! One module per subcommand.

mod create;
mod delete;
mod invite;
mod send;

use crate::cli::{Cli, Command};
use crate::error::Failure;

pub async fn run(cli: Cli) -> Result<(), Failure> {
    match cli.command {
        Command::CreateChannels {
            token,
            guild,
            count,
            prefix,
            preset,
        } => create::run(token, guild, count, prefix, preset.policy()).await,
        Command::DeleteChannels {
            token,
            guild,
            yes,
            preset,
        } => delete::run(token, guild, yes, preset.policy()).await,
        Command::SendCommands {
            token,
            guild,
            channel,
            command,
            count,
            yes,
            preset,
        } => send::run(token, guild, channel, command, count, yes, preset.policy()).await,
        Command::Invite {
            token,
            guild,
            permissions,
            permission_bits,
        } => {
            let bits = permission_bits.unwrap_or_else(|| permissions.preset().bits());
            invite::run(token, guild, bits).await
        }
    }
}
