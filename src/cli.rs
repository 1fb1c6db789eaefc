//! The command-line surface.
//!
//! Tokens can be supplied as flags but are normally picked up from the
//! environment (optionally via `.env`), keeping them out of shell history.

use crate::discord::application::PermissionPreset;
use crate::dispatch::policy::DispatchPolicy;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};

/// Bulk Discord guild operations over the REST API.
#[derive(Parser)]
#[command(name = "stampede", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create channels in bulk.
    CreateChannels {
        /// Bot token.
        #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
        token: String,
        /// Target guild ID.
        #[arg(long)]
        guild: String,
        /// How many channels to create.
        #[arg(long)]
        count: usize,
        /// Channel name prefix; channels are named `<prefix>-1` onward.
        #[arg(long, default_value = "ultra")]
        prefix: String,
        #[arg(long, value_enum, default_value = "fast")]
        preset: Preset,
    },
    /// Delete every channel in a guild.
    DeleteChannels {
        /// Bot token.
        #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
        token: String,
        /// Target guild ID.
        #[arg(long)]
        guild: String,
        /// Skip the interactive confirmation.
        #[arg(long)]
        yes: bool,
        #[arg(long, value_enum, default_value = "aggressive")]
        preset: Preset,
    },
    /// Replay a registered slash command many times.
    SendCommands {
        /// User account token; interactions cannot be sent with bot
        /// tokens.
        #[arg(long, env = "DISCORD_USER_TOKEN", hide_env_values = true)]
        token: String,
        /// Target guild ID.
        #[arg(long)]
        guild: String,
        /// Channel the command is accessible in.
        #[arg(long)]
        channel: String,
        /// Name of the command to replay.
        #[arg(long)]
        command: String,
        /// How many times to send it.
        #[arg(long)]
        count: usize,
        /// Skip the interactive confirmation.
        #[arg(long)]
        yes: bool,
        #[arg(long, value_enum, default_value = "fast")]
        preset: Preset,
    },
    /// Print an OAuth2 invite URL for the bot.
    Invite {
        /// Bot token.
        #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
        token: String,
        /// Pre-select a guild on the authorization page, and check
        /// whether the bot is already in it.
        #[arg(long)]
        guild: Option<String>,
        #[arg(long, value_enum, default_value = "administrator")]
        permissions: PermissionArg,
        /// Custom permission integer, overriding --permissions. Rejected
        /// outright when it doesn't parse; there is no silent fallback.
        #[arg(long)]
        permission_bits: Option<u64>,
    },
}

/// Dispatch tuning presets, replacing the old per-script hardcoded
/// variants.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Preset {
    Conservative,
    Fast,
    Aggressive,
}

impl Preset {
    pub fn policy(self) -> DispatchPolicy {
        match self {
            Preset::Conservative => DispatchPolicy::conservative(),
            Preset::Fast => DispatchPolicy::fast(),
            Preset::Aggressive => DispatchPolicy::aggressive(),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PermissionArg {
    Administrator,
    Moderator,
    Basic,
}

impl PermissionArg {
    pub fn preset(self) -> PermissionPreset {
        match self {
            PermissionArg::Administrator => PermissionPreset::Administrator,
            PermissionArg::Moderator => PermissionPreset::Moderator,
            PermissionArg::Basic => PermissionPreset::Basic,
        }
    }
}

/// One-line yes/no prompt on stdin. Anything but `y`/`yes` declines.
pub fn confirm(question: &str) -> bool {
    print!("{} (yes/no): ", question);
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }

    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}
