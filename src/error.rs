use crate::discord::error::DiscordError;
use std::fmt;

/// Sum type representing every possible unexceptional fail state.
pub enum Failure {
    Discord(DiscordError),
    NoChannels,
    UnknownCommand(String),
    Cancelled,
}

impl From<DiscordError> for Failure {
    fn from(e: DiscordError) -> Self {
        Failure::Discord(e)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            Failure::Discord(e) => e.to_string(),
            Failure::NoChannels => "No channels found in the guild.".into(),
            Failure::UnknownCommand(name) => {
                format!("No registered slash command named '{}' found.", name)
            }
            Failure::Cancelled => "Cancelled.".into(),
        };

        write!(f, "{}", x)
    }
}
