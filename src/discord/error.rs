use std::fmt;

/// Sum type representing every way a one-off Discord API call can fail.
///
/// Calls driven through the dispatcher report per-item outcomes instead;
/// this covers the single-shot calls (listing channels, identity lookups).
#[derive(Debug)]
pub enum DiscordError {
    APIRequestFailed(reqwest::Error),
    APIResponseError { status: u16, message: Option<String> },
}

impl From<reqwest::Error> for DiscordError {
    fn from(e: reqwest::Error) -> Self {
        DiscordError::APIRequestFailed(e)
    }
}

impl fmt::Display for DiscordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            DiscordError::APIRequestFailed(e) => format!("Discord API request failed: {:?}", e),
            DiscordError::APIResponseError { status, message } => match message {
                Some(m) => format!("Discord API returned HTTP {}: {}", status, m),
                None => format!("Discord API returned HTTP {}", status),
            },
        };

        write!(f, "{}", x)
    }
}
