//! Helpers around Discord's token-based `Authorization` headers.

/// A newtype wrapper around bot tokens, as issued in the developer portal.
pub struct BotToken(pub String);

/// A newtype wrapper around user account tokens. Interactions can only be
/// issued by user accounts, not bots.
pub struct UserToken(pub String);

/// A fully-formed `Authorization` header value.
///
/// Computed once up front and threaded explicitly through every request,
/// so nothing holds hidden process-wide token state.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader(pub String);

/// Bot endpoints expect a `Bot ` prefix, which operators routinely omit
/// when pasting tokens.
///
/// ```
/// let bare = AuthHeader::from(&BotToken("abc123".into()));
/// assert_eq!(bare.0, "Bot abc123");
///
/// let prefixed = AuthHeader::from(&BotToken("Bot abc123".into()));
/// assert_eq!(prefixed.0, "Bot abc123");
/// ```
impl From<&BotToken> for AuthHeader {
    fn from(t: &BotToken) -> Self {
        let trimmed = t.0.trim();

        if trimmed.starts_with("Bot ") {
            AuthHeader(trimmed.to_owned())
        } else {
            AuthHeader(format!("Bot {}", trimmed))
        }
    }
}

/// User tokens are sent raw.
impl From<&UserToken> for AuthHeader {
    fn from(t: &UserToken) -> Self {
        AuthHeader(t.0.trim().to_owned())
    }
}
