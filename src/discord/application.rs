//! Bot identity, application metadata, and OAuth2 invite URLs.

use super::api::{error_from_response, DiscordClient};
use super::auth::AuthHeader;
use super::channel::GuildId;
use super::error::DiscordError;
use serde::Deserialize;
use url::Url;

/// The permission bits the presets are built from, as documented at
/// <https://discord.com/developers/docs/topics/permissions>.
pub mod permissions {
    pub const ADMINISTRATOR: u64 = 1 << 3;
    pub const VIEW_AUDIT_LOG: u64 = 1 << 7;
    pub const VIEW_CHANNEL: u64 = 1 << 10;
    pub const SEND_MESSAGES: u64 = 1 << 11;
    pub const MANAGE_MESSAGES: u64 = 1 << 13;
    pub const MANAGE_ROLES: u64 = 1 << 28;
}

/// Common permission bundles for invite links.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionPreset {
    /// Full access.
    Administrator,
    /// Manage messages and roles.
    Moderator,
    /// Read and send messages.
    Basic,
}

impl PermissionPreset {
    pub fn bits(self) -> u64 {
        match self {
            PermissionPreset::Administrator => permissions::ADMINISTRATOR,
            PermissionPreset::Moderator => {
                permissions::MANAGE_MESSAGES | permissions::MANAGE_ROLES | permissions::VIEW_CHANNEL
                    | permissions::SEND_MESSAGES | permissions::VIEW_AUDIT_LOG
            }
            PermissionPreset::Basic => permissions::VIEW_CHANNEL | permissions::SEND_MESSAGES,
        }
    }
}

/// <https://discord.com/developers/docs/resources/user#get-current-user>
#[derive(Debug, Deserialize)]
pub struct BotUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(default)]
    pub bot: bool,
}

/// <https://discord.com/developers/docs/resources/application>
#[derive(Debug, Deserialize)]
pub struct Application {
    pub id: String,
    pub name: String,
}

/// The guild metadata surfaced when listing or checking membership.
#[derive(Debug, Deserialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner: bool,
    pub approximate_member_count: Option<u64>,
}

impl DiscordClient {
    /// The identity behind the supplied token.
    pub async fn bot_user(&self, auth: &AuthHeader) -> Result<BotUser, DiscordError> {
        let res = self.get("/users/@me", auth).send().await?;

        if res.status().is_success() {
            Ok(res.json().await?)
        } else {
            Err(error_from_response(res).await)
        }
    }

    /// The application owning the bot, whose ID seeds the OAuth2 URL.
    pub async fn application(&self, auth: &AuthHeader) -> Result<Application, DiscordError> {
        let res = self.get("/oauth2/applications/@me", auth).send().await?;

        if res.status().is_success() {
            Ok(res.json().await?)
        } else {
            Err(error_from_response(res).await)
        }
    }

    /// Every guild the bot is currently a member of.
    pub async fn bot_guilds(&self, auth: &AuthHeader) -> Result<Vec<Guild>, DiscordError> {
        let res = self.get("/users/@me/guilds", auth).send().await?;

        if res.status().is_success() {
            Ok(res.json().await?)
        } else {
            Err(error_from_response(res).await)
        }
    }

    /// Fetch one guild. A 403 means the bot is not in the guild or lacks
    /// access, which callers treat as a membership check failing.
    pub async fn guild(&self, id: &GuildId, auth: &AuthHeader) -> Result<Guild, DiscordError> {
        let res = self.get(format!("/guilds/{}", id), auth).send().await?;

        if res.status().is_success() {
            Ok(res.json().await?)
        } else {
            Err(error_from_response(res).await)
        }
    }
}

/// Where users authorize an application for their guilds.
const OAUTH_AUTHORIZE: &str = "https://discord.com/api/oauth2/authorize";

/// Build the OAuth2 authorization URL that invites the application, with
/// the `bot` and `applications.commands` scopes. Passing a guild
/// pre-selects it on the authorization page.
pub fn invite_url(application_id: &str, permission_bits: u64, guild: Option<&GuildId>) -> Url {
    let mut url = Url::parse(OAUTH_AUTHORIZE).expect("static URL parses");

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("client_id", application_id);
        query.append_pair("scope", "bot applications.commands");
        query.append_pair("permissions", &permission_bits.to_string());

        if let Some(g) = guild {
            query.append_pair("guild_id", &g.0);
        }
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn server() -> mockito::ServerGuard {
        mockito::Server::new_async().await
    }

    fn auth() -> AuthHeader {
        AuthHeader("Bot xyz".to_owned())
    }

    #[test]
    fn test_preset_bits() {
        assert_eq!(PermissionPreset::Administrator.bits(), 8);
        assert_eq!(PermissionPreset::Basic.bits(), 3072);
        assert!(PermissionPreset::Moderator.bits() & permissions::MANAGE_ROLES != 0);
        assert!(PermissionPreset::Moderator.bits() & permissions::ADMINISTRATOR == 0);
    }

    #[test]
    fn test_invite_url_with_guild() {
        let url = invite_url("123", 8, Some(&GuildId("42".to_owned())));

        assert_eq!(
            url.as_str(),
            "https://discord.com/api/oauth2/authorize\
             ?client_id=123\
             &scope=bot+applications.commands\
             &permissions=8\
             &guild_id=42"
        );
    }

    #[test]
    fn test_invite_url_without_guild() {
        let url = invite_url("123", 3072, None);

        assert!(!url.as_str().contains("guild_id"));
        assert!(url.as_str().contains("permissions=3072"));
    }

    #[tokio::test]
    async fn test_bot_user() {
        let mut srv = server().await;

        let mock = srv
            .mock("GET", "/users/@me")
            .match_header("authorization", "Bot xyz")
            .with_body(r#"{"id": "1", "username": "beep", "discriminator": "0", "bot": true}"#)
            .create_async()
            .await;

        let client = DiscordClient::new(srv.url());
        let user = client.bot_user(&auth()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(user.username, "beep");
        assert!(user.bot);
    }

    #[tokio::test]
    async fn test_bot_user_bad_token() {
        let mut srv = server().await;

        let mock = srv
            .mock("GET", "/users/@me")
            .with_status(401)
            .with_body(r#"{"message": "401: Unauthorized", "code": 0}"#)
            .create_async()
            .await;

        let client = DiscordClient::new(srv.url());
        let err = client.bot_user(&auth()).await.unwrap_err();

        mock.assert_async().await;
        match err {
            DiscordError::APIResponseError { status, .. } => assert_eq!(status, 401),
            other => panic!("expected response error, got {}", other),
        }
    }

    #[tokio::test]
    async fn test_guild_membership_check_403() {
        let mut srv = server().await;

        let mock = srv
            .mock("GET", "/guilds/42")
            .with_status(403)
            .with_body(r#"{"message": "Missing Access", "code": 50001}"#)
            .create_async()
            .await;

        let client = DiscordClient::new(srv.url());
        let err = client
            .guild(&GuildId("42".to_owned()), &auth())
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(
            err,
            DiscordError::APIResponseError { status: 403, .. }
        ));
    }

    #[tokio::test]
    async fn test_bot_guilds() {
        let mut srv = server().await;

        let body = r#"[
            {"id": "1", "name": "alpha", "owner": true},
            {"id": "2", "name": "beta"}
        ]"#;

        let mock = srv
            .mock("GET", "/users/@me/guilds")
            .with_body(body)
            .create_async()
            .await;

        let client = DiscordClient::new(srv.url());
        let guilds = client.bot_guilds(&auth()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(guilds.len(), 2);
        assert!(guilds[0].owner);
        assert!(!guilds[1].owner);
        assert_eq!(guilds[1].approximate_member_count, None);
    }
}
