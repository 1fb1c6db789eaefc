//! Create, delete, and enumerate guild channels.

use super::api::{classify_empty, classify_json, error_from_response, DiscordClient};
use super::auth::AuthHeader;
use super::error::DiscordError;
use crate::dispatch::executor::{Attempt, Operation, TransportFault};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Guilds ("servers" in the UI) are referred to by snowflake ID everywhere
/// in the API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuildId(pub String);

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A channel's snowflake ID.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Channel names as visible in the UI.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChannelName(pub String);

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The metadata we care about per channel in list and create responses.
#[derive(Clone, Debug, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: ChannelName,
}

/// <https://discord.com/developers/docs/resources/guild#create-guild-channel>
#[derive(Serialize)]
struct CreateChannelRequest<'a> {
    name: &'a ChannelName,
    /// 0 is a guild text channel.
    #[serde(rename = "type")]
    kind: u8,
}

/// Bulk channel creation against a single guild, driven by the dispatcher.
pub struct CreateChannels {
    pub client: DiscordClient,
    pub auth: AuthHeader,
    pub guild: GuildId,
}

#[async_trait]
impl Operation for CreateChannels {
    type Item = ChannelName;
    type Output = Channel;

    async fn attempt(&self, name: &ChannelName) -> Result<Attempt<Channel>, TransportFault> {
        let res = self
            .client
            .post(format!("/guilds/{}/channels", self.guild), &self.auth)
            .json(&CreateChannelRequest { name, kind: 0 })
            .send()
            .await?;

        // 201 on creation; classification only cares that it's 2xx.
        classify_json(res).await
    }

    fn describe(&self, name: &ChannelName) -> String {
        format!("create {}", name)
    }
}

/// Bulk channel deletion, driven by the dispatcher. Channels carry their
/// own IDs, so no guild is needed.
pub struct DeleteChannels {
    pub client: DiscordClient,
    pub auth: AuthHeader,
}

#[async_trait]
impl Operation for DeleteChannels {
    type Item = Channel;
    type Output = ();

    async fn attempt(&self, channel: &Channel) -> Result<Attempt<()>, TransportFault> {
        let res = self
            .client
            .delete(format!("/channels/{}", channel.id), &self.auth)
            .send()
            .await?;

        // 204 on deletion.
        classify_empty(res).await
    }

    fn describe(&self, channel: &Channel) -> String {
        format!("delete {}", channel.name)
    }
}

impl DiscordClient {
    /// Enumerate every channel in a guild.
    pub async fn list_channels(
        &self,
        guild: &GuildId,
        auth: &AuthHeader,
    ) -> Result<Vec<Channel>, DiscordError> {
        let res = self
            .get(format!("/guilds/{}/channels", guild), auth)
            .send()
            .await?;

        if res.status().is_success() {
            Ok(res.json().await?)
        } else {
            Err(error_from_response(res).await)
        }
    }
}
