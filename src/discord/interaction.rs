//! Search for registered application commands and replay them as
//! interactions, shaped the way the first-party client issues them.

use super::api::{classify_empty, error_from_response, DiscordClient};
use super::auth::AuthHeader;
use super::channel::{ChannelId, GuildId};
use super::error::DiscordError;
use crate::dispatch::executor::{Attempt, Operation, TransportFault};
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A registered chat-input command, as returned by the search endpoint.
///
/// Only the fields the replayer interprets are named; everything else is
/// captured in `extra` and echoed back verbatim in the interaction
/// payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApplicationCommand {
    pub id: String,
    pub application_id: String,
    pub version: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub options: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// <https://discord.com/developers/docs/interactions/application-commands>
#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    application_commands: Vec<ApplicationCommand>,
}

/// The `data` block of an application-command interaction: the command
/// identity plus the full command definition, as the first-party client
/// sends it.
#[derive(Clone, Debug, Serialize)]
pub struct CommandData {
    version: String,
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: u8,
    options: Vec<serde_json::Value>,
    application_command: ApplicationCommand,
}

impl CommandData {
    pub fn from_command(cmd: ApplicationCommand) -> Self {
        CommandData {
            version: cmd.version.clone(),
            id: cmd.id.clone(),
            name: cmd.name.clone(),
            // 1 is CHAT_INPUT.
            kind: 1,
            options: Vec::new(),
            application_command: cmd,
        }
    }

    pub fn application_id(&self) -> &str {
        &self.application_command.application_id
    }
}

/// The top-level interaction payload.
#[derive(Serialize)]
struct InteractionRequest<'a> {
    /// 2 is APPLICATION_COMMAND.
    #[serde(rename = "type")]
    kind: u8,
    application_id: &'a str,
    guild_id: &'a GuildId,
    channel_id: &'a ChannelId,
    session_id: String,
    data: &'a CommandData,
    nonce: String,
}

/// Unique-enough nonce: millisecond timestamp plus a six-digit random
/// suffix, staying within the client's safe-integer range.
pub fn nonce() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);

    format!("{}{:06}", millis, suffix)
}

/// Repeated sends of one prepared command, driven by the dispatcher. The
/// item is the 1-based send sequence number; each attempt carries a fresh
/// nonce.
pub struct SendCommands {
    pub client: DiscordClient,
    pub auth: AuthHeader,
    pub guild: GuildId,
    pub channel: ChannelId,
    pub data: CommandData,
}

#[async_trait]
impl Operation for SendCommands {
    type Item = usize;
    type Output = ();

    async fn attempt(&self, _: &usize) -> Result<Attempt<()>, TransportFault> {
        let res = self
            .client
            .post("/interactions", &self.auth)
            .json(&InteractionRequest {
                kind: 2,
                application_id: self.data.application_id(),
                guild_id: &self.guild,
                channel_id: &self.channel,
                session_id: nonce(),
                data: &self.data,
                nonce: nonce(),
            })
            .send()
            .await?;

        classify_empty(res).await
    }

    fn describe(&self, item: &usize) -> String {
        format!("command #{}", item)
    }
}

impl DiscordClient {
    /// Search the chat-input commands usable in a channel, optionally
    /// filtered by name prefix.
    pub async fn search_commands(
        &self,
        channel: &ChannelId,
        query: Option<&str>,
        auth: &AuthHeader,
    ) -> Result<Vec<ApplicationCommand>, DiscordError> {
        let mut req = self
            .get(
                format!("/channels/{}/application-commands/search", channel),
                auth,
            )
            .query(&[("type", "1"), ("limit", "25")]);

        if let Some(q) = query {
            req = req.query(&[("query", q)]);
        }

        let res = req.send().await?;

        if res.status().is_success() {
            let body: SearchResponse = res.json().await?;
            Ok(body.application_commands)
        } else {
            Err(error_from_response(res).await)
        }
    }
}
