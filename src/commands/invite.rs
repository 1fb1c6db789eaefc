//! Generate an OAuth2 invite URL, with a look at where the bot already
//! is.

use crate::discord::api::{DiscordClient, API_BASE};
use crate::discord::application::invite_url;
use crate::discord::auth::{AuthHeader, BotToken};
use crate::discord::channel::GuildId;
use crate::discord::error::DiscordError;
use crate::error::Failure;

/// How many guilds to list before eliding the rest.
const PREVIEW_LIMIT: usize = 10;

pub async fn run(token: String, guild: Option<String>, bits: u64) -> Result<(), Failure> {
    let client = DiscordClient::new(API_BASE.into());
    let auth = AuthHeader::from(&BotToken(token));

    let bot = client.bot_user(&auth).await?;
    println!(
        "{}: {}#{} ({})",
        if bot.bot { "Bot" } else { "User" },
        bot.username,
        bot.discriminator,
        bot.id
    );

    let guilds = client.bot_guilds(&auth).await?;
    if guilds.is_empty() {
        println!("Not in any guilds yet.");
    } else {
        println!("In {} guild(s):", guilds.len());
        for g in guilds.iter().take(PREVIEW_LIMIT) {
            let owner_badge = if g.owner { " (owner)" } else { "" };
            println!("  {} ({}){}", g.name, g.id, owner_badge);
        }
        if guilds.len() > PREVIEW_LIMIT {
            println!("  ... and {} more", guilds.len() - PREVIEW_LIMIT);
        }
    }

    let app = client.application(&auth).await?;
    let guild = guild.map(GuildId);

    if let Some(g) = &guild {
        match client.guild(g, &auth).await {
            Ok(info) => {
                let members = info
                    .approximate_member_count
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "N/A".to_owned());
                println!(
                    "Bot is already in {} ({}), ~{} members.",
                    info.name, info.id, members
                );
            }
            Err(DiscordError::APIResponseError { status: 403, .. }) => {
                println!("Bot is not yet in this guild.");
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!(
        "\nOAuth2 authorization URL for {}:\n{}",
        app.name,
        invite_url(&app.id, bits, guild.as_ref())
    );
    println!("\nOpen it in a browser with an account that can manage the target server.");

    Ok(())
}
