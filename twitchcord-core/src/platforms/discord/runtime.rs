use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};
use twilight_gateway::{
    self as gateway, CloseFrame, ConfigBuilder, Event, EventTypeFlags, Intents, MessageSender, Shard, StreamExt,
};
use twilight_http::Client as HttpClient;
use twilight_http::client::{ClientBuilder, InteractionClient};
use twilight_model::application::interaction::Interaction;
use twilight_model::channel::message::MessageFlags;
use twilight_model::gateway::payload::outgoing::update_presence::UpdatePresencePayload;
use twilight_model::gateway::presence::{ActivityType, MinimalActivity, Status};
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::Id;
use twilight_model::id::marker::{ApplicationMarker, ChannelMarker, GuildMarker};
use twilight_util::builder::InteractionResponseDataBuilder;

use crate::Error;
use crate::models::{RichMessage, SlashReply};
use crate::platforms::discord::embed::to_discord_embed;
use crate::platforms::discord::interaction::invocation_from_interaction;
use crate::platforms::{ConnectionStatus, PlatformIntegration, RichMessageSink};
use crate::services::discord::SlashCommandService;

fn parse_id<T>(raw: &str, what: &str) -> Result<Id<T>, Error> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .and_then(Id::new_checked)
        .ok_or_else(|| Error::Platform(format!("Invalid Discord {what} id: {raw}")))
}

/// Posts rich messages into guild channels. Usable before the gateway connects.
#[derive(Clone)]
pub struct DiscordRichSink {
    http: Arc<HttpClient>,
}

#[async_trait]
impl RichMessageSink for DiscordRichSink {
    async fn send_rich_message(&self, channel_id: &str, message: &RichMessage) -> Result<(), Error> {
        let channel: Id<ChannelMarker> = parse_id(channel_id, "channel")?;
        let embeds = [to_discord_embed(message)?];

        let mut request = self.http.create_message(channel).embeds(&embeds);
        if let Some(content) = &message.content {
            request = request.content(content);
        }
        request
            .await
            .map_err(|e| Error::Platform(format!("Error sending Discord message: {e:?}")))?;
        Ok(())
    }
}

async fn send_reply(
    client: &InteractionClient<'_>,
    interaction: &Interaction,
    reply: &SlashReply,
    deferred: bool,
) -> Result<(), Error> {
    let embeds = reply
        .embeds
        .iter()
        .map(to_discord_embed)
        .collect::<Result<Vec<_>, _>>()?;

    if deferred {
        client
            .update_response(&interaction.token)
            .content(reply.content.as_deref())
            .embeds(Some(&embeds))
            .await
            .map_err(|e| Error::Platform(format!("update_response => {e:?}")))?;
        return Ok(());
    }

    let mut data = InteractionResponseDataBuilder::new().embeds(embeds);
    if let Some(content) = &reply.content {
        data = data.content(content.as_str());
    }
    if reply.ephemeral {
        data = data.flags(MessageFlags::EPHEMERAL);
    }
    let response = InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(data.build()),
    };
    client
        .create_response(interaction.id, &interaction.token, &response)
        .await
        .map_err(|e| Error::Platform(format!("create_response => {e:?}")))?;
    Ok(())
}

async fn handle_interaction(
    http: Arc<HttpClient>,
    application_id: Id<ApplicationMarker>,
    slash: Arc<SlashCommandService>,
    interaction: Interaction,
) {
    let Some(invocation) = invocation_from_interaction(&interaction) else {
        trace!("Ignoring non-command interaction {:?}", interaction.kind);
        return;
    };
    let client = http.interaction(application_id);

    let deferred = slash.defers(&invocation.name);
    if deferred {
        let ack = InteractionResponse {
            kind: InteractionResponseType::DeferredChannelMessageWithSource,
            data: None,
        };
        if let Err(e) = client.create_response(interaction.id, &interaction.token, &ack).await {
            error!("Could not defer /{} => {e:?}", invocation.name);
            return;
        }
    }

    let outcome = slash.dispatch(&invocation).await;
    if let Some(reply) = outcome.reply() {
        if let Err(e) = send_reply(&client, &interaction, reply, deferred).await {
            error!("Could not answer /{} => {e}", invocation.name);
        }
    }
}

async fn shard_runner(
    mut shard: Shard,
    http: Arc<HttpClient>,
    application_id: Id<ApplicationMarker>,
    slash: Arc<SlashCommandService>,
) {
    let shard_id = shard.id().number();
    info!("(ShardRunner) Shard {shard_id} started. Listening for events.");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        match item {
            Ok(Event::Ready(ready)) => {
                info!(
                    "Shard {shard_id} => READY as {} (ID={}) in {} guild(s)",
                    ready.user.name,
                    ready.user.id,
                    ready.guilds.len()
                );
            }
            Ok(Event::InteractionCreate(created)) => {
                tokio::spawn(handle_interaction(
                    http.clone(),
                    application_id,
                    slash.clone(),
                    created.0,
                ));
            }
            Ok(other) => {
                trace!("Shard {shard_id} => unhandled event: {:?}", other.kind());
            }
            Err(err) => {
                error!("Shard {shard_id} => error receiving event: {err:?}");
            }
        }
    }

    warn!("(ShardRunner) Shard {shard_id} event loop ended.");
}

pub struct DiscordPlatform {
    token: String,
    guild_id: Option<Id<GuildMarker>>,
    /// Shown as "Watching <presence_name>".
    presence_name: String,
    http: Arc<HttpClient>,
    slash: Arc<SlashCommandService>,
    connection_status: ConnectionStatus,
    shard_tasks: Vec<JoinHandle<()>>,
    shard_senders: Vec<MessageSender>,
}

impl DiscordPlatform {
    pub fn new(
        token: String,
        guild_id: Option<&str>,
        presence_name: String,
        slash: Arc<SlashCommandService>,
    ) -> Result<Self, Error> {
        if token.trim().is_empty() {
            return Err(Error::Auth("Discord token is empty".into()));
        }
        let guild_id = guild_id.map(|g| parse_id(g, "guild")).transpose()?;
        let http = Arc::new(
            ClientBuilder::new()
                .token(token.clone())
                .timeout(Duration::from_secs(30))
                .build(),
        );

        Ok(Self {
            token,
            guild_id,
            presence_name,
            http,
            slash,
            connection_status: ConnectionStatus::Disconnected,
            shard_tasks: Vec::new(),
            shard_senders: Vec::new(),
        })
    }

    pub fn rich_sink(&self) -> DiscordRichSink {
        DiscordRichSink {
            http: self.http.clone(),
        }
    }

    async fn register_commands(&self, application_id: Id<ApplicationMarker>) {
        let Some(guild_id) = self.guild_id else {
            info!("DISCORD_GUILD_ID not set, skipping slash command registration");
            return;
        };
        let definitions = self.slash.definitions();
        info!("Registering {} slash commands in guild {}", definitions.len(), guild_id);
        match self
            .http
            .interaction(application_id)
            .set_guild_commands(guild_id, &definitions)
            .await
        {
            Ok(_) => info!("Successfully registered Discord application (/) commands."),
            Err(e) => error!("Error registering Discord commands: {e:?}"),
        }
    }

    fn presence(&self) -> Result<UpdatePresencePayload, Error> {
        let activity = MinimalActivity {
            kind: ActivityType::Watching,
            name: self.presence_name.clone(),
            url: None,
        };
        UpdatePresencePayload::new(vec![activity.into()], false, None, Status::Online)
            .map_err(|e| Error::Platform(format!("presence => {e}")))
    }
}

#[async_trait]
impl PlatformIntegration for DiscordPlatform {
    async fn connect(&mut self) -> Result<(), Error> {
        if matches!(self.connection_status, ConnectionStatus::Connected) {
            info!("(DiscordPlatform) Already connected => skipping");
            return Ok(());
        }

        let application_id = self
            .http
            .current_user_application()
            .await
            .map_err(|e| Error::Platform(format!("current_user_application => {e}")))?
            .model()
            .await
            .map_err(|e| Error::Platform(format!("current_user_application body => {e}")))?
            .id;
        debug!("Discord application id {}", application_id);

        self.register_commands(application_id).await;

        let config = ConfigBuilder::new(self.token.clone(), Intents::GUILDS)
            .presence(self.presence()?)
            .build();

        let shards = gateway::create_recommended(&self.http, config, |_, b| b.build())
            .await
            .map_err(|e| {
                let msg = format!("create_recommended error: {e}");
                self.connection_status = ConnectionStatus::Error(msg.clone());
                Error::Platform(msg)
            })?;

        for shard in shards {
            self.shard_senders.push(shard.sender());
            self.shard_tasks.push(tokio::spawn(shard_runner(
                shard,
                self.http.clone(),
                application_id,
                self.slash.clone(),
            )));
        }

        self.connection_status = ConnectionStatus::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        self.connection_status = ConnectionStatus::Disconnected;

        for sender in &self.shard_senders {
            let _ = sender.close(CloseFrame::NORMAL);
        }
        for task in self.shard_tasks.drain(..) {
            let _ = task.await;
        }
        self.shard_senders.clear();
        Ok(())
    }

    async fn get_connection_status(&self) -> Result<ConnectionStatus, Error> {
        Ok(self.connection_status.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_nonzero_numbers() {
        assert!(parse_id::<ChannelMarker>("123", "channel").is_ok());
        assert!(parse_id::<ChannelMarker>("0", "channel").is_err());
        assert!(parse_id::<ChannelMarker>("general", "channel").is_err());
    }
}
