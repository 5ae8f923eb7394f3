use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use twitchcord_core::BotConfig;
use twitchcord_core::platforms::discord::DiscordPlatform;
use twitchcord_core::platforms::twitch_helix::{HelixApi, TwitchHelixClient, resolve_broadcaster_id};
use twitchcord_core::platforms::twitch_irc::{IrcCredentials, TwitchIrcPlatform};
use twitchcord_core::platforms::{PlatformIntegration, RichMessageSink};
use twitchcord_core::services::CooldownTracker;
use twitchcord_core::services::discord::slashcommands::default_commands;
use twitchcord_core::services::discord::{NotificationTargets, SlashCommandService, SlashContext};
use twitchcord_core::services::twitch::builtin_commands::BuiltinCommandSource;
use twitchcord_core::services::twitch::{CommandRegistry, CommandService, CommandSource, FileCommandSource};
use twitchcord_core::tasks::{ClipWatcher, StreamWatcher, spawn_chat_dispatch, spawn_clip_watch, spawn_stream_watch};
use twitchcord_core::utils::time::{Clock, SystemClock};

#[derive(Parser, Debug, Clone)]
#[command(name = "twitchcord")]
#[command(author, version, about = "Twitch chat bot with Discord stream and clip notifications")]
struct Args {
    /// Load environment variables from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Seconds between stream status checks (overrides STREAM_POLL_SECONDS)
    #[arg(long)]
    stream_poll_secs: Option<u64>,

    /// Seconds between clip checks (overrides CLIP_POLL_SECONDS)
    #[arg(long)]
    clip_poll_secs: Option<u64>,

    /// JSON file with extra text commands (overrides COMMANDS_FILE)
    #[arg(long)]
    commands_file: Option<PathBuf>,

    /// Run the Twitch chat side only
    #[arg(long)]
    no_discord: bool,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env().add_directive("twitchcord=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub).expect("Failed to set global subscriber");
}

fn apply_overrides(config: &mut BotConfig, args: &Args) {
    if let Some(secs) = args.stream_poll_secs.filter(|s| *s > 0) {
        config.stream_poll_interval = Duration::from_secs(secs);
    }
    if let Some(secs) = args.clip_poll_secs.filter(|s| *s > 0) {
        config.clip_poll_interval = Duration::from_secs(secs);
    }
    if let Some(path) = &args.commands_file {
        config.twitch.commands_file = Some(path.clone());
    }
    if args.no_discord {
        config.discord = None;
    }
}

fn command_sources(file: Option<&FileCommandSource>) -> Vec<&dyn CommandSource> {
    let mut sources: Vec<&dyn CommandSource> = vec![&BuiltinCommandSource];
    if let Some(f) = file {
        sources.push(f);
    }
    sources
}

/// Blocks until Ctrl-C. On unix, SIGHUP reloads the command registry in between.
#[cfg(unix)]
async fn wait_for_shutdown(commands: &CommandService, sources: &[&dyn CommandSource]) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(e) => {
            warn!("SIGHUP reload unavailable => {:?}", e);
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {:?}", e);
            }
            return;
        }
    };

    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    error!("Failed to listen for Ctrl-C: {:?}", e);
                }
                return;
            }
            _ = hangup.recv() => {
                info!("SIGHUP received; reloading commands");
                if let Err(e) = commands.reload(sources) {
                    error!("Command reload failed, keeping the previous set => {}", e);
                }
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown(_commands: &CommandService, _sources: &[&dyn CommandSource]) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {:?}", e);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let mut config = BotConfig::load(args.env_file.as_deref())?;
    apply_overrides(&mut config, &args);
    info!(
        "twitchcord starting. channel={}, discord={}",
        config.twitch.channel,
        config.discord.is_some()
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // ---- Twitch chat ----
    let file_source = config.twitch.commands_file.as_ref().map(FileCommandSource::new);
    let sources = command_sources(file_source.as_ref());
    let registry = CommandRegistry::load(&sources)?;
    info!("Loaded {} chat commands:", registry.len());
    for cmd in registry.commands() {
        info!("  {}: {}", cmd.usage(), cmd.description());
    }

    let mut irc = TwitchIrcPlatform::new(IrcCredentials {
        username: config.twitch.bot_username.clone(),
        oauth_token: config.twitch.oauth_token.clone(),
        channel: config.twitch.channel.clone(),
    });
    let events = irc.take_events().ok_or("Twitch IRC event stream already taken")?;
    let commands = Arc::new(
        CommandService::new(
            registry,
            Arc::new(CooldownTracker::new(clock.clone())),
            clock.clone(),
            Arc::new(irc.chat_sink()),
        )
        .with_prefix(&config.twitch.command_prefix),
    );

    irc.connect().await?;
    let dispatch_task = spawn_chat_dispatch(events, commands.clone());

    // ---- Discord + pollers ----
    let mut discord: Option<DiscordPlatform> = None;
    let mut pollers = Vec::new();

    if let (Some(dcfg), Some(hcfg)) = (config.discord.clone(), config.helix.clone()) {
        let helix: Arc<dyn HelixApi> = Arc::new(TwitchHelixClient::new(
            &hcfg.client_id,
            &hcfg.client_secret,
            clock.clone(),
        ));
        let broadcaster_id =
            resolve_broadcaster_id(helix.as_ref(), hcfg.broadcaster_id.as_deref(), &config.twitch.channel).await?;

        let targets = Arc::new(NotificationTargets::new(dcfg.live_channel_id, dcfg.clips_channel_id));
        let slash = Arc::new(SlashCommandService::new(
            SlashContext {
                helix: helix.clone(),
                targets: targets.clone(),
                channel_name: config.twitch.channel.clone(),
                broadcaster_id: broadcaster_id.clone(),
                clock: clock.clone(),
            },
            default_commands(),
        ));

        let mut platform = DiscordPlatform::new(
            dcfg.token,
            dcfg.guild_id.as_deref(),
            format!("{}'s Twitch", config.twitch.channel),
            slash,
        )?;
        let rich: Arc<dyn RichMessageSink> = Arc::new(platform.rich_sink());
        platform.connect().await?;

        pollers.push(spawn_stream_watch(
            StreamWatcher::new(helix.clone(), rich.clone(), targets.clone(), &broadcaster_id, clock.clone()),
            config.stream_poll_interval,
        ));
        pollers.push(spawn_clip_watch(
            ClipWatcher::new(helix, rich, targets, &broadcaster_id, clock.clone()),
            config.clip_poll_interval,
        ));
        discord = Some(platform);
    } else {
        info!("Discord disabled; running Twitch chat only");
    }

    wait_for_shutdown(&commands, &sources).await;
    info!("Ctrl-C detected; shutting down...");

    for task in pollers {
        task.abort();
    }
    if let Some(mut platform) = discord {
        if let Err(e) = platform.disconnect().await {
            warn!("Discord disconnect => {}", e);
        }
    }
    if let Err(e) = irc.disconnect().await {
        warn!("Twitch IRC disconnect => {}", e);
    }
    dispatch_task.abort();

    info!("twitchcord stopped.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_environment() {
        let mut config = BotConfig::from_lookup(|k| match k {
            "BOT_USERNAME" => Some("bot".into()),
            "OAUTH_TOKEN" => Some("oauth:x".into()),
            "CHANNEL" => Some("chan".into()),
            "DISCORD_TOKEN" => Some("d".into()),
            "TWITCH_CLIENT_ID" => Some("id".into()),
            "TWITCH_CLIENT_SECRET" => Some("secret".into()),
            _ => None,
        })
        .unwrap();

        let args = Args::parse_from(["twitchcord", "--stream-poll-secs", "15", "--no-discord"]);
        apply_overrides(&mut config, &args);

        assert_eq!(config.stream_poll_interval, Duration::from_secs(15));
        assert_eq!(config.clip_poll_interval, Duration::from_secs(120));
        assert!(config.discord.is_none());
    }
}
