// twitchcord-core/src/tasks/stream_watch.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use crate::Error;
use crate::models::StreamInfo;
use crate::platforms::RichMessageSink;
use crate::platforms::twitch_helix::HelixApi;
use crate::services::discord::embeds::live_announcement;
use crate::services::discord::{NotificationTargets, TargetKind};
use crate::utils::time::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Offline,
    Live,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamTransition {
    WentLive,
    StillLive,
    WentOffline,
    StillOffline,
}

/// Tracks whether the channel is live and announces only the offline to live edge.
pub struct StreamWatcher {
    helix: Arc<dyn HelixApi>,
    sink: Arc<dyn RichMessageSink>,
    targets: Arc<NotificationTargets>,
    broadcaster_id: String,
    clock: Arc<dyn Clock>,
    state: StreamState,
}

impl StreamWatcher {
    pub fn new(
        helix: Arc<dyn HelixApi>,
        sink: Arc<dyn RichMessageSink>,
        targets: Arc<NotificationTargets>,
        broadcaster_id: &str,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            helix,
            sink,
            targets,
            broadcaster_id: broadcaster_id.to_string(),
            clock,
            state: StreamState::Offline,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// One poll. On an API error the state is left untouched.
    pub async fn tick(&mut self) -> Result<StreamTransition, Error> {
        let stream = self.helix.get_stream(&self.broadcaster_id).await?;

        let transition = match (self.state, &stream) {
            (StreamState::Offline, Some(_)) => StreamTransition::WentLive,
            (StreamState::Live, Some(_)) => StreamTransition::StillLive,
            (StreamState::Live, None) => StreamTransition::WentOffline,
            (StreamState::Offline, None) => StreamTransition::StillOffline,
        };
        self.state = if stream.is_some() {
            StreamState::Live
        } else {
            StreamState::Offline
        };

        match (transition, stream) {
            (StreamTransition::WentLive, Some(info)) => {
                info!("{} went live: {}", info.user_login, info.title);
                self.announce(&info).await;
            }
            (StreamTransition::WentOffline, _) => info!("Stream is now offline"),
            _ => debug!("Stream poll => {:?}", transition),
        }

        Ok(transition)
    }

    async fn announce(&self, stream: &StreamInfo) {
        let Some(channel_id) = self.targets.get(TargetKind::Live) else {
            warn!("No Discord live channel configured; skipping announcement");
            return;
        };

        let profile = match self.helix.get_user_by_id(&self.broadcaster_id).await {
            Ok(p) => p,
            Err(e) => {
                warn!("Profile lookup for live announcement failed => {}", e);
                None
            }
        };

        let message = live_announcement(stream, profile.as_ref(), self.clock.now());
        match self.sink.send_rich_message(&channel_id, &message).await {
            Ok(()) => info!("Live announcement sent to Discord"),
            Err(e) => error!("Error announcing stream: {}", e),
        }
    }
}

/// Polls immediately, then every `period`.
pub fn spawn_stream_watch(mut watcher: StreamWatcher, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = watcher.tick().await {
                error!("Error checking stream status: {}", e);
            }
        }
    })
}
