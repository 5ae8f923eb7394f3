// twitchcord-core/src/tasks/clip_watch.rs

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info, warn};

use crate::Error;
use crate::platforms::RichMessageSink;
use crate::platforms::twitch_helix::HelixApi;
use crate::services::discord::embeds::clip_notification;
use crate::services::discord::{NotificationTargets, TargetKind};
use crate::utils::time::Clock;

/// Largest page Helix returns for `GET /clips`.
pub const CLIP_PAGE_SIZE: u8 = 100;

/// Posts every clip created since the watermark.
///
/// After a poll that found clips, the watermark moves to the time that poll started,
/// not to the newest clip's creation time. An empty poll leaves it where it is.
///
/// Each poll reads a single page of up to [`CLIP_PAGE_SIZE`] clips and does not follow
/// the pagination cursor, so clips beyond that page in one interval are not posted.
pub struct ClipWatcher {
    helix: Arc<dyn HelixApi>,
    sink: Arc<dyn RichMessageSink>,
    targets: Arc<NotificationTargets>,
    broadcaster_id: String,
    clock: Arc<dyn Clock>,
    watermark: DateTime<Utc>,
}

impl ClipWatcher {
    pub fn new(
        helix: Arc<dyn HelixApi>,
        sink: Arc<dyn RichMessageSink>,
        targets: Arc<NotificationTargets>,
        broadcaster_id: &str,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let watermark = clock.now();
        Self {
            helix,
            sink,
            targets,
            broadcaster_id: broadcaster_id.to_string(),
            clock,
            watermark,
        }
    }

    pub fn watermark(&self) -> DateTime<Utc> {
        self.watermark
    }

    /// One poll. Returns how many new clips were found.
    pub async fn tick(&mut self) -> Result<usize, Error> {
        let polled_at = self.clock.now();
        let clips = self
            .helix
            .get_clips(&self.broadcaster_id, Some(self.watermark), Some(CLIP_PAGE_SIZE))
            .await?;

        if clips.len() >= usize::from(CLIP_PAGE_SIZE) {
            warn!("Clip poll filled a whole page; later clips in this window are skipped");
        }
        if clips.is_empty() {
            debug!("No new clips since {}", self.watermark);
            return Ok(0);
        }
        self.watermark = polled_at;

        let Some(channel_id) = self.targets.get(TargetKind::Clips) else {
            warn!("No Discord clips channel configured; skipping {} clip(s)", clips.len());
            return Ok(clips.len());
        };

        for clip in &clips {
            match self.sink.send_rich_message(&channel_id, &clip_notification(clip)).await {
                Ok(()) => info!("Posted clip to Discord: {}", clip.title),
                Err(e) => error!("Error posting clip {} to Discord: {}", clip.id, e),
            }
        }

        Ok(clips.len())
    }
}

/// First poll after one `period`, then every `period`.
pub fn spawn_clip_watch(mut watcher: ClipWatcher, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = watcher.tick().await {
                error!("Error checking for new clips: {}", e);
            }
        }
    })
}
