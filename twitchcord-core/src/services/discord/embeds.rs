//! Builders for every rich message the bot posts to Discord.

use chrono::{DateTime, Utc};

use crate::models::embed::TWITCH_PURPLE;
use crate::models::{ClipInfo, RichMessage, StreamInfo, UserProfile};
use crate::platforms::twitch_helix::requests::stream::sized_thumbnail;

pub const LIVE_PING: &str = "@everyone The stream is now live!";
const BOT_FOOTER: &str = "Twitch Integration Bot";
const CLIP_FOOTER: &str = "Twitch Clip";
const NO_GAME: &str = "No game specified";

/// Full-size preview with a cache-busting query so Discord does not reuse an old frame.
fn live_preview(stream: &StreamInfo, now: DateTime<Utc>) -> String {
    format!(
        "{}?t={}",
        sized_thumbnail(&stream.thumbnail_url, 1280, 720),
        now.timestamp_millis()
    )
}

fn game_or_default(stream: &StreamInfo) -> String {
    if stream.game_name.trim().is_empty() {
        NO_GAME.to_string()
    } else {
        stream.game_name.clone()
    }
}

fn profile_image(profile: Option<&UserProfile>) -> Option<String> {
    profile
        .map(|p| p.profile_image_url.clone())
        .filter(|url| !url.is_empty())
}

/// Posted to the live channel on the offline to live edge.
pub fn live_announcement(stream: &StreamInfo, profile: Option<&UserProfile>, now: DateTime<Utc>) -> RichMessage {
    RichMessage {
        content: Some(LIVE_PING.to_string()),
        title: format!("{} is now live on Twitch!", stream.user_name),
        url: Some(format!("https://twitch.tv/{}", stream.user_login)),
        description: Some(stream.title.clone()),
        color: Some(TWITCH_PURPLE),
        image: Some(live_preview(stream, now)),
        thumbnail: profile_image(profile),
        timestamp: Some(now),
        footer: Some(BOT_FOOTER.to_string()),
        ..Default::default()
    }
    .field("Game", game_or_default(stream), true)
    .field("Viewers", stream.viewer_count.to_string(), true)
}

/// `/stream` while live.
pub fn stream_status_live(stream: &StreamInfo, profile: Option<&UserProfile>, now: DateTime<Utc>) -> RichMessage {
    RichMessage {
        title: format!("{} is LIVE on Twitch!", stream.user_name),
        url: Some(format!("https://twitch.tv/{}", stream.user_login)),
        description: Some(stream.title.clone()),
        color: Some(TWITCH_PURPLE),
        image: Some(live_preview(stream, now)),
        thumbnail: profile_image(profile),
        timestamp: Some(now),
        footer: Some(BOT_FOOTER.to_string()),
        ..Default::default()
    }
    .field("Game", game_or_default(stream), true)
    .field("Viewers", stream.viewer_count.to_string(), true)
    .field("Started At", stream.started_at.format("%Y-%m-%d %H:%M UTC").to_string(), true)
}

/// `/stream` while offline.
pub fn stream_status_offline(channel: &str, profile: Option<&UserProfile>, now: DateTime<Utc>) -> RichMessage {
    RichMessage {
        title: format!("{} is currently offline", channel),
        description: Some("The stream is not live at the moment.".to_string()),
        color: Some(TWITCH_PURPLE),
        thumbnail: profile_image(profile),
        timestamp: Some(now),
        footer: Some(BOT_FOOTER.to_string()),
        ..Default::default()
    }
}

/// Posted to the clips channel for every newly discovered clip.
pub fn clip_notification(clip: &ClipInfo) -> RichMessage {
    RichMessage {
        title: clip.title.clone(),
        url: Some(clip.url.clone()),
        description: Some(format!("Clipped by {}", clip.creator_name)),
        color: Some(TWITCH_PURPLE),
        image: Some(clip.thumbnail_url.clone()),
        timestamp: Some(clip.created_at),
        footer: Some(CLIP_FOOTER.to_string()),
        ..Default::default()
    }
}

/// One entry of the `/clips` listing.
pub fn clip_listing(clip: &ClipInfo, now: DateTime<Utc>) -> RichMessage {
    RichMessage {
        title: clip.title.clone(),
        url: Some(clip.url.clone()),
        description: Some(format!("Clipped by {}", clip.creator_name)),
        color: Some(TWITCH_PURPLE),
        image: Some(clip.thumbnail_url.clone()),
        timestamp: Some(now),
        footer: Some(CLIP_FOOTER.to_string()),
        ..Default::default()
    }
    .field("Views", clip.view_count.to_string(), true)
    .field("Created", clip.created_at.format("%Y-%m-%d").to_string(), true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{base_instant, sample_clip, sample_stream, sample_user};

    #[test]
    fn live_announcement_layout() {
        let now = base_instant();
        let user = sample_user();
        let msg = live_announcement(&sample_stream(), Some(&user), now);

        assert_eq!(msg.content.as_deref(), Some(LIVE_PING));
        assert_eq!(msg.title, "Streamer is now live on Twitch!");
        assert_eq!(msg.url.as_deref(), Some("https://twitch.tv/streamer"));
        assert_eq!(msg.color, Some(0x6441A4));
        assert_eq!(msg.fields[0].value, "Just Chatting");
        assert_eq!(msg.fields[1].value, "128");
        assert_eq!(
            msg.image.as_deref(),
            Some("https://static-cdn.jtvnw.net/previews-ttv/live_user_streamer-1280x720.jpg?t=1704067200000")
        );
        assert_eq!(msg.thumbnail, Some(user.profile_image_url));
    }

    #[test]
    fn missing_game_and_profile() {
        let mut stream = sample_stream();
        stream.game_name.clear();
        let msg = live_announcement(&stream, None, base_instant());
        assert_eq!(msg.fields[0].value, NO_GAME);
        assert!(msg.thumbnail.is_none());
    }

    #[test]
    fn clip_notification_uses_clip_time() {
        let clip = sample_clip("AwkwardHelplessSalamander");
        let msg = clip_notification(&clip);
        assert_eq!(msg.description.as_deref(), Some("Clipped by clipper"));
        assert_eq!(msg.timestamp, Some(clip.created_at));
        assert_eq!(msg.footer.as_deref(), Some("Twitch Clip"));
        assert!(msg.content.is_none());
    }

    #[test]
    fn clip_listing_has_views_and_date() {
        let msg = clip_listing(&sample_clip("A"), base_instant());
        assert_eq!(msg.fields[0].value, "7");
        assert_eq!(msg.fields[1].value, "2024-01-01");
    }
}
