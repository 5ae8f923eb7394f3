use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use crate::Error;
use crate::models::ClipInfo;
use crate::platforms::twitch_helix::client::TwitchHelixClient;

/// "Get Clips" for a broadcaster, optionally only those created at or after `started_at`.
pub async fn fetch_clips(
    client: &TwitchHelixClient,
    broadcaster_id: &str,
    started_at: Option<DateTime<Utc>>,
    first: Option<u8>,
) -> Result<Vec<ClipInfo>, Error> {
    let query = clip_query(broadcaster_id, started_at, first);
    let resp = client.get_helix::<ClipInfo>("clips", &query).await?;
    debug!("fetch_clips({}) => {} clips", broadcaster_id, resp.data.len());
    Ok(resp.data)
}

fn clip_query(
    broadcaster_id: &str,
    started_at: Option<DateTime<Utc>>,
    first: Option<u8>,
) -> Vec<(&'static str, String)> {
    let mut query = vec![("broadcaster_id", broadcaster_id.to_string())];
    if let Some(ts) = started_at {
        query.push(("started_at", ts.to_rfc3339_opts(SecondsFormat::Millis, true)));
    }
    if let Some(n) = first {
        query.push(("first", n.to_string()));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::platforms::twitch_helix::requests::HelixResponse;

    #[test]
    fn query_includes_rfc3339_watermark() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let q = clip_query("123", Some(ts), Some(3));
        assert_eq!(q[0], ("broadcaster_id", "123".to_string()));
        assert_eq!(q[1], ("started_at", "2024-05-01T12:30:00.000Z".to_string()));
        assert_eq!(q[2], ("first", "3".to_string()));
    }

    #[test]
    fn query_without_filters() {
        assert_eq!(clip_query("123", None, None).len(), 1);
    }

    #[test]
    fn parses_clip_payload() {
        let body = r#"{
            "data": [{
                "id": "AwkwardHelplessSalamanderSwiftRage",
                "url": "https://clips.twitch.tv/AwkwardHelplessSalamanderSwiftRage",
                "embed_url": "https://clips.twitch.tv/embed?clip=AwkwardHelplessSalamanderSwiftRage",
                "broadcaster_id": "67955580",
                "broadcaster_name": "ChewieMelodies",
                "creator_id": "53834192",
                "creator_name": "BlackNova03",
                "video_id": "205586603",
                "game_id": "488191",
                "language": "en",
                "title": "babymetal",
                "view_count": 10,
                "created_at": "2017-11-30T22:34:18Z",
                "thumbnail_url": "https://clips-media-assets.twitch.tv/157589949-preview-480x272.jpg",
                "duration": 60,
                "vod_offset": 480,
                "is_featured": false
            }],
            "pagination": {}
        }"#;
        let parsed: HelixResponse<ClipInfo> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].creator_name, "BlackNova03");
        assert_eq!(parsed.data[0].view_count, 10);
    }
}
