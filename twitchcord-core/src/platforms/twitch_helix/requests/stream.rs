// ========================================================
// File: src/platforms/twitch_helix/requests/stream.rs
// ========================================================
use tracing::debug;

use crate::Error;
use crate::models::StreamInfo;
use crate::platforms::twitch_helix::client::TwitchHelixClient;

/// "Get Streams" for one user id. An empty `data` array means offline.
pub async fn fetch_stream(
    client: &TwitchHelixClient,
    user_id: &str,
) -> Result<Option<StreamInfo>, Error> {
    let resp = client
        .get_helix::<StreamInfo>("streams", &[("user_id", user_id.to_string())])
        .await?;

    let stream = resp.data.into_iter().next();
    debug!("fetch_stream({}) => live={}", user_id, stream.is_some());
    Ok(stream)
}

/// Fills in the `{width}`/`{height}` placeholders of a Helix stream thumbnail.
pub fn sized_thumbnail(template: &str, width: u32, height: u32) -> String {
    template
        .replace("{width}", &width.to_string())
        .replace("{height}", &height.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::twitch_helix::requests::HelixResponse;

    #[test]
    fn parses_live_stream_payload() {
        let body = r#"{
            "data": [{
                "id": "41375541868",
                "user_id": "459331509",
                "user_login": "auronplay",
                "user_name": "auronplay",
                "game_id": "494131",
                "game_name": "Little Nightmares",
                "type": "live",
                "title": "hablamos y le damos a Little Nightmares 1",
                "viewer_count": 78365,
                "started_at": "2021-03-10T15:04:21Z",
                "language": "es",
                "thumbnail_url": "https://static-cdn.jtvnw.net/previews-ttv/live_user_auronplay-{width}x{height}.jpg",
                "tag_ids": [],
                "is_mature": false
            }],
            "pagination": {}
        }"#;
        let parsed: HelixResponse<StreamInfo> = serde_json::from_str(body).unwrap();
        let stream = &parsed.data[0];
        assert_eq!(stream.user_login, "auronplay");
        assert_eq!(stream.viewer_count, 78365);
        assert_eq!(stream.game_name, "Little Nightmares");
    }

    #[test]
    fn parses_offline_payload() {
        let parsed: HelixResponse<StreamInfo> =
            serde_json::from_str(r#"{"data": [], "pagination": {}}"#).unwrap();
        assert!(parsed.data.is_empty());
    }

    #[test]
    fn thumbnail_placeholders_are_replaced() {
        assert_eq!(
            sized_thumbnail("https://x/live_user_a-{width}x{height}.jpg", 1280, 720),
            "https://x/live_user_a-1280x720.jpg"
        );
    }
}
