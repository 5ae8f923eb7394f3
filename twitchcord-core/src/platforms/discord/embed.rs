use twilight_model::channel::message::Embed;
use twilight_model::util::Timestamp;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder, ImageSource};

use crate::Error;
use crate::models::RichMessage;

fn image(url: &str) -> Result<ImageSource, Error> {
    ImageSource::url(url).map_err(|e| Error::Platform(format!("invalid embed image url '{url}': {e}")))
}

/// Renders a platform-neutral rich message as a Discord embed, validating Discord's limits.
pub fn to_discord_embed(msg: &RichMessage) -> Result<Embed, Error> {
    let mut builder = EmbedBuilder::new().title(msg.title.as_str());

    if let Some(url) = &msg.url {
        builder = builder.url(url.as_str());
    }
    if let Some(description) = &msg.description {
        builder = builder.description(description.as_str());
    }
    if let Some(color) = msg.color {
        builder = builder.color(color);
    }
    for f in &msg.fields {
        let field = EmbedFieldBuilder::new(f.name.as_str(), f.value.as_str());
        builder = builder.field(if f.inline { field.inline() } else { field });
    }
    if let Some(url) = &msg.image {
        builder = builder.image(image(url)?);
    }
    if let Some(url) = &msg.thumbnail {
        builder = builder.thumbnail(image(url)?);
    }
    if let Some(ts) = msg.timestamp {
        let ts = Timestamp::from_micros(ts.timestamp_micros())
            .map_err(|e| Error::Platform(format!("invalid embed timestamp: {e}")))?;
        builder = builder.timestamp(ts);
    }
    if let Some(footer) = &msg.footer {
        builder = builder.footer(EmbedFooterBuilder::new(footer.as_str()));
    }

    builder
        .validate()
        .map(|b| b.build())
        .map_err(|e| Error::Platform(format!("embed rejected: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::discord::embeds::live_announcement;
    use crate::test_utils::{base_instant, sample_stream, sample_user};

    #[test]
    fn converts_live_announcement() {
        let user = sample_user();
        let msg = live_announcement(&sample_stream(), Some(&user), base_instant());
        let embed = to_discord_embed(&msg).unwrap();

        assert_eq!(embed.title.as_deref(), Some("Streamer is now live on Twitch!"));
        assert_eq!(embed.color, Some(0x6441A4));
        assert_eq!(embed.fields.len(), 2);
        assert!(embed.fields.iter().all(|f| f.inline));
        assert_eq!(embed.thumbnail.map(|t| t.url), Some(user.profile_image_url));
        assert_eq!(embed.footer.map(|f| f.text).as_deref(), Some("Twitch Integration Bot"));
        assert!(embed.timestamp.is_some());
    }

    #[test]
    fn bad_image_url_is_an_error() {
        let msg = RichMessage {
            title: "x".into(),
            image: Some("not a url".into()),
            ..Default::default()
        };
        assert!(to_discord_embed(&msg).is_err());
    }
}
