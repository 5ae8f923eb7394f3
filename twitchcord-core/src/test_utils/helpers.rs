// File: twitchcord-core/src/test_utils/helpers.rs

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;

use crate::Error;
use crate::models::{ClipInfo, RichMessage, StreamInfo, UserProfile};
use crate::platforms::twitch_helix::HelixApi;
use crate::platforms::{ChatSink, RichMessageSink};
use crate::utils::time::Clock;

/// A clock that only moves when told to. Starts at 2024-01-01T00:00:00Z.
pub struct ManualClock {
    base: DateTime<Utc>,
    offset: Mutex<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(base_instant())
    }
}

impl ManualClock {
    pub fn starting_at(base: DateTime<Utc>) -> Self {
        Self {
            base,
            offset: Mutex::new(Duration::zero()),
        }
    }

    /// Sets the absolute offset from the starting instant.
    pub fn set_offset(&self, offset: Duration) {
        *self.offset.lock() = offset;
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.base + *self.offset.lock()
    }
}

/// Records every chat line; optionally fails every send.
#[derive(Default)]
pub struct RecordingChatSink {
    pub sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingChatSink {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(_, t)| t.clone()).collect()
    }
}

#[async_trait]
impl ChatSink for RecordingChatSink {
    async fn send_chat(&self, channel: &str, text: &str) -> Result<(), Error> {
        if self.fail {
            return Err(Error::Platform("chat sink offline".into()));
        }
        self.sent.lock().push((channel.to_string(), text.to_string()));
        Ok(())
    }
}

/// Records every rich message with its target channel.
#[derive(Default)]
pub struct RecordingRichSink {
    pub sent: Mutex<Vec<(String, RichMessage)>>,
    fail: bool,
}

impl RecordingRichSink {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl RichMessageSink for RecordingRichSink {
    async fn send_rich_message(&self, channel_id: &str, message: &RichMessage) -> Result<(), Error> {
        if self.fail {
            return Err(Error::Platform("discord unavailable".into()));
        }
        self.sent.lock().push((channel_id.to_string(), message.clone()));
        Ok(())
    }
}

/// A Helix double fed with queued responses. An empty queue answers "offline" / "no clips".
#[derive(Default)]
pub struct ScriptedHelixApi {
    streams: Mutex<VecDeque<Result<Option<StreamInfo>, Error>>>,
    clips: Mutex<VecDeque<Result<Vec<ClipInfo>, Error>>>,
    users: Mutex<Vec<UserProfile>>,
    fail_users: bool,
    /// `started_at` of every `get_clips` call, in order.
    pub clip_queries: Mutex<Vec<Option<DateTime<Utc>>>>,
    /// `first` of every `get_clips` call, in order.
    pub clip_page_sizes: Mutex<Vec<Option<u8>>>,
    pub stream_calls: Mutex<usize>,
}

impl ScriptedHelixApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failing_user_lookups(mut self) -> Self {
        self.fail_users = true;
        self
    }

    pub fn push_stream(&self, stream: Result<Option<StreamInfo>, Error>) {
        self.streams.lock().push_back(stream);
    }

    pub fn push_clips(&self, clips: Result<Vec<ClipInfo>, Error>) {
        self.clips.lock().push_back(clips);
    }

    pub fn add_user(&self, user: UserProfile) {
        self.users.lock().push(user);
    }
}

#[async_trait]
impl HelixApi for ScriptedHelixApi {
    async fn get_stream(&self, _user_id: &str) -> Result<Option<StreamInfo>, Error> {
        *self.stream_calls.lock() += 1;
        self.streams.lock().pop_front().unwrap_or(Ok(None))
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserProfile>, Error> {
        if self.fail_users {
            return Err(Error::Platform("users: HTTP 500".into()));
        }
        Ok(self.users.lock().iter().find(|u| u.id == user_id).cloned())
    }

    async fn get_user_by_login(&self, login: &str) -> Result<Option<UserProfile>, Error> {
        if self.fail_users {
            return Err(Error::Platform("users: HTTP 500".into()));
        }
        let login = login.to_lowercase();
        Ok(self.users.lock().iter().find(|u| u.login == login).cloned())
    }

    async fn get_clips(
        &self,
        _broadcaster_id: &str,
        started_at: Option<DateTime<Utc>>,
        first: Option<u8>,
    ) -> Result<Vec<ClipInfo>, Error> {
        self.clip_queries.lock().push(started_at);
        self.clip_page_sizes.lock().push(first);
        self.clips.lock().pop_front().unwrap_or(Ok(Vec::new()))
    }
}

pub fn sample_stream() -> StreamInfo {
    StreamInfo {
        id: "40952121085".into(),
        user_id: "1001".into(),
        user_login: "streamer".into(),
        user_name: "Streamer".into(),
        game_name: "Just Chatting".into(),
        title: "Building a bot live".into(),
        viewer_count: 128,
        started_at: base_instant(),
        thumbnail_url: "https://static-cdn.jtvnw.net/previews-ttv/live_user_streamer-{width}x{height}.jpg".into(),
    }
}

pub fn sample_user() -> UserProfile {
    UserProfile {
        id: "1001".into(),
        login: "streamer".into(),
        display_name: "Streamer".into(),
        profile_image_url: "https://static-cdn.jtvnw.net/jtv_user_pictures/streamer.png".into(),
    }
}

pub fn sample_clip(id: &str) -> ClipInfo {
    ClipInfo {
        id: id.to_string(),
        url: format!("https://clips.twitch.tv/{id}"),
        title: format!("Clip {id}"),
        creator_name: "clipper".into(),
        view_count: 7,
        created_at: base_instant(),
        thumbnail_url: format!("https://clips-media-assets2.twitch.tv/{id}-preview-480x272.jpg"),
    }
}

/// 2024-01-01T00:00:00Z
pub fn base_instant() -> DateTime<Utc> {
    Utc.timestamp_opt(1_704_067_200, 0).single().unwrap_or_default()
}
