// tests/stream_watch_tests.rs
use std::sync::Arc;

use twitchcord_core::{
    Error,
    services::discord::NotificationTargets,
    tasks::{StreamState, StreamTransition, StreamWatcher},
    test_utils::{ManualClock, RecordingRichSink, ScriptedHelixApi, sample_stream, sample_user},
};

fn watcher(
    helix: Arc<ScriptedHelixApi>,
    sink: Arc<RecordingRichSink>,
    live_channel: Option<&str>,
) -> StreamWatcher {
    StreamWatcher::new(
        helix,
        sink,
        Arc::new(NotificationTargets::new(live_channel.map(str::to_string), None)),
        "1001",
        Arc::new(ManualClock::default()),
    )
}

#[tokio::test]
async fn test_only_offline_to_live_edges_announce() -> Result<(), Error> {
    let helix = Arc::new(ScriptedHelixApi::new());
    helix.add_user(sample_user());
    for live in [false, false, true, true, false, true] {
        helix.push_stream(Ok(live.then(sample_stream)));
    }
    let sink = Arc::new(RecordingRichSink::default());
    let mut w = watcher(helix.clone(), sink.clone(), Some("555"));

    let mut transitions = Vec::new();
    for _ in 0..6 {
        transitions.push(w.tick().await?);
    }

    assert_eq!(
        transitions,
        vec![
            StreamTransition::StillOffline,
            StreamTransition::StillOffline,
            StreamTransition::WentLive,
            StreamTransition::StillLive,
            StreamTransition::WentOffline,
            StreamTransition::WentLive,
        ]
    );

    let sent = sink.sent.lock();
    assert_eq!(sent.len(), 2);
    for (channel, msg) in sent.iter() {
        assert_eq!(channel, "555");
        assert_eq!(msg.content.as_deref(), Some("@everyone The stream is now live!"));
        assert_eq!(msg.title, "Streamer is now live on Twitch!");
        assert!(msg.thumbnail.is_some());
    }
    Ok(())
}

#[tokio::test]
async fn test_api_failure_keeps_state() -> Result<(), Error> {
    let helix = Arc::new(ScriptedHelixApi::new());
    helix.push_stream(Ok(Some(sample_stream())));
    helix.push_stream(Err(Error::Platform("streams: HTTP 503".into())));
    helix.push_stream(Ok(Some(sample_stream())));
    let sink = Arc::new(RecordingRichSink::default());
    let mut w = watcher(helix, sink.clone(), Some("555"));

    assert_eq!(w.tick().await?, StreamTransition::WentLive);
    assert!(w.tick().await.is_err());
    assert_eq!(w.state(), StreamState::Live);
    assert_eq!(w.tick().await?, StreamTransition::StillLive);
    assert_eq!(sink.count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_profile_failure_still_announces() -> Result<(), Error> {
    let helix = Arc::new(ScriptedHelixApi::new().with_failing_user_lookups());
    helix.push_stream(Ok(Some(sample_stream())));
    let sink = Arc::new(RecordingRichSink::default());
    let mut w = watcher(helix, sink.clone(), Some("555"));

    w.tick().await?;
    let sent = sink.sent.lock();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.thumbnail.is_none());
    Ok(())
}

#[tokio::test]
async fn test_missing_target_or_failed_send_still_tracks_state() -> Result<(), Error> {
    let helix = Arc::new(ScriptedHelixApi::new());
    helix.push_stream(Ok(Some(sample_stream())));
    let sink = Arc::new(RecordingRichSink::default());
    let mut w = watcher(helix, sink.clone(), None);
    assert_eq!(w.tick().await?, StreamTransition::WentLive);
    assert_eq!(w.state(), StreamState::Live);
    assert_eq!(sink.count(), 0);

    let helix = Arc::new(ScriptedHelixApi::new());
    helix.push_stream(Ok(Some(sample_stream())));
    helix.push_stream(Ok(Some(sample_stream())));
    let mut w = watcher(helix, Arc::new(RecordingRichSink::failing()), Some("555"));
    assert_eq!(w.tick().await?, StreamTransition::WentLive);
    assert_eq!(w.tick().await?, StreamTransition::StillLive);
    Ok(())
}
