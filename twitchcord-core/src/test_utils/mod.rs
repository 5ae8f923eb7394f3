// File: src/test_utils/mod.rs
//! Hand-written doubles shared by unit tests and the `tests/` integration suites.

pub mod helpers;

pub use helpers::{
    ManualClock, RecordingChatSink, RecordingRichSink, ScriptedHelixApi, base_instant, sample_clip, sample_stream,
    sample_user,
};
