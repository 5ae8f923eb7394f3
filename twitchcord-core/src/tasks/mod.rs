pub mod chat_dispatch;
pub mod clip_watch;
pub mod stream_watch;

pub use chat_dispatch::spawn_chat_dispatch;
pub use clip_watch::{CLIP_PAGE_SIZE, ClipWatcher, spawn_clip_watch};
pub use stream_watch::{StreamState, StreamTransition, StreamWatcher, spawn_stream_watch};
