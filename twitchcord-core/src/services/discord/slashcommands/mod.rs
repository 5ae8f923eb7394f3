pub mod clips;
pub mod setup;
pub mod stream;

use std::sync::Arc;

use crate::services::discord::slash_service::SlashCommand;

pub use clips::ClipsCommand;
pub use setup::SetupCommand;
pub use stream::StreamCommand;

pub fn default_commands() -> Vec<Arc<dyn SlashCommand>> {
    vec![Arc::new(StreamCommand), Arc::new(ClipsCommand), Arc::new(SetupCommand)]
}
