// twitchcord-core/src/tasks/chat_dispatch.rs

use std::sync::Arc;

use tokio::sync::mpsc::Receiver;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::models::ChatMessageEvent;
use crate::services::twitch::{CommandService, DispatchOutcome};

/// Dispatches chat lines one at a time, in arrival order.
pub fn spawn_chat_dispatch(mut rx: Receiver<ChatMessageEvent>, service: Arc<CommandService>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(evt) = rx.recv().await {
            match service.dispatch(&evt.context, &evt.text).await {
                DispatchOutcome::Ignored(reason) => debug!("ignored chat line => {:?}", reason),
                outcome => debug!("dispatch => {:?}", outcome),
            }
        }
        info!("Chat dispatch loop ended.");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatContext;
    use crate::services::CooldownTracker;
    use crate::services::twitch::CommandRegistry;
    use crate::services::twitch::builtin_commands::BuiltinCommandSource;
    use crate::test_utils::{ManualClock, RecordingChatSink};
    use crate::utils::time::Clock;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn replies_follow_arrival_order() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::default());
        let sink = Arc::new(RecordingChatSink::default());
        let service = Arc::new(CommandService::new(
            CommandRegistry::load(&[&BuiltinCommandSource]).unwrap(),
            Arc::new(CooldownTracker::new(clock.clone())),
            clock,
            sink.clone(),
        ));

        let (tx, rx) = mpsc::channel(16);
        let handle = spawn_chat_dispatch(rx, service);
        for text in ["!echo one", "just chatting", "!echo two", "!hello"] {
            let context = ChatContext {
                channel: "#chan".into(),
                user_id: "7".into(),
                username: "viewer".into(),
                ..Default::default()
            };
            tx.send(ChatMessageEvent {
                context,
                text: text.into(),
            })
            .await
            .unwrap();
        }
        drop(tx);
        handle.await.unwrap();

        assert_eq!(sink.texts(), vec!["Echo: one", "Echo: two", "Hello, @viewer!"]);
    }
}
