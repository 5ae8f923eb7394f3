//! src/platforms/twitch_irc/runtime.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::Error;
use crate::models::{ChatContext, ChatMessageEvent};
use crate::platforms::{ChatSink, ConnectionStatus, PlatformIntegration};

use super::client::{IrcConnector, IrcIncomingEvent, TlsIrcConnector, TwitchIrcClient, privmsg_line};

const EVENT_BUFFER: usize = 1000;

/// Fixed wait between reconnect attempts.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct IrcCredentials {
    pub username: String,
    /// Must carry the `oauth:` prefix.
    pub oauth_token: String,
    /// Channel to join, with or without the leading `#`.
    pub channel: String,
}

/// Turns a `PRIVMSG` event into a dispatchable chat line. Anything else yields `None`.
pub fn chat_event_from_irc(evt: &IrcIncomingEvent, bot_login: &str) -> Option<ChatMessageEvent> {
    if evt.command != "PRIVMSG" {
        return None;
    }
    let channel = evt.channel.clone()?;
    let login = evt.login.clone()?;
    let text = evt.text.clone().unwrap_or_default();

    let tag = |key: &str| evt.tags.get(key).filter(|v| !v.is_empty()).cloned();
    let badges = evt.tags.get("badges").map(String::as_str).unwrap_or("");

    let context = ChatContext {
        channel,
        user_id: tag("user-id").unwrap_or_else(|| login.clone()),
        display_name: tag("display-name").unwrap_or_else(|| login.clone()),
        is_moderator: evt.tags.get("mod").is_some_and(|v| v == "1"),
        is_broadcaster: badges.split(',').any(|b| b == "broadcaster/1"),
        is_self: login.eq_ignore_ascii_case(bot_login),
        username: login,
    };

    Some(ChatMessageEvent { context, text })
}

/// Cloneable chat sink backed by whichever IRC connection is currently open.
#[derive(Clone, Default)]
pub struct IrcChatSink {
    outgoing: Arc<RwLock<Option<mpsc::UnboundedSender<String>>>>,
}

#[async_trait]
impl ChatSink for IrcChatSink {
    async fn send_chat(&self, channel: &str, text: &str) -> Result<(), Error> {
        let guard = self.outgoing.read();
        let Some(tx) = guard.as_ref() else {
            return Err(Error::Platform("No active Twitch IRC connection".into()));
        };
        tx.send(privmsg_line(channel, text))
            .map_err(|_| Error::Platform("Twitch IRC writer has shut down".into()))
    }
}

pub struct TwitchIrcPlatform {
    credentials: IrcCredentials,
    connector: Arc<dyn IrcConnector>,
    reconnect_delay: Duration,
    connection_status: Arc<RwLock<ConnectionStatus>>,
    session_handle: Option<JoinHandle<()>>,
    sink: IrcChatSink,

    tx: mpsc::Sender<ChatMessageEvent>,
    rx: Option<mpsc::Receiver<ChatMessageEvent>>,
}

impl TwitchIrcPlatform {
    pub fn new(credentials: IrcCredentials) -> Self {
        Self::with_connector(credentials, Arc::new(TlsIrcConnector))
    }

    pub fn with_connector(credentials: IrcCredentials, connector: Arc<dyn IrcConnector>) -> Self {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        Self {
            credentials,
            connector,
            reconnect_delay: RECONNECT_DELAY,
            connection_status: Arc::new(RwLock::new(ConnectionStatus::Disconnected)),
            session_handle: None,
            sink: IrcChatSink::default(),
            tx,
            rx: Some(rx),
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn channel(&self) -> String {
        normalize_channel(&self.credentials.channel)
    }

    pub fn chat_sink(&self) -> IrcChatSink {
        self.sink.clone()
    }

    /// Inbound chat lines in arrival order. Can be taken once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<ChatMessageEvent>> {
        self.rx.take()
    }
}

pub fn normalize_channel(channel: &str) -> String {
    format!("#{}", channel.trim().trim_start_matches('#').to_lowercase())
}

enum SessionEnd {
    /// EOF, read error or a server `RECONNECT`.
    Lost,
    /// Nobody is listening for chat events any more.
    Closed,
}

/// Owns the live IRC connection and replaces it whenever it drops.
struct IrcSession {
    connector: Arc<dyn IrcConnector>,
    credentials: IrcCredentials,
    channel: String,
    reconnect_delay: Duration,
    outgoing: Arc<RwLock<Option<mpsc::UnboundedSender<String>>>>,
    status: Arc<RwLock<ConnectionStatus>>,
    tx: mpsc::Sender<ChatMessageEvent>,
}

impl IrcSession {
    async fn run(self, mut client: TwitchIrcClient) {
        let bot_login = self.credentials.username.to_lowercase();
        loop {
            let Some(mut incoming) = client.incoming.take() else {
                error!("(TwitchIrcPlatform) IRC client has no incoming channel");
                break;
            };
            *self.outgoing.write() = Some(client.outgoing());
            client.join_channel(&self.channel);
            *self.status.write() = ConnectionStatus::Connected;

            if let SessionEnd::Closed = self.forward(&mut incoming, &bot_login).await {
                break;
            }

            *self.outgoing.write() = None;
            *self.status.write() = ConnectionStatus::Error("Twitch IRC connection lost".into());
            client.shutdown();
            client = self.reconnect().await;
        }

        *self.outgoing.write() = None;
        info!("(TwitchIrcPlatform) session ended.");
    }

    async fn forward(
        &self,
        incoming: &mut mpsc::UnboundedReceiver<IrcIncomingEvent>,
        bot_login: &str,
    ) -> SessionEnd {
        while let Some(evt) = incoming.recv().await {
            if evt.command == "RECONNECT" {
                info!("(TwitchIrcPlatform) server requested a reconnect");
                return SessionEnd::Lost;
            }
            match chat_event_from_irc(&evt, bot_login) {
                Some(chat) => {
                    if self.tx.send(chat).await.is_err() {
                        return SessionEnd::Closed;
                    }
                }
                None => debug!("(TwitchIrcPlatform) ignoring {}", evt.command),
            }
        }
        warn!("(TwitchIrcPlatform) connection to Twitch IRC closed");
        SessionEnd::Lost
    }

    async fn reconnect(&self) -> TwitchIrcClient {
        let mut attempt: u32 = 0;
        loop {
            tokio::time::sleep(self.reconnect_delay).await;
            attempt += 1;
            let creds = &self.credentials;
            match self.connector.connect(&creds.username, &creds.oauth_token).await {
                Ok(client) => {
                    info!("(TwitchIrcPlatform) reconnected after {} attempt(s)", attempt);
                    return client;
                }
                Err(e) => warn!("(TwitchIrcPlatform) reconnect attempt {} failed => {}", attempt, e),
            }
        }
    }
}

#[async_trait]
impl PlatformIntegration for TwitchIrcPlatform {
    async fn connect(&mut self) -> Result<(), Error> {
        if self.session_handle.is_some() {
            info!("(TwitchIrcPlatform) connect => already connected");
            return Ok(());
        }

        let creds = &self.credentials;
        if !creds.oauth_token.starts_with("oauth:") {
            return Err(Error::Auth("Twitch IRC token must start with 'oauth:'".into()));
        }
        if creds.username.is_empty() {
            return Err(Error::Auth("Twitch IRC credentials missing user name".into()));
        }

        let client = match self.connector.connect(&creds.username, &creds.oauth_token).await {
            Ok(c) => c,
            Err(e) => {
                let msg = format!("Error connecting to Twitch IRC => {}", e);
                error!("{}", msg);
                *self.connection_status.write() = ConnectionStatus::Error(msg);
                return Err(Error::Platform("Twitch IRC connect failed".into()));
            }
        };

        let channel = self.channel();
        info!("(TwitchIrcPlatform) connected as {} and joining {}", creds.username, channel);

        let session = IrcSession {
            connector: self.connector.clone(),
            credentials: creds.clone(),
            channel,
            reconnect_delay: self.reconnect_delay,
            outgoing: self.sink.outgoing.clone(),
            status: self.connection_status.clone(),
            tx: self.tx.clone(),
        };
        *self.connection_status.write() = ConnectionStatus::Connected;
        self.session_handle = Some(tokio::spawn(session.run(client)));
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        *self.connection_status.write() = ConnectionStatus::Disconnected;

        if let Some(tx) = self.sink.outgoing.write().take() {
            tx.send(format!("PART {}", self.channel())).ok();
        }
        if let Some(h) = self.session_handle.take() {
            h.abort();
        }
        Ok(())
    }

    async fn get_connection_status(&self) -> Result<ConnectionStatus, Error> {
        Ok(self.connection_status.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf, split};
    use tokio::time::timeout;

    use super::*;
    use crate::platforms::twitch_irc::client::ParsedTwitchMsg;

    fn event(line: &str) -> IrcIncomingEvent {
        IrcIncomingEvent::from_parsed(&ParsedTwitchMsg::parse_irc_line(line))
    }

    #[test]
    fn moderator_privmsg() {
        let evt = event(
            "@badges=moderator/1;display-name=Alice;mod=1;user-id=1234 :alice!alice@alice.tmi.twitch.tv PRIVMSG #chan :!so bob",
        );
        let chat = chat_event_from_irc(&evt, "mybot").unwrap();
        assert_eq!(chat.text, "!so bob");
        assert_eq!(chat.context.channel, "#chan");
        assert_eq!(chat.context.user_id, "1234");
        assert_eq!(chat.context.username, "alice");
        assert_eq!(chat.context.display_name, "Alice");
        assert!(chat.context.is_moderator);
        assert!(!chat.context.is_broadcaster);
        assert!(!chat.context.is_self);
    }

    #[test]
    fn broadcaster_badge_and_missing_tags() {
        let evt = event("@badges=broadcaster/1,subscriber/0;mod=0 :Streamer!streamer@x PRIVMSG #streamer :hi");
        let chat = chat_event_from_irc(&evt, "mybot").unwrap();
        assert!(chat.context.is_broadcaster);
        assert!(!chat.context.is_moderator);
        assert!(chat.context.is_privileged());
        assert_eq!(chat.context.user_id, "streamer");
        assert_eq!(chat.context.display_name, "streamer");
    }

    #[test]
    fn own_messages_are_flagged() {
        let evt = event(":MyBot!mybot@x PRIVMSG #chan :Hello, @viewer!");
        assert!(chat_event_from_irc(&evt, "mybot").unwrap().context.is_self);
    }

    #[test]
    fn non_privmsg_is_skipped() {
        assert!(chat_event_from_irc(&event(":alice!alice@x JOIN #chan"), "mybot").is_none());
    }

    #[test]
    fn channel_normalization() {
        assert_eq!(normalize_channel("SomeChannel"), "#somechannel");
        assert_eq!(normalize_channel("#chan "), "#chan");
    }

    const WAIT: Duration = Duration::from_secs(2);

    /// Hands the server end of every new in-memory connection to the test.
    struct DuplexConnector {
        servers: mpsc::UnboundedSender<DuplexStream>,
    }

    #[async_trait]
    impl IrcConnector for DuplexConnector {
        async fn connect(&self, username: &str, oauth_token: &str) -> io::Result<TwitchIrcClient> {
            let (client_end, server_end) = tokio::io::duplex(4096);
            self.servers
                .send(server_end)
                .map_err(|_| io::Error::other("test server gone"))?;
            Ok(TwitchIrcClient::from_stream(client_end, username, oauth_token))
        }
    }

    struct FakeServer {
        lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
        writer: WriteHalf<DuplexStream>,
    }

    impl FakeServer {
        async fn accept(servers: &mut mpsc::UnboundedReceiver<DuplexStream>) -> Self {
            let stream = timeout(WAIT, servers.recv())
                .await
                .expect("no connection attempt")
                .expect("connector dropped");
            let (read_half, writer) = split(stream);
            Self {
                lines: BufReader::new(read_half).lines(),
                writer,
            }
        }

        /// Reads client lines until `wanted` shows up.
        async fn expect_line(&mut self, wanted: &str) {
            loop {
                let line = timeout(WAIT, self.lines.next_line())
                    .await
                    .expect("timed out waiting for client line")
                    .expect("read failed")
                    .expect("client closed the connection");
                if line == wanted {
                    return;
                }
            }
        }

        async fn send(&mut self, line: &str) {
            self.writer.write_all(format!("{line}\r\n").as_bytes()).await.unwrap();
        }
    }

    fn credentials() -> IrcCredentials {
        IrcCredentials {
            username: "mybot".into(),
            oauth_token: "oauth:abc".into(),
            channel: "chan".into(),
        }
    }

    fn duplex_platform() -> (TwitchIrcPlatform, mpsc::UnboundedReceiver<DuplexStream>) {
        let (servers_tx, servers_rx) = mpsc::unbounded_channel();
        let platform = TwitchIrcPlatform::with_connector(credentials(), Arc::new(DuplexConnector { servers: servers_tx }))
            .with_reconnect_delay(Duration::from_millis(10));
        (platform, servers_rx)
    }

    #[tokio::test]
    async fn reconnects_when_server_requests_it() {
        let (mut platform, mut servers) = duplex_platform();
        let mut events = platform.take_events().unwrap();
        platform.connect().await.unwrap();

        let mut first = FakeServer::accept(&mut servers).await;
        first.expect_line("PASS oauth:abc").await;
        first.expect_line("JOIN #chan").await;
        first.send(":tmi.twitch.tv RECONNECT").await;

        let mut second = FakeServer::accept(&mut servers).await;
        second.expect_line("NICK mybot").await;
        second.expect_line("JOIN #chan").await;
        assert_eq!(
            platform.get_connection_status().await.unwrap(),
            ConnectionStatus::Connected
        );

        second
            .send("@user-id=7;display-name=Alice :alice!alice@alice.tmi.twitch.tv PRIVMSG #chan :!hello")
            .await;
        let chat = timeout(WAIT, events.recv()).await.unwrap().unwrap();
        assert_eq!(chat.text, "!hello");
        assert_eq!(chat.context.user_id, "7");

        platform.chat_sink().send_chat("#chan", "Hello, @alice!").await.unwrap();
        second.expect_line("PRIVMSG #chan :Hello, @alice!").await;

        platform.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn reconnects_after_eof() {
        let (mut platform, mut servers) = duplex_platform();
        let _events = platform.take_events().unwrap();
        platform.connect().await.unwrap();

        let mut first = FakeServer::accept(&mut servers).await;
        first.expect_line("JOIN #chan").await;
        drop(first);

        let mut second = FakeServer::accept(&mut servers).await;
        second.expect_line("JOIN #chan").await;

        platform.disconnect().await.unwrap();
        assert_eq!(
            platform.get_connection_status().await.unwrap(),
            ConnectionStatus::Disconnected
        );
        assert!(platform.chat_sink().send_chat("#chan", "hi").await.is_err());
    }

    #[tokio::test]
    async fn sink_without_connection_errors() {
        let platform = TwitchIrcPlatform::new(IrcCredentials {
            username: "mybot".into(),
            oauth_token: "oauth:abc".into(),
            channel: "chan".into(),
        });
        assert!(platform.chat_sink().send_chat("#chan", "hi").await.is_err());
    }
}
