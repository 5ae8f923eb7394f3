//! src/platforms/twitch_irc/client.rs

use std::collections::HashMap;
use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter, split};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_native_tls::TlsConnector;
use tracing::{debug, error, info, warn};

pub const TWITCH_IRC_HOST: &str = "irc.chat.twitch.tv";
pub const TWITCH_IRC_TLS_PORT: u16 = 6697;

/// Minimal representation of a parsed IRC message from Twitch.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTwitchMsg {
    pub tags: Option<String>,
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
    pub trailing: Option<String>,
}

impl ParsedTwitchMsg {
    pub fn parse_irc_line(line: &str) -> Self {
        let mut rest = line.trim();
        let mut tags = None;
        let mut prefix = None;
        let mut params = Vec::new();
        let mut trailing = None;

        if rest.starts_with('@') {
            match rest.split_once(' ') {
                Some((t, r)) => {
                    tags = Some(t.to_string());
                    rest = r;
                }
                None => {
                    return Self {
                        tags: Some(rest.to_string()),
                        prefix: None,
                        command: String::new(),
                        params,
                        trailing,
                    };
                }
            }
        }

        if let Some(stripped) = rest.strip_prefix(':') {
            match stripped.split_once(' ') {
                Some((p, r)) => {
                    prefix = Some(p.to_string());
                    rest = r;
                }
                None => {
                    return Self {
                        tags,
                        prefix: Some(stripped.to_string()),
                        command: String::new(),
                        params,
                        trailing,
                    };
                }
            }
        }

        let (command, rest) = rest.split_once(' ').unwrap_or((rest, ""));

        // A leading ':' means the whole remainder is the trailing param.
        if let Some(t) = rest.strip_prefix(':') {
            trailing = Some(t.to_string());
        } else if let Some(idx) = rest.find(" :") {
            trailing = Some(rest[idx + 2..].to_string());
            params.extend(rest[..idx].split_whitespace().map(str::to_string));
        } else {
            params.extend(rest.split_whitespace().map(str::to_string));
        }

        Self {
            tags,
            prefix,
            command: command.to_string(),
            params,
            trailing,
        }
    }

    /// Login part of `nick!user@host`.
    pub fn nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        Some(prefix.split_once('!').map(|(n, _)| n).unwrap_or(prefix))
    }

    pub fn tag_map(&self) -> HashMap<String, String> {
        self.tags.as_deref().map(parse_tags).unwrap_or_default()
    }
}

/// Splits `@badge-info=;badges=moderator/1;user-id=1234` into a key/value map.
pub fn parse_tags(tag_str: &str) -> HashMap<String, String> {
    tag_str
        .trim_start_matches('@')
        .split(';')
        .filter(|kv| !kv.is_empty())
        .map(|kv| {
            let (k, v) = kv.split_once('=').unwrap_or((kv, ""));
            (k.to_string(), v.to_string())
        })
        .collect()
}

/// Higher-level event from the IRC read loop.
#[derive(Debug, Clone, Default)]
pub struct IrcIncomingEvent {
    pub command: String,
    pub channel: Option<String>,
    pub login: Option<String>,
    pub text: Option<String>,
    pub tags: HashMap<String, String>,
}

impl IrcIncomingEvent {
    pub fn from_parsed(parsed: &ParsedTwitchMsg) -> Self {
        Self {
            command: parsed.command.to_uppercase(),
            channel: parsed.params.first().cloned(),
            login: parsed.nick().map(str::to_lowercase),
            text: parsed.trailing.clone(),
            tags: parsed.tag_map(),
        }
    }
}

/// Low-level IRC client that connects to Twitch via TLS.
pub struct TwitchIrcClient {
    raw_outgoing: mpsc::UnboundedSender<String>,

    /// Taken once by the runtime.
    pub incoming: Option<mpsc::UnboundedReceiver<IrcIncomingEvent>>,

    read_task: JoinHandle<()>,
    write_task: JoinHandle<()>,
}

impl TwitchIrcClient {
    /// Connects to Twitch IRC over TLS, sends PASS/NICK/CAP and spawns the read/write tasks.
    pub async fn connect(username: &str, oauth_token: &str) -> io::Result<Self> {
        let tcp = TcpStream::connect((TWITCH_IRC_HOST, TWITCH_IRC_TLS_PORT))
            .await
            .map_err(|e| io::Error::other(format!("TCP connect error: {e}")))?;

        let native_connector = native_tls::TlsConnector::new()
            .map_err(|e| io::Error::other(format!("TLSConnector::new() => {e}")))?;
        let connector = TlsConnector::from(native_connector);

        let tls_stream = connector
            .connect(TWITCH_IRC_HOST, tcp)
            .await
            .map_err(|e| io::Error::other(format!("TLS connect() => {e}")))?;

        Ok(Self::from_stream(tls_stream, username, oauth_token))
    }

    /// Runs an IRC session over an already-open stream: queues PASS/NICK/CAP and spawns
    /// the read/write tasks.
    pub fn from_stream<S>(stream: S, username: &str, oauth_token: &str) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = split(stream);

        let (tx_outgoing, rx_outgoing) = mpsc::unbounded_channel::<String>();
        let (tx_incoming, rx_incoming) = mpsc::unbounded_channel::<IrcIncomingEvent>();

        let write_task = tokio::spawn(Self::writer_loop(write_half, rx_outgoing));

        tx_outgoing.send(format!("PASS {}", oauth_token)).ok();
        tx_outgoing.send(format!("NICK {}", username.to_lowercase())).ok();
        tx_outgoing
            .send("CAP REQ :twitch.tv/commands twitch.tv/tags".to_string())
            .ok();

        let read_task = tokio::spawn(Self::reader_loop(read_half, tx_incoming, tx_outgoing.clone()));

        Self {
            raw_outgoing: tx_outgoing,
            incoming: Some(rx_incoming),
            read_task,
            write_task,
        }
    }

    async fn reader_loop<R>(
        read_half: R,
        tx_incoming: mpsc::UnboundedSender<IrcIncomingEvent>,
        tx_outgoing: mpsc::UnboundedSender<String>,
    ) where
        R: tokio::io::AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(read_half);
        let mut line_buffer = String::new();

        loop {
            line_buffer.clear();
            match reader.read_line(&mut line_buffer).await {
                Ok(0) => {
                    info!("(TwitchIrcClient) read_loop => EOF");
                    break;
                }
                Ok(_) => {
                    let line = line_buffer.trim_end();
                    if line.is_empty() {
                        continue;
                    }
                    debug!("<< {}", line);

                    let parsed = ParsedTwitchMsg::parse_irc_line(line);
                    let evt = IrcIncomingEvent::from_parsed(&parsed);

                    match evt.command.as_str() {
                        "PING" => {
                            let payload = parsed.trailing.as_deref().unwrap_or("tmi.twitch.tv");
                            tx_outgoing.send(format!("PONG :{}", payload)).ok();
                            debug!("Auto PONG -> {}", payload);
                            continue;
                        }
                        "NOTICE" => {
                            if let Some(text) = &evt.text {
                                warn!("(TwitchIrcClient) NOTICE => {}", text);
                            }
                        }
                        "RECONNECT" => {
                            warn!("(TwitchIrcClient) server requested a reconnect");
                        }
                        _ => {}
                    }

                    if tx_incoming.send(evt).is_err() {
                        debug!("(TwitchIrcClient) incoming receiver dropped");
                        break;
                    }
                }
                Err(e) => {
                    error!("(TwitchIrcClient) read error => {:?}", e);
                    break;
                }
            }
        }

        info!("(TwitchIrcClient) reader_loop ended.");
    }

    async fn writer_loop<W>(write_half: W, mut rx_outgoing: mpsc::UnboundedReceiver<String>)
    where
        W: tokio::io::AsyncWrite + Unpin,
    {
        let mut writer = BufWriter::new(write_half);

        while let Some(line) = rx_outgoing.recv().await {
            if line.starts_with("PASS ") {
                debug!(">> PASS oauth:***");
            } else {
                debug!(">> {}", line);
            }
            let framed = format!("{line}\r\n");
            if let Err(e) = writer.write_all(framed.as_bytes()).await {
                error!("writer error => {:?}", e);
                break;
            }
            if let Err(e) = writer.flush().await {
                error!("writer flush error => {:?}", e);
                break;
            }
        }

        info!("(TwitchIrcClient) writer_loop ended.");
    }

    /// A cloneable handle for queueing raw lines.
    pub fn outgoing(&self) -> mpsc::UnboundedSender<String> {
        self.raw_outgoing.clone()
    }

    pub fn send_raw_line(&self, line: &str) {
        let _ = self.raw_outgoing.send(line.to_string());
    }

    pub fn join_channel(&self, channel: &str) {
        self.send_raw_line(&format!("JOIN {}", channel));
    }

    pub fn part_channel(&self, channel: &str) {
        self.send_raw_line(&format!("PART {}", channel));
    }

    pub fn shutdown(self) {
        self.read_task.abort();
        self.write_task.abort();
    }
}

impl Drop for TwitchIrcClient {
    fn drop(&mut self) {
        self.read_task.abort();
        self.write_task.abort();
    }
}

/// Opens IRC sessions. The runtime asks for a fresh one after every lost connection.
#[async_trait]
pub trait IrcConnector: Send + Sync {
    async fn connect(&self, username: &str, oauth_token: &str) -> io::Result<TwitchIrcClient>;
}

/// Connects to `irc.chat.twitch.tv` over TLS.
pub struct TlsIrcConnector;

#[async_trait]
impl IrcConnector for TlsIrcConnector {
    async fn connect(&self, username: &str, oauth_token: &str) -> io::Result<TwitchIrcClient> {
        TwitchIrcClient::connect(username, oauth_token).await
    }
}

/// Builds a `PRIVMSG` line. Line breaks in `message` are folded into spaces so a reply
/// can never smuggle a second IRC command.
pub fn privmsg_line(channel: &str, message: &str) -> String {
    let flat: String = message
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();
    format!("PRIVMSG {} :{}", channel, flat)
}
