use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::Error;
use crate::services::twitch::builtin_commands::text_command::TextCommand;
use crate::services::twitch::command_service::ChatCommand;

/// Something that can enumerate command definitions at load time.
///
/// The outer `Result` fails when the source as a whole cannot be read; each inner
/// `Result` is one definition, which may be malformed on its own.
pub trait CommandSource: Send + Sync {
    fn describe(&self) -> String;
    fn load(&self) -> Result<Vec<Result<Arc<dyn ChatCommand>, Error>>, Error>;
}

/// One entry of a commands file.
#[derive(Debug, Clone, Deserialize)]
pub struct TextCommandDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub usage: Option<String>,
    pub response: String,
    #[serde(default)]
    pub cooldown_seconds: Option<u32>,
}

/// Reads canned-response commands from a JSON array on disk:
///
/// ```json
/// [{ "name": "discord", "response": "Join us: https://discord.gg/xyz", "cooldown_seconds": 10 }]
/// ```
pub struct FileCommandSource {
    path: PathBuf,
}

impl FileCommandSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn parse_entry(value: serde_json::Value) -> Result<Arc<dyn ChatCommand>, Error> {
        let def: TextCommandDef = serde_json::from_value(value)?;
        let name = def.name.trim().to_lowercase();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(Error::Parse(format!("invalid command name '{}'", def.name)));
        }
        if def.response.trim().is_empty() {
            return Err(Error::Parse(format!("command '{}' has an empty response", name)));
        }
        Ok(Arc::new(TextCommand::from_def(name, def)))
    }
}

impl CommandSource for FileCommandSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn load(&self) -> Result<Vec<Result<Arc<dyn ChatCommand>, Error>>, Error> {
        let raw = fs::read_to_string(&self.path)?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        let serde_json::Value::Array(entries) = value else {
            return Err(Error::Parse(format!(
                "{} must contain a JSON array of commands",
                self.path.display()
            )));
        };
        Ok(entries.into_iter().map(Self::parse_entry).collect())
    }
}
