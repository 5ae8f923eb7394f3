// ================================================================
// File: twitchcord-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found error: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A chat or slash command handler failed while executing.
    #[error("Command error: {0}")]
    Command(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<serde_json::Value, Error> {
        Ok(serde_json::from_str(raw)?)
    }

    #[test]
    fn library_errors_convert_with_question_mark() {
        assert!(matches!(parse("{not json"), Err(Error::Json(_))));

        let io: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "commands.json").into();
        assert!(matches!(io, Error::Io(_)));
        assert_eq!(Error::Command("boom".into()).to_string(), "Command error: boom");
    }
}
