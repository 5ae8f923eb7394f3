// src/lib.rs

pub mod config;
pub mod platforms;
pub mod services;
pub mod tasks;
pub mod utils;
pub mod test_utils;

pub use twitchcord_common::error::Error;
pub use twitchcord_common::models;
pub use config::BotConfig;
