use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::Error;
use crate::services::twitch::command_service::ChatCommand;
use crate::services::twitch::command_source::CommandSource;

/// Immutable name -> handler map. Built once, then only ever replaced wholesale.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn ChatCommand>>,
}

impl CommandRegistry {
    /// Builds a registry from every source in order.
    ///
    /// An unreadable source fails the whole load. A malformed single definition is logged
    /// and skipped. When two definitions share a name the later one wins.
    pub fn load(sources: &[&dyn CommandSource]) -> Result<Self, Error> {
        let mut commands: HashMap<String, Arc<dyn ChatCommand>> = HashMap::new();

        for source in sources {
            let entries = source.load()?;
            info!("Loading {} commands from {}...", entries.len(), source.describe());

            for entry in entries {
                let cmd = match entry {
                    Ok(c) => c,
                    Err(e) => {
                        warn!("Skipping malformed command in {}: {}", source.describe(), e);
                        continue;
                    }
                };

                let name = cmd.name().trim().to_lowercase();
                if name.is_empty() || name.chars().any(char::is_whitespace) {
                    warn!("Skipping command with invalid name '{}' in {}", cmd.name(), source.describe());
                    continue;
                }

                if commands.insert(name.clone(), cmd).is_some() {
                    warn!("Command '{}' defined more than once; keeping the last definition", name);
                }
                debug!("Loaded command: {}", name);
            }
        }

        Ok(Self { commands })
    }

    /// Exact lookup; callers pass the already case-folded name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ChatCommand>> {
        self.commands.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands sorted by name, for listing at startup.
    pub fn commands(&self) -> Vec<Arc<dyn ChatCommand>> {
        let mut all: Vec<_> = self.commands.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }
}
