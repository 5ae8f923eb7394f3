use parking_lot::RwLock;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Live,
    Clips,
}

impl TargetKind {
    pub fn label(&self) -> &'static str {
        match self {
            TargetKind::Live => "live",
            TargetKind::Clips => "clips",
        }
    }
}

/// Discord channel ids the pollers post into. `/setup` changes them at runtime and
/// the pollers read them fresh for every notification.
#[derive(Debug, Default)]
pub struct NotificationTargets {
    live: RwLock<Option<String>>,
    clips: RwLock<Option<String>>,
}

impl NotificationTargets {
    pub fn new(live: Option<String>, clips: Option<String>) -> Self {
        Self {
            live: RwLock::new(live),
            clips: RwLock::new(clips),
        }
    }

    fn slot(&self, kind: TargetKind) -> &RwLock<Option<String>> {
        match kind {
            TargetKind::Live => &self.live,
            TargetKind::Clips => &self.clips,
        }
    }

    pub fn get(&self, kind: TargetKind) -> Option<String> {
        self.slot(kind).read().clone()
    }

    pub fn set(&self, kind: TargetKind, channel_id: &str) {
        info!("Discord {} notifications now go to channel {}", kind.label(), channel_id);
        *self.slot(kind).write() = Some(channel_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_only_one_slot() {
        let targets = NotificationTargets::new(Some("1".into()), None);
        targets.set(TargetKind::Clips, "2");
        assert_eq!(targets.get(TargetKind::Live).as_deref(), Some("1"));
        assert_eq!(targets.get(TargetKind::Clips).as_deref(), Some("2"));
    }
}
