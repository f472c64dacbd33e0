use crate::config::TrackerConfig;

/// Commands a key chord can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerCommand {
    SwitchTabs,
}

impl TrackerCommand {
    pub fn parse(name: &str, config: &TrackerConfig) -> Option<Self> {
        (name == config.switch_command).then_some(Self::SwitchTabs)
    }
}
