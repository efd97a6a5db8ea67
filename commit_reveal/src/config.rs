use crate::*;
use std::env::var;

/// Environment variable holding the reveal delay, in seconds
pub const REVEAL_DELAY_ENV: &str = "COMMIT_REVEAL_DELAY";

/// Default minimum time between a commit and its reveal: two minutes
pub const DEFAULT_REVEAL_DELAY: u64 = 120;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Seconds that must pass after a commit before it may be revealed
    #[serde(default = "default_reveal_delay")]
    pub reveal_delay: u64,
}

fn default_reveal_delay() -> u64 {
    DEFAULT_REVEAL_DELAY
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reveal_delay: default_reveal_delay(),
        }
    }
}

impl Config {
    pub fn with_reveal_delay(reveal_delay: u64) -> Self {
        Config { reveal_delay }
    }

    /// Defaults, overridden by `COMMIT_REVEAL_DELAY` when it is set
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Config::default();

        if let Ok(val) = var(REVEAL_DELAY_ENV) {
            config.reveal_delay = parse_reveal_delay(&val)?;
        }

        Ok(config)
    }
}

/// Parse a reveal delay given as whole seconds
pub fn parse_reveal_delay(val: &str) -> Result<u64, Error> {
    val.trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(REVEAL_DELAY_ENV, val.to_owned()))
}
