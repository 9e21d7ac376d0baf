use crate::style::DEFAULT_LENGTH_UNIT;
use crate::value::Name;
use std::str::FromStr;
use std::time::Duration;

/// Priority native style providers are attached with (application level).
pub const STYLE_PROVIDER_PRIORITY_APPLICATION: u32 = 600;

const ENV_PREFIX: &str = "NATIVE_RECONCILER_";

#[derive(Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    pub style_priority: u32,
    /// Unit appended to unitless numeric style values.
    pub length_unit: Name,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            style_priority: STYLE_PROVIDER_PRIORITY_APPLICATION,
            length_unit: DEFAULT_LENGTH_UNIT.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// Delay before the next tick is re-entered. Zero means "next scheduling
    /// opportunity", after already-due deferred work.
    pub tick_delay: Duration,
    /// Upper bound on how long `run` sleeps while only future work is pending.
    pub max_idle_sleep: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_delay: Duration::ZERO,
            max_idle_sleep: Duration::from_millis(16),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub adapter: AdapterConfig,
    pub event_loop: LoopConfig,
    /// `debug`, `info`, `warn`, `error`, or `nope` to disable logging.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            adapter: AdapterConfig::default(),
            event_loop: LoopConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults overridden by `NATIVE_RECONCILER_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    /// Malformed values are logged and the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(ms) = parse_var::<u64>("TICK_DELAY_MS", get("TICK_DELAY_MS")) {
            config.event_loop.tick_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>("IDLE_SLEEP_MS", get("IDLE_SLEEP_MS")) {
            config.event_loop.max_idle_sleep = Duration::from_millis(ms);
        }
        if let Some(priority) = parse_var::<u32>("STYLE_PRIORITY", get("STYLE_PRIORITY")) {
            config.adapter.style_priority = priority;
        }
        if let Some(unit) = get("LENGTH_UNIT").filter(|u| !u.trim().is_empty()) {
            config.adapter.length_unit = unit.trim().into();
        }
        if let Some(level) = get("LOG_LEVEL") {
            let level = level.trim().to_lowercase();
            match level.as_str() {
                "trace" | "debug" | "info" | "warn" | "error" | "nope" => config.log_level = level,
                _ => tracing::warn!(
                    "Ignoring {}LOG_LEVEL={:?}: expected trace, debug, info, warn, error or nope",
                    ENV_PREFIX,
                    level
                ),
            }
        }

        config
    }
}

fn parse_var<T: FromStr>(name: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}{}={:?}: not a number", ENV_PREFIX, name, raw);
            None
        }
    }
}
