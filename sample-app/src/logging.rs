//! Stderr tracing with a runtime adjustable level

use std::str::FromStr;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use strum::AsRefStr;
use strum::Display;
use strum::EnumString;
use tracing::Level;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the tracing level
pub const LOG_LEVEL_ENV: &str = "TYPED_OAS_LOG";

static CURRENT_LEVEL: AtomicU8 = AtomicU8::new(TracingLevel::Warn.as_u8());

/// Level filter shared by every layer, adjustable at runtime
#[derive(Clone)]
pub struct DynamicFilter;

impl<S> Layer<S> for DynamicFilter
where
    S: Subscriber,
{
    fn enabled(
        &self,
        metadata: &tracing::Metadata<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) -> bool {
        let level_value = match *metadata.level() {
            Level::ERROR => TracingLevel::Error,
            Level::WARN => TracingLevel::Warn,
            Level::INFO => TracingLevel::Info,
            Level::DEBUG => TracingLevel::Debug,
            Level::TRACE => TracingLevel::Trace,
        }
        .as_u8();
        level_value <= CURRENT_LEVEL.load(Ordering::Relaxed)
    }
}

/// Tracing levels accepted in [`LOG_LEVEL_ENV`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Progress messages
    Info,
    /// Component registration and classification decisions
    Debug,
    /// Every descriptor and reference
    Trace,
}

impl TracingLevel {
    const fn as_u8(self) -> u8 {
        match self {
            Self::Error => 0,
            Self::Warn => 1,
            Self::Info => 2,
            Self::Debug => 3,
            Self::Trace => 4,
        }
    }

    /// Parse a level, with a message listing the valid ones on failure
    pub fn parse(level: &str) -> Result<Self, String> {
        Self::from_str(level.trim()).map_err(|_| {
            format!(
                "Invalid tracing level '{level}'. Valid levels are: error, warn, info, debug, trace"
            )
        })
    }

    /// Install a stderr subscriber filtered by [`DynamicFilter`], starting at
    /// the level named in [`LOG_LEVEL_ENV`] (warn when unset)
    pub fn init_stderr_tracing() {
        let requested = std::env::var(LOG_LEVEL_ENV).ok();
        let parsed = requested.as_deref().map(Self::parse).transpose();
        let level = match &parsed {
            Ok(Some(level)) => *level,
            Ok(None) | Err(_) => Self::Warn,
        };
        Self::set_tracing_level(level);

        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true);

        Registry::default()
            .with(DynamicFilter)
            .with(stderr_layer)
            .init();

        if let Err(message) = parsed {
            tracing::warn!(variable = LOG_LEVEL_ENV, "{message}");
        }
        tracing::debug!(level = %level, "Tracing initialized");
    }

    /// Current level
    pub fn current() -> Self {
        match CURRENT_LEVEL.load(Ordering::Relaxed) {
            0 => Self::Error,
            2 => Self::Info,
            3 => Self::Debug,
            4 => Self::Trace,
            _ => Self::Warn,
        }
    }

    /// Change the level for every subsequent event
    pub fn set_tracing_level(level: Self) { CURRENT_LEVEL.store(level.as_u8(), Ordering::Relaxed); }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_levels_parse_case_insensitively() {
        assert_eq!(TracingLevel::parse("DEBUG").unwrap(), TracingLevel::Debug);
        assert_eq!(TracingLevel::parse(" trace ").unwrap(), TracingLevel::Trace);
        assert_eq!(TracingLevel::Info.to_string(), "info");

        let message = TracingLevel::parse("verbose").unwrap_err();
        assert!(message.contains("'verbose'"));
    }

    #[test]
    fn test_level_round_trips_through_filter_state() {
        TracingLevel::set_tracing_level(TracingLevel::Trace);
        assert_eq!(TracingLevel::current(), TracingLevel::Trace);
        TracingLevel::set_tracing_level(TracingLevel::Warn);
        assert_eq!(TracingLevel::current(), TracingLevel::Warn);
    }
}
