//! Automatic reconnect policy.
//!
//! [`AutoReconnect`] is a [`DisconnectedListener`] that requests a new
//! connection attempt after every disconnection not initiated by the
//! application. The delay doubles with each attempt, starting at the
//! initial delay and capped at the maximum delay.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use mqtt_client_config::AutoReconnect;
//!
//! let policy = AutoReconnect::builder()
//!     .initial_delay(Duration::from_millis(500))
//!     .max_delay(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(2));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::listener::{DisconnectSource, DisconnectedContext, DisconnectedListener};
use super::transport::millis;

// ============================================================================
// Constants
// ============================================================================

/// Delay before the first reconnect attempt.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Upper bound for the reconnect delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(120);

// ============================================================================
// AutoReconnect
// ============================================================================

/// Exponential reconnect policy.
///
/// Only constructed through [`AutoReconnectBuilder::build`]; deserialization
/// applies the same checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawAutoReconnect")]
pub struct AutoReconnect {
    /// Delay before the first attempt.
    #[serde(with = "millis")]
    initial_delay: Duration,

    /// Largest delay between attempts.
    #[serde(with = "millis")]
    max_delay: Duration,
}

impl Default for AutoReconnect {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl AutoReconnect {
    /// Creates a builder starting from the default delays.
    #[inline]
    #[must_use]
    pub fn builder() -> AutoReconnectBuilder {
        AutoReconnectBuilder::default()
    }

    /// Returns the delay before the first attempt.
    #[inline]
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Returns the largest delay between attempts.
    #[inline]
    #[must_use]
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Returns the delay before attempt number `attempts` (zero based).
    #[must_use]
    pub fn delay_for_attempt(&self, attempts: u32) -> Duration {
        let factor = 1_u32.checked_shl(attempts).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Unchecked wire form of [`AutoReconnect`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAutoReconnect {
    #[serde(with = "millis")]
    initial_delay: Duration,
    #[serde(with = "millis")]
    max_delay: Duration,
}

impl TryFrom<RawAutoReconnect> for AutoReconnect {
    type Error = Error;

    fn try_from(raw: RawAutoReconnect) -> Result<Self> {
        AutoReconnect::builder()
            .initial_delay(raw.initial_delay)
            .max_delay(raw.max_delay)
            .build()
    }
}

impl DisconnectedListener for AutoReconnect {
    fn on_disconnected(&self, context: &DisconnectedContext) {
        if context.source() == DisconnectSource::User {
            return;
        }

        let reconnector = context.reconnector();
        let delay = self.delay_for_attempt(reconnector.attempts());
        reconnector.set_reconnect(true).set_delay(delay);

        debug!(
            attempts = reconnector.attempts(),
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "Automatic reconnect scheduled"
        );
    }
}

// ============================================================================
// AutoReconnectBuilder
// ============================================================================

/// Builder for [`AutoReconnect`].
#[derive(Debug, Clone)]
pub struct AutoReconnectBuilder {
    /// Delay before the first attempt.
    initial_delay: Duration,
    /// Largest delay between attempts.
    max_delay: Duration,
}

impl Default for AutoReconnectBuilder {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl AutoReconnectBuilder {
    /// Sets the delay before the first attempt.
    #[inline]
    #[must_use]
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the largest delay between attempts.
    #[inline]
    #[must_use]
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Builds the policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the initial delay is zero or larger
    /// than the maximum delay.
    pub fn build(self) -> Result<AutoReconnect> {
        if self.initial_delay.is_zero() {
            return Err(Error::validation(
                "Initial reconnect delay must be greater than zero",
            ));
        }
        if self.initial_delay > self.max_delay {
            return Err(Error::validation(format!(
                "Initial reconnect delay ({:?}) must not exceed maximum delay ({:?})",
                self.initial_delay, self.max_delay
            )));
        }

        Ok(AutoReconnect {
            initial_delay: self.initial_delay,
            max_delay: self.max_delay,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
