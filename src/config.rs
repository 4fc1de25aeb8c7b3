use crate::model::{Money, Ms};

pub const DEFAULT_CANCELLATION_WINDOW_MS: Ms = 2 * 60 * 60 * 1000;
pub const DEFAULT_REFUND_PERCENT: u32 = 90;

/// Engine policy knobs, passed to [`crate::Engine::new`] at construction.
/// Nothing reads process-global state after that, so tests can vary the
/// window and refund share freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long after commit a booking may still be cancelled.
    pub cancellation_window: Ms,
    /// Share of the total refunded on cancellation, in percent.
    pub refund_percent: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cancellation_window: DEFAULT_CANCELLATION_WINDOW_MS,
            refund_percent: DEFAULT_REFUND_PERCENT,
        }
    }
}

impl EngineConfig {
    /// Read overrides from `FRONTDESK_CANCELLATION_WINDOW_MS` and
    /// `FRONTDESK_REFUND_PERCENT`, falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cancellation_window: std::env::var("FRONTDESK_CANCELLATION_WINDOW_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.cancellation_window),
            refund_percent: std::env::var("FRONTDESK_REFUND_PERCENT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.refund_percent),
        }
    }

    /// Refund due when a booking of `total` is cancelled inside the window.
    /// Integer minor-unit math, truncating.
    pub fn refund_amount(&self, total: Money) -> Money {
        total * self.refund_percent as Money / 100
    }

    pub fn within_cancellation_window(&self, created_at: Ms, now: Ms) -> bool {
        now <= created_at + self.cancellation_window
    }

    /// Last instant at which cancellation is still accepted.
    pub fn cancellation_deadline(&self, created_at: Ms) -> Ms {
        created_at + self.cancellation_window
    }
}
