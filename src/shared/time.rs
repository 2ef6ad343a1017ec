//! Wall-clock abstraction
//!
//! Presence expiry is evaluated against "now" at read time, so every
//! component that compares timestamps takes a [`Clock`] instead of calling
//! `Utc::now()` directly. Tests drive time with [`ManualClock`].

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub type SharedClock = Arc<dyn Clock>;

pub fn system_clock() -> SharedClock {
    Arc::new(SystemClock)
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    time: Arc<RwLock<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            time: Arc::new(RwLock::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut t = self.time.write().unwrap_or_else(|e| e.into_inner());
        *t += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        let mut t = self.time.write().unwrap_or_else(|e| e.into_inner());
        *t = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.time.read().unwrap_or_else(|e| e.into_inner())
    }
}
