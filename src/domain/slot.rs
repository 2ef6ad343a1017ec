//! Bookable slot derivation
//!
//! Slots are start times on a fixed grid: a cursor starts at the venue's
//! opening time and advances by the slot duration while it is strictly
//! before closing time. Only the start is checked against closing, so the
//! last slot may run past closing.

use chrono::{Duration, NaiveTime, Timelike};

const MINUTES_PER_DAY: u32 = 24 * 60;

fn minutes_since_midnight(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

fn from_minutes(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Ordered start times for a venue's operating window.
///
/// Returns an empty list (never an error) when the window is empty or the
/// duration is zero.
pub fn generate_slots(opening: NaiveTime, closing: NaiveTime, duration_minutes: u32) -> Vec<NaiveTime> {
    if duration_minutes == 0 {
        return Vec::new();
    }

    let end = minutes_since_midnight(closing);
    let mut cursor = minutes_since_midnight(opening);
    let mut slots = Vec::new();

    while cursor < end && cursor < MINUTES_PER_DAY {
        if let Some(t) = from_minutes(cursor) {
            slots.push(t);
        }
        cursor += duration_minutes;
    }

    slots
}

/// `HH:MM`, zero padded.
pub fn format_slot(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Accepts `HH:MM` and `HH:MM:SS`; seconds are dropped.
pub fn parse_slot(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    let parsed = NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()?;
    parsed.with_second(0)
}

/// End of a slot starting at `start`. Wraps past midnight the same way a
/// time-of-day column would; venues are assumed not to span midnight.
pub fn slot_end(start: NaiveTime, duration_minutes: u32) -> NaiveTime {
    let (end, _) = start.overflowing_add_signed(Duration::minutes(i64::from(duration_minutes)));
    end
}
