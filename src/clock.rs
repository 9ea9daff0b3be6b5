//! Provides the current date for resolving the "today" filter.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone, Tz};

use crate::Error;

/// A source for today's date.
///
/// Any closure returning a [Date] is a clock, which lets tests fix or advance
/// the date.
pub trait Clock {
    /// The current calendar date.
    fn today(&self) -> Date;
}

impl<F> Clock for F
where
    F: Fn() -> Date,
{
    fn today(&self) -> Date {
        self()
    }
}

/// Reads the date from the system clock each time it is asked.
#[derive(Clone, Copy)]
pub enum SystemClock {
    /// Uses a named timezone, following daylight saving changes.
    Timezone(&'static Tz),
    /// Uses the system's local offset at the time of asking, so daylight
    /// saving changes during a session are followed.
    ///
    /// `fallback` is used whenever the local offset cannot be determined.
    Local {
        /// The offset to use if the system cannot provide one.
        fallback: UtcOffset,
    },
    /// Uses a fixed offset from UTC.
    Offset(UtcOffset),
}

impl SystemClock {
    /// Create a clock for a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the name is not a known timezone.
    pub fn with_timezone(canonical_timezone: &str) -> Result<Self, Error> {
        time_tz::timezones::get_by_name(canonical_timezone)
            .map(SystemClock::Timezone)
            .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))
    }

    /// Create a clock using the system's local offset from UTC.
    ///
    /// The offset is looked up again every time the date is read. If it cannot
    /// be determined, which can happen on some platforms once the process has
    /// spawned threads, the offset found now is used instead, or UTC if there
    /// is none.
    pub fn local() -> Self {
        let fallback = match UtcOffset::current_local_offset() {
            Ok(offset) => offset,
            Err(error) => {
                tracing::warn!("Could not determine the local UTC offset, using UTC: {error}");
                UtcOffset::UTC
            }
        };

        SystemClock::Local { fallback }
    }

    fn offset_now(&self, now: &OffsetDateTime) -> UtcOffset {
        match self {
            SystemClock::Timezone(timezone) => timezone.get_offset_utc(now).to_utc(),
            SystemClock::Local { fallback } => {
                UtcOffset::local_offset_at(*now).unwrap_or(*fallback)
            }
            SystemClock::Offset(offset) => *offset,
        }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> Date {
        let now = OffsetDateTime::now_utc();

        now.to_offset(self.offset_now(&now)).date()
    }
}
