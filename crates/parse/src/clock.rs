use chrono::{DateTime, Datelike, FixedOffset, Utc};

/// Wall-clock collaborator.
///
/// Injected rather than read ambiently so memo timestamps and yearless-date
/// completion stay deterministic under test.
pub trait Clock: Send + Sync {
    /// Current instant, rendered in the service's fixed display offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Calendar year used to complete dates that omit one.
    fn current_year(&self) -> i32 {
        self.now().year()
    }
}

/// Production clock: system time shifted into a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// `None` when the offset is outside `-23..=23` hours.
    pub fn from_offset_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours * 3600).map(Self::new)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Clock pinned to a single instant, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn at(instant: DateTime<FixedOffset>) -> Self {
        Self { instant }
    }

    /// Pins the clock to `millis` since the Unix epoch, displayed at `offset`.
    pub fn from_epoch_millis(millis: i64, offset: FixedOffset) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(|utc| Self::at(utc.with_timezone(&offset)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.instant
    }
}
