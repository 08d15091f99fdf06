use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Value Object - millisecond timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, From, Into, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Latest instant a JS `Date` can hold.
    pub const MAX: Self = Self(8_640_000_000_000_000);

    pub fn from_millis(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// Shift by a signed millisecond offset, saturating at both ends of the axis.
    pub fn offset(&self, delta_ms: i64) -> Self {
        if delta_ms >= 0 {
            Self(self.0.saturating_add(delta_ms as u64))
        } else {
            Self(self.0.saturating_sub(delta_ms.unsigned_abs()))
        }
    }
}

/// Value Object - fixed chunk duration of the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, AsRefStr, Serialize, Deserialize)]
pub enum ChunkInterval {
    #[strum(serialize = "1m")]
    #[serde(rename = "1m")]
    OneMinute,

    #[strum(serialize = "5m")]
    #[serde(rename = "5m")]
    FiveMinutes,

    #[default]
    #[strum(serialize = "15m")]
    #[serde(rename = "15m")]
    FifteenMinutes,

    #[strum(serialize = "30m")]
    #[serde(rename = "30m")]
    ThirtyMinutes,

    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    OneHour,

    #[strum(serialize = "4h")]
    #[serde(rename = "4h")]
    FourHours,

    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    OneDay,
}

impl ChunkInterval {
    pub fn minutes(&self) -> u32 {
        match self {
            Self::OneMinute => 1,
            Self::FiveMinutes => 5,
            Self::FifteenMinutes => 15,
            Self::ThirtyMinutes => 30,
            Self::OneHour => 60,
            Self::FourHours => 4 * 60,
            Self::OneDay => 24 * 60,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.minutes() as u64 * 60 * 1000
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|interval| interval.minutes() == minutes)
    }
}

impl std::fmt::Display for ChunkInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Value Object - `[from, to)` pair reported to the data store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[display(fmt = "[{}, {})", from, to)]
pub struct TimeRange {
    pub from: Timestamp,
    pub to: Timestamp,
}

impl TimeRange {
    pub fn new(from: Timestamp, to: Timestamp) -> Self {
        Self { from, to }
    }

    pub fn duration_ms(&self) -> u64 {
        self.to.value().saturating_sub(self.from.value())
    }

    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.from <= timestamp && timestamp < self.to
    }

    pub fn center(&self) -> Timestamp {
        Timestamp(self.from.value() + self.duration_ms() / 2)
    }

    pub fn as_pair(&self) -> [u64; 2] {
        [self.from.value(), self.to.value()]
    }
}
