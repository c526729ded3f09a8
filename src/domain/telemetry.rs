// Log-volume telemetry domain models
use super::error::ReversedRangeError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

/// Absolute time span in epoch milliseconds. `from <= to` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    from: i64,
    to: i64,
}

#[derive(Deserialize)]
struct RawTimeRange {
    from: i64,
    to: i64,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = ReversedRangeError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.from, raw.to)
    }
}

impl TimeRange {
    pub fn new(from: i64, to: i64) -> Result<Self, ReversedRangeError> {
        if from > to {
            return Err(ReversedRangeError { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn start(&self) -> i64 {
        self.from
    }

    pub fn end(&self) -> i64 {
        self.to
    }

    pub fn width(&self) -> u64 {
        self.to.abs_diff(self.from)
    }
}

/// Vertical extent shared by every rendered panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// One histogram series of a log-volume response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// refId of the query that produced this series.
    #[serde(default)]
    pub group_key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub points: Vec<TimeSeriesPoint>,
    /// Span the data was loaded for; may be wider than what is displayed.
    #[serde(default)]
    pub covered_range: Option<TimeRange>,
    /// Truncated by a server-side limit.
    #[serde(default)]
    pub is_limited: bool,
}

impl Series {
    pub fn new(group_key: String, name: String, points: Vec<TimeSeriesPoint>) -> Self {
        Self {
            group_key,
            name,
            points,
            covered_range: None,
            is_limited: false,
        }
    }

    pub fn with_covered_range(mut self, range: TimeRange) -> Self {
        self.covered_range = Some(range);
        self
    }

    pub fn limited(mut self) -> Self {
        self.is_limited = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingState {
    #[default]
    NotStarted,
    Loading,
    Streaming,
    Done,
    Error,
}

/// Result of a log-volume query as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogsVolumeResponse {
    #[serde(default)]
    pub state: LoadingState,
    #[serde(default)]
    pub data: Vec<Series>,
    #[serde(default)]
    pub error: Option<String>,
}

impl LogsVolumeResponse {
    pub fn done(data: Vec<Series>) -> Self {
        Self {
            state: LoadingState::Done,
            data,
            error: None,
        }
    }
}
