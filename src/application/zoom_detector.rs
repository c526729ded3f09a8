// Zoom detection - is the user viewing a narrower window than was loaded?
use crate::application::series_grouper::SeriesGroups;
use crate::domain::telemetry::{Series, TimeRange};

/// Display width divided by covered width. `None` when the covered range is
/// unknown or has zero width.
pub fn ratio(covered: Option<TimeRange>, display: TimeRange) -> Option<f64> {
    let covered = covered?;
    let covered_width = covered.width();
    if covered_width == 0 {
        return None;
    }
    Some(display.width() as f64 / covered_width as f64)
}

/// A bucket is described by its first series: the covered range and the
/// limit flag are set per query, not per level.
pub fn is_zoomed(bucket: &[Series], display: TimeRange) -> bool {
    let Some(first) = bucket.first() else {
        return false;
    };
    if first.is_limited {
        return false;
    }
    matches!(ratio(first.covered_range, display), Some(r) if r < 1.0)
}

/// Whether the reload control is shown for the whole list.
pub fn any_zoomed(groups: &SeriesGroups, display: TimeRange) -> bool {
    groups.iter().any(|(_, bucket)| is_zoomed(bucket, display))
}
