// Series grouping - partition log-volume series by originating query
use crate::domain::error::GroupingError;
use crate::domain::telemetry::{Series, TimeRange, ValueRange};
use std::collections::HashMap;

/// Series bucketed by group key, in the order keys were first seen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesGroups {
    buckets: Vec<(String, Vec<Series>)>,
}

impl SeriesGroups {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Series])> {
        self.buckets
            .iter()
            .map(|(key, series)| (key.as_str(), series.as_slice()))
    }
}

impl IntoIterator for SeriesGroups {
    type Item = (String, Vec<Series>);
    type IntoIter = std::vec::IntoIter<(String, Vec<Series>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter()
    }
}

/// Stable partition by `group_key`. Fails on the first series without a key.
pub fn group(series: Vec<Series>) -> Result<SeriesGroups, GroupingError> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<Series>)> = Vec::new();

    for (position, s) in series.into_iter().enumerate() {
        if s.group_key.is_empty() {
            return Err(GroupingError::MissingGroupKey { index: position });
        }

        match index.get(&s.group_key) {
            Some(&slot) => buckets[slot].1.push(s),
            None => {
                index.insert(s.group_key.clone(), buckets.len());
                buckets.push((s.group_key.clone(), vec![s]));
            }
        }
    }

    let groups = SeriesGroups { buckets };
    tracing::debug!(
        "Grouped log volume into buckets {:?}",
        groups.keys().collect::<Vec<_>>()
    );
    Ok(groups)
}

/// Minimum and maximum over every sample of every series, so all panels
/// share one vertical scale. `None` when there is nothing to measure.
pub fn union_range(series: &[Series]) -> Option<ValueRange> {
    series
        .iter()
        .flat_map(|s| s.points.iter())
        .map(|p| p.value)
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<ValueRange>, v| match acc {
            None => Some(ValueRange { min: v, max: v }),
            Some(r) => Some(ValueRange {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
}

/// Shared time axis: the span of all covered ranges, or `default` if no
/// series reports one.
pub fn aligned_range(series: &[Series], default: TimeRange) -> TimeRange {
    let covered = series.iter().filter_map(|s| s.covered_range);

    let bounds = covered.fold(None, |acc: Option<(i64, i64)>, r| match acc {
        None => Some((r.start(), r.end())),
        Some((from, to)) => Some((from.min(r.start()), to.max(r.end()))),
    });

    match bounds {
        // Both bounds come from valid ranges, so from <= to.
        Some((from, to)) => TimeRange::new(from, to).unwrap_or(default),
        None => default,
    }
}
