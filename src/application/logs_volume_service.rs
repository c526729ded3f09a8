// Logs volume service - Use case for building the log-volume panel list
use crate::application::series_grouper::{aligned_range, group, union_range};
use crate::application::telemetry_repository::LogsVolumeSource;
use crate::application::zoom_detector::{any_zoomed, is_zoomed};
use crate::domain::error::GroupingError;
use crate::domain::telemetry::{LoadingState, LogsVolumeResponse, Series, TimeRange, ValueRange};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

pub const LOAD_ERROR_TITLE: &str = "Failed to load log volume for this query";

/// Everything a chart renderer needs for one query's histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumePanel {
    pub group_key: String,
    pub series: Vec<Series>,
    /// Shared across all panels of the list.
    pub value_range: Option<ValueRange>,
    /// Shared time axis, aligned to the loaded data.
    pub time_range: TimeRange,
    pub display_range: TimeRange,
    pub is_zoomed: bool,
    /// Level filtering only works when a single query is shown.
    pub hidden_series_toggle: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PanelListView {
    Loading,
    Error { title: String, message: String },
    Panels { panels: Vec<VolumePanel>, show_reload: bool },
}

#[derive(Debug, Error)]
pub enum LogsVolumeError {
    #[error(transparent)]
    Grouping(#[from] GroupingError),

    #[error("failed to load log volume: {0:#}")]
    Source(anyhow::Error),
}

/// Turn a log-volume response into the panel list shown for the display range.
pub fn build_panel_list(
    response: LogsVolumeResponse,
    display_range: TimeRange,
) -> Result<PanelListView, GroupingError> {
    if response.state == LoadingState::Loading {
        return Ok(PanelListView::Loading);
    }

    let error = match (response.error, response.state) {
        (Some(message), _) => Some(message),
        (None, LoadingState::Error) => Some("Unknown error".to_string()),
        (None, _) => None,
    };
    if let Some(message) = error {
        return Ok(PanelListView::Error {
            title: LOAD_ERROR_TITLE.to_string(),
            message,
        });
    }

    let value_range = union_range(&response.data);
    let time_range = aligned_range(&response.data, display_range);
    let groups = group(response.data)?;

    if groups.is_empty() {
        tracing::debug!("Log volume response carries no series");
    }

    let show_reload = any_zoomed(&groups, display_range);
    let single = groups.len() == 1;

    let panels = groups
        .into_iter()
        .map(|(group_key, series)| {
            let zoomed = is_zoomed(&series, display_range);
            VolumePanel {
                group_key,
                series,
                value_range,
                time_range,
                display_range,
                is_zoomed: zoomed,
                hidden_series_toggle: single,
            }
        })
        .collect();

    Ok(PanelListView::Panels {
        panels,
        show_reload,
    })
}

#[derive(Clone)]
pub struct LogsVolumeService {
    source: Arc<dyn LogsVolumeSource>,
}

impl LogsVolumeService {
    pub fn new(source: Arc<dyn LogsVolumeSource>) -> Self {
        Self { source }
    }

    pub fn panel_list(
        &self,
        response: LogsVolumeResponse,
        display_range: TimeRange,
    ) -> Result<PanelListView, LogsVolumeError> {
        let view = build_panel_list(response, display_range)?;
        if let PanelListView::Panels { panels, show_reload } = &view {
            tracing::debug!(
                "Built {} log volume panels (reload shown: {})",
                panels.len(),
                show_reload
            );
        }
        Ok(view)
    }

    /// Re-fetch log volume for the current display range.
    pub async fn reload(&self, display_range: TimeRange) -> Result<PanelListView, LogsVolumeError> {
        let (from, to) = (display_range.start(), display_range.end());
        tracing::info!("Reloading log volume for {}..{}", from, to);
        let response = self
            .source
            .load_logs_volume(display_range)
            .await
            .map_err(LogsVolumeError::Source)?;
        self.panel_list(response, display_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::TimeSeriesPoint;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn range(from: i64, to: i64) -> TimeRange {
        TimeRange::new(from, to).unwrap()
    }

    fn series(key: &str, name: &str, values: &[f64], covered: TimeRange) -> Series {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| TimeSeriesPoint::new(i as i64, *v))
            .collect();
        Series::new(key.to_string(), name.to_string(), points).with_covered_range(covered)
    }

    struct FakeSource {
        response: Option<LogsVolumeResponse>,
        requested: Mutex<Vec<TimeRange>>,
    }

    #[async_trait]
    impl LogsVolumeSource for FakeSource {
        async fn load_logs_volume(&self, range: TimeRange) -> anyhow::Result<LogsVolumeResponse> {
            self.requested.lock().unwrap().push(range);
            self.response
                .clone()
                .ok_or_else(|| anyhow::anyhow!("upstream unavailable"))
        }
    }

    #[test]
    fn test_loading_state() {
        let response = LogsVolumeResponse {
            state: LoadingState::Loading,
            ..Default::default()
        };
        assert_eq!(
            build_panel_list(response, range(0, 10)).unwrap(),
            PanelListView::Loading
        );
    }

    #[test]
    fn test_error_state() {
        let response = LogsVolumeResponse {
            state: LoadingState::Error,
            data: Vec::new(),
            error: Some("timeout".to_string()),
        };
        assert_eq!(
            build_panel_list(response, range(0, 10)).unwrap(),
            PanelListView::Error {
                title: LOAD_ERROR_TITLE.to_string(),
                message: "timeout".to_string()
            }
        );
    }

    #[test]
    fn test_error_state_without_message() {
        let response = LogsVolumeResponse {
            state: LoadingState::Error,
            data: Vec::new(),
            error: None,
        };
        assert_eq!(
            build_panel_list(response, range(0, 10)).unwrap(),
            PanelListView::Error {
                title: LOAD_ERROR_TITLE.to_string(),
                message: "Unknown error".to_string()
            }
        );
    }

    #[test]
    fn test_error_message_wins_over_done_state() {
        let response = LogsVolumeResponse {
            state: LoadingState::Done,
            data: vec![series("A", "info", &[1.0], range(0, 10))],
            error: Some("partial failure".to_string()),
        };
        assert_eq!(
            build_panel_list(response, range(0, 10)).unwrap(),
            PanelListView::Error {
                title: LOAD_ERROR_TITLE.to_string(),
                message: "partial failure".to_string()
            }
        );
    }

    #[test]
    fn test_panels_share_ranges_and_flag_reload() {
        let response = LogsVolumeResponse::done(vec![
            series("A", "info", &[1.0, 8.0], range(0, 100)),
            series("B", "error", &[0.5, 2.0], range(0, 40)),
            series("A", "error", &[3.0], range(0, 100)),
        ]);

        let view = build_panel_list(response, range(0, 50)).unwrap();
        let PanelListView::Panels { panels, show_reload } = view else {
            panic!("expected panels");
        };

        assert!(show_reload);
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].group_key, "A");
        assert_eq!(panels[0].series.len(), 2);
        assert!(panels[0].is_zoomed);
        assert!(!panels[1].is_zoomed);
        for panel in &panels {
            assert_eq!(panel.value_range, Some(ValueRange { min: 0.5, max: 8.0 }));
            assert_eq!(panel.time_range, range(0, 100));
            assert_eq!(panel.display_range, range(0, 50));
            assert!(!panel.hidden_series_toggle);
        }
    }

    #[test]
    fn test_single_panel_allows_hiding_series() {
        let response = LogsVolumeResponse::done(vec![series("A", "info", &[1.0], range(0, 10))]);
        let view = build_panel_list(response, range(0, 10)).unwrap();
        let PanelListView::Panels { panels, show_reload } = view else {
            panic!("expected panels");
        };
        assert!(!show_reload);
        assert!(panels[0].hidden_series_toggle);
    }

    #[test]
    fn test_missing_group_key_surfaces() {
        let response = LogsVolumeResponse::done(vec![series("", "info", &[1.0], range(0, 10))]);
        assert_eq!(
            build_panel_list(response, range(0, 10)),
            Err(GroupingError::MissingGroupKey { index: 0 })
        );
    }

    #[tokio::test]
    async fn test_reload_fetches_display_range() {
        let source = Arc::new(FakeSource {
            response: Some(LogsVolumeResponse::done(vec![series(
                "A",
                "info",
                &[1.0],
                range(40, 60),
            )])),
            requested: Mutex::new(Vec::new()),
        });
        let service = LogsVolumeService::new(source.clone());

        let view = service.reload(range(40, 60)).await.unwrap();
        assert!(matches!(view, PanelListView::Panels { show_reload: false, .. }));
        assert_eq!(*source.requested.lock().unwrap(), vec![range(40, 60)]);
    }

    #[tokio::test]
    async fn test_reload_reports_source_failure() {
        let service = LogsVolumeService::new(Arc::new(FakeSource {
            response: None,
            requested: Mutex::new(Vec::new()),
        }));
        let err = service.reload(range(0, 10)).await.unwrap_err();
        assert!(matches!(err, LogsVolumeError::Source(_)));
        assert!(err.to_string().contains("upstream unavailable"));
    }
}
