// HTTP log-volume source implementation
use crate::application::telemetry_repository::LogsVolumeSource;
use crate::domain::telemetry::{
    LoadingState, LogsVolumeResponse, Series, TimeRange, TimeSeriesPoint,
};
use crate::infrastructure::config::{prepare_query, LogsVolumeSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpVolumeSource {
    client: reqwest::Client,
    url_template: String,
}

#[derive(Debug, Deserialize)]
struct VolumeResponse {
    #[serde(default)]
    series: Vec<VolumeSeries>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VolumeSeries {
    #[serde(default)]
    ref_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    limited: bool,
    #[serde(default)]
    range: Option<VolumeRange>,
    /// `[rfc3339 time, count]` rows
    #[serde(default)]
    values: Vec<(serde_json::Value, serde_json::Value)>,
}

#[derive(Debug, Deserialize)]
struct VolumeRange {
    from: String,
    to: String,
}

impl HttpVolumeSource {
    pub fn new(settings: &LogsVolumeSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url_template: settings.upstream_url.clone(),
        })
    }

    fn build_url(&self, range: TimeRange) -> String {
        let mut vars = HashMap::new();
        vars.insert("from".to_string(), range.start().to_string());
        vars.insert("to".to_string(), range.end().to_string());
        prepare_query(&self.url_template, &vars)
    }

    fn parse_time(raw: &str) -> Option<i64> {
        chrono::DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.timestamp_millis())
    }

    fn to_series(raw: VolumeSeries) -> Series {
        let points = raw
            .values
            .iter()
            .filter_map(|(time, value)| {
                let time_ms = Self::parse_time(time.as_str()?)?;
                Some(TimeSeriesPoint::new(time_ms, value.as_f64()?))
            })
            .collect();

        let covered_range = raw.range.as_ref().and_then(|r| {
            let from = Self::parse_time(&r.from)?;
            let to = Self::parse_time(&r.to)?;
            match TimeRange::new(from, to) {
                Ok(range) => Some(range),
                Err(e) => {
                    tracing::warn!("Ignoring covered range of series {}: {}", raw.ref_id, e);
                    None
                }
            }
        });

        let mut series = Series::new(raw.ref_id, raw.name, points);
        if let Some(range) = covered_range {
            series = series.with_covered_range(range);
        }
        if raw.limited {
            series = series.limited();
        }
        series
    }

    fn to_response(raw: VolumeResponse) -> LogsVolumeResponse {
        if let Some(error) = raw.error {
            return LogsVolumeResponse {
                state: LoadingState::Error,
                data: Vec::new(),
                error: Some(error),
            };
        }
        LogsVolumeResponse::done(raw.series.into_iter().map(Self::to_series).collect())
    }
}

#[async_trait]
impl LogsVolumeSource for HttpVolumeSource {
    async fn load_logs_volume(&self, range: TimeRange) -> Result<LogsVolumeResponse> {
        let url = self.build_url(range);
        tracing::debug!("Fetching log volume from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send log volume request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Log volume request failed with status {}: {}", status, body);
        }

        let data = response
            .json::<VolumeResponse>()
            .await
            .context("Failed to parse log volume response")?;

        let response = Self::to_response(data);
        tracing::debug!("Loaded {} log volume series", response.data.len());
        Ok(response)
    }
}
