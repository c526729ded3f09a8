// Collaborator traits for loading log volume and persisting policies
use crate::domain::routing_policy::RoutingPolicy;
use crate::domain::telemetry::{LogsVolumeResponse, TimeRange};
use async_trait::async_trait;

#[async_trait]
pub trait LogsVolumeSource: Send + Sync {
    /// Fetch log volume for the given range (the reload action)
    async fn load_logs_volume(&self, range: TimeRange) -> anyhow::Result<LogsVolumeResponse>;
}

#[async_trait]
pub trait PolicyRepository: Send + Sync {
    /// Current default routing policy
    async fn load_policy(&self) -> anyhow::Result<RoutingPolicy>;

    /// Persist a validated policy
    async fn save_policy(&self, policy: RoutingPolicy) -> anyhow::Result<()>;
}
