// In-memory routing policy store
use crate::application::telemetry_repository::PolicyRepository;
use crate::domain::routing_policy::RoutingPolicy;
use crate::infrastructure::config::PolicySettings;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug)]
pub struct InMemoryPolicyRepository {
    policy: RwLock<RoutingPolicy>,
}

impl InMemoryPolicyRepository {
    pub fn new(initial: RoutingPolicy) -> Self {
        Self {
            policy: RwLock::new(initial),
        }
    }

    pub fn from_settings(settings: &PolicySettings) -> Self {
        let mut policy = RoutingPolicy::new(settings.receiver_id.clone());
        policy.group_by_labels = settings.group_by.clone();
        Self::new(policy)
    }
}

#[async_trait]
impl PolicyRepository for InMemoryPolicyRepository {
    async fn load_policy(&self) -> Result<RoutingPolicy> {
        Ok(self.policy.read().await.clone())
    }

    async fn save_policy(&self, policy: RoutingPolicy) -> Result<()> {
        *self.policy.write().await = policy;
        Ok(())
    }
}
