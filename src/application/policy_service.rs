// Policy service - Use case for editing the default routing policy
use crate::application::telemetry_repository::PolicyRepository;
use crate::domain::duration::DurationField;
use crate::domain::error::ValidationError;
use crate::domain::routing_policy::{RoutingPolicy, RoutingPolicyForm};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("routing policy has {} invalid field(s)", .0.len())]
    Invalid(Vec<ValidationError>),

    #[error("failed to save routing policy: {0:#}")]
    Store(anyhow::Error),
}

#[derive(Clone)]
pub struct PolicyService {
    repository: Arc<dyn PolicyRepository>,
    common_labels: Vec<String>,
}

impl PolicyService {
    pub fn new(repository: Arc<dyn PolicyRepository>, common_labels: Vec<String>) -> Self {
        Self {
            repository,
            common_labels,
        }
    }

    /// Start an editing session from the stored policy.
    pub async fn open_form(&self) -> anyhow::Result<RoutingPolicyForm> {
        let policy = self.repository.load_policy().await?;
        Ok(RoutingPolicyForm::from_policy(&policy, &self.common_labels))
    }

    /// Validate and persist. Nothing is saved unless every field is valid.
    pub async fn submit(&self, form: &RoutingPolicyForm) -> Result<RoutingPolicy, SubmitError> {
        let policy = form.to_policy().map_err(|errors| {
            tracing::debug!("Rejected routing policy with {} errors", errors.len());
            SubmitError::Invalid(errors)
        })?;

        self.repository
            .save_policy(policy.clone())
            .await
            .map_err(SubmitError::Store)?;

        tracing::info!(
            "Saved default routing policy for receiver {} (wait {}, interval {}, repeat {})",
            policy.receiver_id,
            policy.effective_duration(DurationField::GroupWait),
            policy.effective_duration(DurationField::GroupInterval),
            policy.effective_duration(DurationField::RepeatInterval)
        );
        Ok(policy)
    }
}
