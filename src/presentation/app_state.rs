// Application state for HTTP handlers
use crate::application::logs_volume_service::LogsVolumeService;
use crate::application::policy_service::PolicyService;

#[derive(Clone)]
pub struct AppState {
    pub logs_volume_service: LogsVolumeService,
    pub policy_service: PolicyService,
}
