// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_volume_source;
pub mod memory_policy_repository;
