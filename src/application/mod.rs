// Application layer - Use cases and collaborator traits
pub mod logs_volume_service;
pub mod policy_service;
pub mod series_grouper;
pub mod telemetry_repository;
pub mod zoom_detector;
