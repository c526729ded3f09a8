// Domain layer - Pure models and validation
pub mod duration;
pub mod error;
pub mod routing_policy;
pub mod telemetry;
