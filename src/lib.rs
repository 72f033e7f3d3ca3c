pub mod configuration;
pub mod domain;
pub mod rate_limiter;
pub mod routes;
pub mod startup;
pub mod subscription_registry;
pub mod sweeper;
pub mod telemetry;
pub mod utils;
