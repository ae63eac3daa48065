pub mod allocation;
pub mod auth_service;
pub mod chart_service;

pub use auth_service::{Authenticator, LoginOutcome};
pub use chart_service::{ChartPoint, ChartService, Granularity};
