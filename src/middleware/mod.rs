pub mod auth;
pub mod error_body;
pub mod source_available;

pub use auth::{role_gate, AuthUser, RoleGate};
pub use error_body::json_error_body;
pub use source_available::require_production_source;
