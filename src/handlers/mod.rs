// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) -> Protected (bearer token + role allow-list)

pub mod protected;
pub mod public;
