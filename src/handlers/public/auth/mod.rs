// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition. No bearer token is needed to reach these.

pub mod login; // POST /login - authenticate and get JWT

pub use login::login;
