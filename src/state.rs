use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::database::UserRepository;
use crate::production::ProductionSource;
use crate::services::{Authenticator, ChartService};

/// Everything a request handler needs, cheap to clone per request
#[derive(Clone)]
pub struct AppState {
    pub users: UserRepository,
    pub keys: Arc<JwtKeys>,
    pub authenticator: Authenticator,
    pub charts: ChartService,
}

impl AppState {
    pub fn new(users: UserRepository, source: Arc<dyn ProductionSource>, keys: Arc<JwtKeys>) -> Self {
        Self {
            authenticator: Authenticator::new(users.clone(), keys.clone()),
            charts: ChartService::new(source),
            users,
            keys,
        }
    }
}
