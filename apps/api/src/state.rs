//! Shared application state.

use std::sync::Arc;

use tavola_db::Database;

use crate::auth::{AuthError, JwtManager, SessionVerifier};
use crate::config::ApiConfig;
use crate::services::auth_service::Authenticator;
use crate::services::order_service::OrderService;

/// Everything a handler can reach. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
    pub authenticator: Arc<Authenticator>,
    pub verifier: Arc<SessionVerifier>,
    pub orders: Arc<OrderService>,
}

impl AppState {
    /// Wire up the services from an open database and a loaded config.
    pub fn new(db: Database, config: ApiConfig) -> Result<Self, AuthError> {
        let jwt = Arc::new(JwtManager::new(&config.jwt_secret, config.session_ttl_hours));

        let authenticator = Authenticator::new(db.users(), jwt.clone())?;
        let verifier = SessionVerifier::new(jwt);
        let orders = OrderService::new(db.clone(), config.pricing_mode);

        Ok(AppState {
            db,
            config: Arc::new(config),
            authenticator: Arc::new(authenticator),
            verifier: Arc::new(verifier),
            orders: Arc::new(orders),
        })
    }
}
