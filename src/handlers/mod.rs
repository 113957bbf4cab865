pub mod unloadings;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub unloadings: Arc<crate::services::unloading::UnloadingService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            unloadings: Arc::new(crate::services::unloading::UnloadingService::new(
                db_pool,
                event_sender,
            )),
        }
    }
}
