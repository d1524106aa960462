//! Shared application state: one instance of each engine over one database
//! pool, built once at startup and cloned into every handler via `Arc`.

use std::sync::Arc;

use parlor_db::Database;
use parlor_engine::{
    BookingEngine, PlatformConfig, SettlementEngine, SlotEngine, StakeEngine, TaskEngine,
};
use parlor_gateway::OrderGateway;

pub struct AppState {
    pub slots: SlotEngine,
    pub booking: BookingEngine,
    pub settlement: SettlementEngine,
    pub stakes: StakeEngine,
    pub tasks: TaskEngine,
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        gateway: Arc<dyn OrderGateway>,
        platform: PlatformConfig,
        callback_secret: String,
    ) -> Self {
        AppState {
            slots: SlotEngine::new(db.clone()),
            booking: BookingEngine::new(db.clone(), gateway),
            settlement: SettlementEngine::new(db.clone(), platform, callback_secret),
            stakes: StakeEngine::new(db.clone()),
            tasks: TaskEngine::new(db.clone()),
            db,
        }
    }
}
