//! Single serialized owner of the garage engine.
//!
//! Every operation takes the one mutex, so a spot is bound to at most one
//! ticket at a time and the first-match tie-break stays deterministic even
//! if the state is shared across threads. `check_out` runs exit processing
//! and settlement under a single lock acquisition so no allocation can
//! slip between them.

use crate::config::GarageConfig;
use crate::engine::{EntryRecord, GarageEngine};
use crate::error::Result;
use crate::model::{Receipt, Spot, SpotId, TicketCode, Vehicle};
use parking_lot::Mutex;

/// Result of a full check-out: the receipt plus the spot that was freed.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub receipt: Receipt,
    pub freed_spot: SpotId,
}

pub struct AppState {
    engine: Mutex<GarageEngine>,
}

impl AppState {
    pub fn new(config: &GarageConfig) -> Result<Self> {
        let registry = config.build_registry()?;
        let tariffs = config.build_tariffs();
        Ok(Self::from_engine(GarageEngine::new(registry, tariffs)))
    }

    pub fn from_engine(engine: GarageEngine) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }

    pub fn allocate(&self, vehicle: Vehicle) -> Result<EntryRecord> {
        self.engine.lock().allocate(vehicle)
    }

    /// Processes the exit and settles the ticket in one serialized step:
    /// receipt first, then spot release and ticket retirement, matching the
    /// entry/exit contract of the engine.
    pub fn check_out(&self, code: &TicketCode) -> Result<CheckoutOutcome> {
        let mut engine = self.engine.lock();
        let receipt = engine.process_exit(code)?;
        let freed_spot = engine.settle(code)?;
        Ok(CheckoutOutcome {
            receipt,
            freed_spot,
        })
    }

    /// Point-in-time copy of the spot pool for rendering.
    pub fn snapshot(&self) -> Vec<Spot> {
        self.engine.lock().registry().spots().to_vec()
    }

    pub fn active_tickets(&self) -> usize {
        self.engine.lock().active_count()
    }
}
