pub mod clock;
pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod registry;
pub mod state;
pub mod tariff;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CliArgs, GarageConfig, SpotSpec};
pub use engine::{EntryRecord, GarageEngine};
pub use error::GarageError;
pub use logging::{LogFormat, init_logging};
pub use model::{
    Plate, Receipt, Spot, SpotId, SpotState, Ticket, TicketCode, Vehicle, VehicleCategory,
};
pub use registry::SpotRegistry;
pub use state::{AppState, CheckoutOutcome};
pub use tariff::TariffTable;
