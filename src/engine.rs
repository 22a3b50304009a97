//! Allocation and billing engine.
//!
//! Owns the spot registry, the tariff table, and the active-ticket map, and
//! is the only place that mutates them. Allocation matches an incoming
//! vehicle to the first free spot of its category; exit processing computes
//! the fee from the true entry/exit wall-clock difference; `settle` is the
//! orchestrator step that frees the spot and retires the ticket.

use crate::clock::{Clock, SystemClock};
use crate::error::{GarageError, Result};
use crate::model::{Receipt, SpotId, Ticket, TicketCode, Vehicle};
use crate::registry::SpotRegistry;
use crate::tariff::TariffTable;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// What the caller gets back from a successful allocation.
#[derive(Debug, Clone)]
pub struct EntryRecord {
    pub ticket_code: TicketCode,
    pub spot_id: SpotId,
    pub entered_at: DateTime<Utc>,
}

/// An active parking session: the ticket and the spot it is bound to.
#[derive(Debug)]
struct ActiveSession {
    ticket: Ticket,
    spot_id: SpotId,
}

pub struct GarageEngine {
    registry: SpotRegistry,
    tariffs: TariffTable,
    active: HashMap<TicketCode, ActiveSession>,
    clock: Arc<dyn Clock>,
}

impl GarageEngine {
    pub fn new(registry: SpotRegistry, tariffs: TariffTable) -> Self {
        Self::with_clock(registry, tariffs, Arc::new(SystemClock))
    }

    pub fn with_clock(
        registry: SpotRegistry,
        tariffs: TariffTable,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            tariffs,
            active: HashMap::new(),
            clock,
        }
    }

    /// Matches the vehicle to the first free spot of its category, occupies
    /// it, and mints a ticket stamped with the current time.
    ///
    /// # Errors
    /// `NoCapacity` when the category has no free spot. Expected whenever
    /// the pool is full; nothing is mutated in that case.
    pub fn allocate(&mut self, vehicle: Vehicle) -> Result<EntryRecord> {
        let spot_id = self
            .registry
            .first_free(&vehicle.category)
            .ok_or_else(|| GarageError::NoCapacity {
                category: vehicle.category.clone(),
            })?;

        let occupied = self.registry.occupy(spot_id);
        debug_assert!(occupied, "first_free returned a non-free spot");

        let mut code = TicketCode::mint();
        while self.active.contains_key(&code) {
            debug!(%code, "ticket code collision, re-drawing");
            code = TicketCode::mint();
        }

        let entered_at = self.clock.now();
        let ticket = Ticket::new(code.clone(), vehicle, entered_at);

        info!(
            ticket = %code,
            spot = %spot_id,
            category = %ticket.vehicle().category,
            plate = %ticket.vehicle().plate,
            "vehicle checked in"
        );

        self.active.insert(code.clone(), ActiveSession { ticket, spot_id });

        Ok(EntryRecord {
            ticket_code: code,
            spot_id,
            entered_at,
        })
    }

    /// Stamps the exit time on the ticket and computes the receipt. Does
    /// not free the spot or retire the ticket; callers follow up with
    /// [`settle`](Self::settle) once payment is done.
    ///
    /// Calling this twice for the same code is harmless: the exit time is
    /// re-stamped to the new "now" and the fee recomputed against the
    /// untouched entry timestamp.
    ///
    /// # Errors
    /// `UnknownTicket` when the code is not in the active set; no state is
    /// mutated in that case.
    pub fn process_exit(&mut self, code: &TicketCode) -> Result<Receipt> {
        let session = self
            .active
            .get_mut(code)
            .ok_or_else(|| GarageError::UnknownTicket { code: code.clone() })?;

        let exited_at = self.clock.now();
        session.ticket.stamp_exit(exited_at);

        let rate = self.tariffs.rate_for(&session.ticket.vehicle().category);
        let elapsed_hours = elapsed_hours(session.ticket.entered_at(), exited_at);
        let total = round2(elapsed_hours * rate);
        let hours = elapsed_hours as u64;
        let minutes = (elapsed_hours.fract() * 60.0) as u64;

        info!(
            ticket = %code,
            spot = %session.spot_id,
            hours,
            minutes,
            total,
            "exit processed"
        );

        Ok(Receipt {
            ticket_code: code.clone(),
            plate: session.ticket.vehicle().plate.clone(),
            hours,
            minutes,
            total,
            entered_at: session.ticket.entered_at(),
            exited_at,
        })
    }

    /// Retires the ticket and frees its spot, returning the freed spot id.
    /// This is the step the caller runs after the receipt has been handed
    /// over; the spot is immediately eligible for a new allocation.
    ///
    /// # Errors
    /// `UnknownTicket` when the code is not in the active set.
    pub fn settle(&mut self, code: &TicketCode) -> Result<SpotId> {
        let session = self
            .active
            .remove(code)
            .ok_or_else(|| GarageError::UnknownTicket { code: code.clone() })?;

        self.registry.release(session.spot_id);
        info!(ticket = %code, spot = %session.spot_id, "ticket settled, spot freed");
        Ok(session.spot_id)
    }

    pub fn registry(&self) -> &SpotRegistry {
        &self.registry
    }

    pub fn tariffs(&self) -> &TariffTable {
        &self.tariffs
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, code: &TicketCode) -> bool {
        self.active.contains_key(code)
    }
}

/// Elapsed time in hours, clamped at zero in case the wall clock stepped
/// backwards between entry and exit.
fn elapsed_hours(entered_at: DateTime<Utc>, exited_at: DateTime<Utc>) -> f64 {
    let millis = (exited_at - entered_at).num_milliseconds().max(0);
    millis as f64 / 3_600_000.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
