//! Domain value objects and records for the garage core.
//!
//! Newtype wrappers (`SpotId`, `Plate`, `TicketCode`) keep semantically
//! different identifiers from being mixed up at compile time; validation
//! happens once, at construction, so the engine never re-checks input.

use crate::error::GarageError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// SpotId
// ============================================================================

/// Identifier of a parking spot. Positive, unique within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotId(u32);

impl SpotId {
    /// Creates a new `SpotId`.
    ///
    /// # Errors
    /// Returns `Err` if the id is zero (spot numbering starts at 1).
    pub fn new(id: u32) -> Result<Self, GarageError> {
        if id == 0 {
            return Err(GarageError::Config("spot id must be positive".into()));
        }
        Ok(Self(id))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// VehicleCategory
// ============================================================================

/// Category of a vehicle and of the spots that can hold it.
///
/// `car` and `motorcycle` are the known categories; anything else parses
/// into `Other` so a garage can configure spot pools for categories this
/// crate has never heard of. Parsing is case-insensitive and `Display`
/// renders lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VehicleCategory {
    Car,
    Motorcycle,
    #[strum(default, to_string = "{0}")]
    Other(String),
}

impl VehicleCategory {
    /// Parses a category from user or config input, trimming and
    /// lowercasing first so `Other` values compare consistently.
    pub fn parse(input: &str) -> Self {
        let normalized = input.trim().to_ascii_lowercase();
        match Self::from_str(&normalized) {
            Ok(category) => category,
            // Unreachable with a default variant, but keep the fallback
            // explicit rather than unwrapping.
            Err(_) => Self::Other(normalized),
        }
    }
}

impl Serialize for VehicleCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VehicleCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

// ============================================================================
// SpotState
// ============================================================================

/// Occupancy state of a spot. Transitions are owned by [`Spot`] and the
/// registry; nothing else flips states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SpotState {
    Free,
    Reserved,
    Occupied,
}

// ============================================================================
// Spot
// ============================================================================

/// A single parking spot: fixed id and category, mutable occupancy state.
#[derive(Debug, Clone, Serialize)]
pub struct Spot {
    id: SpotId,
    category: VehicleCategory,
    state: SpotState,
}

impl Spot {
    pub fn new(id: SpotId, category: VehicleCategory) -> Self {
        Self {
            id,
            category,
            state: SpotState::Free,
        }
    }

    pub fn id(&self) -> SpotId {
        self.id
    }

    pub fn category(&self) -> &VehicleCategory {
        &self.category
    }

    pub fn state(&self) -> SpotState {
        self.state
    }

    /// `free -> reserved`. Returns false (state untouched) from any other
    /// state.
    pub fn reserve(&mut self) -> bool {
        if self.state == SpotState::Free {
            self.state = SpotState::Reserved;
            true
        } else {
            false
        }
    }

    /// `free -> occupied` or `reserved -> occupied`. Returns false from
    /// `occupied`.
    pub fn occupy(&mut self) -> bool {
        if matches!(self.state, SpotState::Free | SpotState::Reserved) {
            self.state = SpotState::Occupied;
            true
        } else {
            false
        }
    }

    /// Unconditionally back to `free`. Idempotent; the only path out of
    /// `occupied`.
    pub fn release(&mut self) {
        self.state = SpotState::Free;
    }
}

// ============================================================================
// Plate
// ============================================================================

/// A vehicle plate, normalized to ASCII uppercase at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Plate(String);

impl Plate {
    /// Creates a plate from raw input.
    ///
    /// # Errors
    /// Returns `Err` if the input is empty after trimming. Plate syntax is
    /// otherwise not checked here; garages disagree wildly on formats.
    pub fn new(raw: &str) -> Result<Self, GarageError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GarageError::InvalidPlate {
                reason: "plate must not be empty".into(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Vehicle
// ============================================================================

/// An incoming vehicle. Transient: lives only until its ticket is minted.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub plate: Plate,
    pub category: VehicleCategory,
}

impl Vehicle {
    pub fn new(plate: Plate, category: VehicleCategory) -> Self {
        Self { plate, category }
    }
}

// ============================================================================
// TicketCode
// ============================================================================

const TICKET_CODE_LEN: usize = 8;
const TICKET_CODE_ALPHABET: &[u8] = b"0123456789abcdef";

/// Short collision-resistant ticket code (8 lowercase hex characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TicketCode(String);

impl TicketCode {
    /// Draws a fresh random code. Callers holding the active-ticket map
    /// re-draw on the (unlikely) collision.
    pub fn mint() -> Self {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        let mut code = String::with_capacity(TICKET_CODE_LEN);
        for _ in 0..TICKET_CODE_LEN {
            let idx = rng.gen_range(0..TICKET_CODE_ALPHABET.len());
            code.push(TICKET_CODE_ALPHABET[idx] as char);
        }
        Self(code)
    }

    /// Normalizes user input into code form (trimmed, lowercased). Lookup
    /// against the active set decides whether the code actually exists.
    pub fn parse(input: &str) -> Self {
        Self(input.trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Ticket
// ============================================================================

/// The record binding a vehicle to its parking session.
///
/// The entry timestamp is fixed at creation and never modified. The exit
/// timestamp is stamped (and re-stamped) by the engine; a ticket is active
/// while it is absent.
#[derive(Debug, Clone)]
pub struct Ticket {
    code: TicketCode,
    vehicle: Vehicle,
    entered_at: DateTime<Utc>,
    exited_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn new(code: TicketCode, vehicle: Vehicle, entered_at: DateTime<Utc>) -> Self {
        Self {
            code,
            vehicle,
            entered_at,
            exited_at: None,
        }
    }

    pub fn code(&self) -> &TicketCode {
        &self.code
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn entered_at(&self) -> DateTime<Utc> {
        self.entered_at
    }

    pub fn exited_at(&self) -> Option<DateTime<Utc>> {
        self.exited_at
    }

    pub fn is_active(&self) -> bool {
        self.exited_at.is_none()
    }

    /// Stamps the exit time. Calling again moves the exit forward to the
    /// new "now"; the entry timestamp is never touched.
    pub fn stamp_exit(&mut self, now: DateTime<Utc>) {
        self.exited_at = Some(now);
    }
}

// ============================================================================
// Receipt
// ============================================================================

/// The billing result computed at exit: elapsed time decomposed into whole
/// hours and remaining minutes, and the rounded total.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub ticket_code: TicketCode,
    pub plate: Plate,
    pub hours: u64,
    pub minutes: u64,
    pub total: f64,
    pub entered_at: DateTime<Utc>,
    pub exited_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    #[test]
    fn spot_id_must_be_positive() {
        assert!(SpotId::new(1).is_ok());
        assert_matches!(SpotId::new(0), Err(GarageError::Config(_)));
    }

    #[test]
    fn category_parsing_is_case_insensitive() {
        assert_eq!(VehicleCategory::parse("Car"), VehicleCategory::Car);
        assert_eq!(
            VehicleCategory::parse("MOTORCYCLE"),
            VehicleCategory::Motorcycle
        );
        assert_eq!(
            VehicleCategory::parse(" Van "),
            VehicleCategory::Other("van".to_string())
        );
    }

    #[test]
    fn category_display_is_lowercase() {
        assert_eq!(VehicleCategory::Car.to_string(), "car");
        assert_eq!(VehicleCategory::Motorcycle.to_string(), "motorcycle");
        assert_eq!(VehicleCategory::Other("van".into()).to_string(), "van");
    }

    #[test]
    fn spot_state_machine() {
        let mut spot = Spot::new(SpotId::new(1).unwrap(), VehicleCategory::Car);
        assert_eq!(spot.state(), SpotState::Free);

        // free -> reserved -> occupied
        assert!(spot.reserve());
        assert_eq!(spot.state(), SpotState::Reserved);
        assert!(!spot.reserve());
        assert!(spot.occupy());
        assert_eq!(spot.state(), SpotState::Occupied);

        // occupied admits neither reserve nor occupy
        assert!(!spot.reserve());
        assert!(!spot.occupy());

        // release is unconditional and idempotent
        spot.release();
        assert_eq!(spot.state(), SpotState::Free);
        spot.release();
        assert_eq!(spot.state(), SpotState::Free);

        // the free -> occupied shortcut
        assert!(spot.occupy());
        assert_eq!(spot.state(), SpotState::Occupied);
    }

    #[test]
    fn plate_normalizes_to_uppercase() {
        let plate = Plate::new("  ab-123-cd ").unwrap();
        assert_eq!(plate.as_str(), "AB-123-CD");
    }

    #[test]
    fn empty_plate_is_rejected() {
        assert_matches!(Plate::new("   "), Err(GarageError::InvalidPlate { .. }));
    }

    #[test]
    fn ticket_code_shape() {
        let code = TicketCode::mint();
        assert_eq!(code.as_str().len(), 8);
        assert!(code.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(code.as_str(), code.as_str().to_ascii_lowercase());
    }

    #[test]
    fn ticket_code_parse_normalizes() {
        assert_eq!(TicketCode::parse(" AB12CD34 ").as_str(), "ab12cd34");
    }

    #[test]
    fn spots_and_newtypes_serialize_as_plain_values() {
        let spot = Spot::new(SpotId::new(7).unwrap(), VehicleCategory::Motorcycle);
        let json = serde_json::to_value(&spot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "category": "motorcycle", "state": "free"})
        );

        let plate = Plate::new("ab-1").unwrap();
        assert_eq!(serde_json::to_string(&plate).unwrap(), "\"AB-1\"");
    }

    #[test]
    fn restamping_exit_preserves_entry() {
        let entered = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let vehicle = Vehicle::new(Plate::new("X1").unwrap(), VehicleCategory::Car);
        let mut ticket = Ticket::new(TicketCode::mint(), vehicle, entered);
        assert!(ticket.is_active());

        let first_exit = entered + chrono::Duration::minutes(30);
        ticket.stamp_exit(first_exit);
        assert!(!ticket.is_active());
        assert_eq!(ticket.exited_at(), Some(first_exit));

        let second_exit = entered + chrono::Duration::minutes(45);
        ticket.stamp_exit(second_exit);
        assert_eq!(ticket.entered_at(), entered);
        assert_eq!(ticket.exited_at(), Some(second_exit));
    }
}
