//! Spot registry: the fixed pool of parking spots and their occupancy
//! states.
//!
//! Spots are kept in registration order, which is what makes allocation
//! deterministic: a lookup always returns the first eligible spot, so the
//! lowest-index free spot of a category wins every time. Legal transitions
//! are `free -> reserved -> occupied -> free` plus the direct
//! `free -> occupied` shortcut; `release` is the only path back to `free`.

use crate::model::{Spot, SpotId, SpotState, VehicleCategory};
use tracing::warn;

#[derive(Debug, Default)]
pub struct SpotRegistry {
    spots: Vec<Spot>,
}

impl SpotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a spot to the pool. No constraints, no failure mode; id
    /// uniqueness is enforced by configuration validation before spots are
    /// ever built.
    pub fn add(&mut self, spot: Spot) {
        self.spots.push(spot);
    }

    /// Optional pre-allocation step: `free -> reserved`. Returns false for
    /// an unknown id or any non-free state.
    pub fn reserve(&mut self, id: SpotId) -> bool {
        match self.spot_mut(id) {
            Some(spot) => spot.reserve(),
            None => {
                warn!(spot_id = %id, "reserve on unknown spot id");
                false
            }
        }
    }

    /// `free|reserved -> occupied`. Returns false for an unknown id or an
    /// already occupied spot.
    pub fn occupy(&mut self, id: SpotId) -> bool {
        match self.spot_mut(id) {
            Some(spot) => spot.occupy(),
            None => {
                warn!(spot_id = %id, "occupy on unknown spot id");
                false
            }
        }
    }

    /// Unconditionally frees the spot. Idempotent; a no-op for unknown ids.
    pub fn release(&mut self, id: SpotId) {
        if let Some(spot) = self.spot_mut(id) {
            spot.release();
        } else {
            warn!(spot_id = %id, "release on unknown spot id");
        }
    }

    /// First free spot of the given category in registration order.
    pub fn first_free(&self, category: &VehicleCategory) -> Option<SpotId> {
        self.spots
            .iter()
            .find(|spot| spot.category() == category && spot.state() == SpotState::Free)
            .map(Spot::id)
    }

    /// Read-only view of the pool, in registration order.
    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn state_of(&self, id: SpotId) -> Option<SpotState> {
        self.spots.iter().find(|s| s.id() == id).map(Spot::state)
    }

    fn spot_mut(&mut self, id: SpotId) -> Option<&mut Spot> {
        self.spots.iter_mut().find(|s| s.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(id: u32, category: VehicleCategory) -> Spot {
        Spot::new(SpotId::new(id).unwrap(), category)
    }

    fn registry() -> SpotRegistry {
        let mut registry = SpotRegistry::new();
        registry.add(spot(1, VehicleCategory::Car));
        registry.add(spot(2, VehicleCategory::Car));
        registry.add(spot(3, VehicleCategory::Motorcycle));
        registry
    }

    #[test]
    fn occupy_succeeds_from_free_and_reserved_only() {
        let mut registry = registry();
        let id = SpotId::new(1).unwrap();

        assert!(registry.occupy(id));
        assert_eq!(registry.state_of(id), Some(SpotState::Occupied));
        assert!(!registry.occupy(id));

        let id2 = SpotId::new(2).unwrap();
        assert!(registry.reserve(id2));
        assert!(registry.occupy(id2));
        assert_eq!(registry.state_of(id2), Some(SpotState::Occupied));
    }

    #[test]
    fn reserve_only_from_free() {
        let mut registry = registry();
        let id = SpotId::new(1).unwrap();

        assert!(registry.reserve(id));
        assert!(!registry.reserve(id));

        registry.occupy(id);
        assert!(!registry.reserve(id));
    }

    #[test]
    fn release_always_frees() {
        let mut registry = registry();
        let id = SpotId::new(1).unwrap();

        registry.occupy(id);
        registry.release(id);
        assert_eq!(registry.state_of(id), Some(SpotState::Free));

        // idempotent
        registry.release(id);
        assert_eq!(registry.state_of(id), Some(SpotState::Free));

        // also from reserved
        registry.reserve(id);
        registry.release(id);
        assert_eq!(registry.state_of(id), Some(SpotState::Free));
    }

    #[test]
    fn first_free_matches_category_in_registration_order() {
        let mut registry = registry();

        assert_eq!(
            registry.first_free(&VehicleCategory::Car),
            Some(SpotId::new(1).unwrap())
        );
        assert_eq!(
            registry.first_free(&VehicleCategory::Motorcycle),
            Some(SpotId::new(3).unwrap())
        );

        registry.occupy(SpotId::new(1).unwrap());
        assert_eq!(
            registry.first_free(&VehicleCategory::Car),
            Some(SpotId::new(2).unwrap())
        );

        registry.occupy(SpotId::new(2).unwrap());
        assert_eq!(registry.first_free(&VehicleCategory::Car), None);
    }

    #[test]
    fn reserved_spots_are_not_eligible() {
        let mut registry = registry();
        registry.reserve(SpotId::new(1).unwrap());
        assert_eq!(
            registry.first_free(&VehicleCategory::Car),
            Some(SpotId::new(2).unwrap())
        );
    }

    #[test]
    fn unknown_ids_are_harmless() {
        let mut registry = registry();
        let ghost = SpotId::new(99).unwrap();
        assert!(!registry.reserve(ghost));
        assert!(!registry.occupy(ghost));
        registry.release(ghost);
        assert_eq!(registry.state_of(ghost), None);
    }
}
