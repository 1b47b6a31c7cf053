//! Lane unit storage.

use lane_battle_core::{CellCoord, LaneId, UnitClass, UnitId, UnitSnapshot, UnitState};

/// Mercenary or demon stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Unit {
    pub(crate) id: UnitId,
    pub(crate) class: UnitClass,
    pub(crate) name: String,
    pub(crate) lane: LaneId,
    pub(crate) lane_index: usize,
    pub(crate) cell: CellCoord,
    pub(crate) health: u32,
    pub(crate) attack: u32,
    pub(crate) state: UnitState,
}

impl Unit {
    pub(crate) fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            class: self.class,
            name: self.name.clone(),
            lane: self.lane,
            lane_index: self.lane_index,
            cell: self.cell,
            health: self.health,
            attack: self.attack,
            state: self.state,
        }
    }

    /// Reports whether the unit can still act this tick.
    pub(crate) fn can_act(&self) -> bool {
        self.state != UnitState::Dead && self.health > 0
    }

    /// Subtracts damage, saturating at zero, and returns the remaining health.
    pub(crate) fn take_damage(&mut self, damage: u32) -> u32 {
        self.health = self.health.saturating_sub(damage);
        self.health
    }
}

/// Spawn-ordered unit collection with identifier allocation.
#[derive(Debug, Default)]
pub(crate) struct UnitRoster {
    units: Vec<Unit>,
    next_unit_id: u32,
}

impl UnitRoster {
    /// Reserves the next identifier.
    pub(crate) fn allocate(&mut self) -> UnitId {
        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id = self.next_unit_id.saturating_add(1);
        id
    }

    /// Appends a unit. Identifiers are allocated in increasing order, keeping the roster sorted.
    pub(crate) fn push(&mut self, unit: Unit) {
        self.units.push(unit);
    }

    pub(crate) fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units
            .binary_search_by_key(&id, |unit| unit.id)
            .ok()
            .and_then(|index| self.units.get(index))
    }

    pub(crate) fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units
            .binary_search_by_key(&id, |unit| unit.id)
            .ok()
            .and_then(|index| self.units.get_mut(index))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.iter_mut()
    }

    /// Removes every unit matching the predicate, returning them in spawn order.
    pub(crate) fn drain_where(&mut self, mut predicate: impl FnMut(&Unit) -> bool) -> Vec<Unit> {
        let (removed, kept): (Vec<_>, Vec<_>) =
            self.units.drain(..).partition(|unit| predicate(unit));
        self.units = kept;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_battle_core::Team;

    fn unit(roster: &mut UnitRoster, health: u32) -> Unit {
        Unit {
            id: roster.allocate(),
            class: UnitClass::Mercenary { team: Team::Red },
            name: "Rodney".to_owned(),
            lane: LaneId::new(0),
            lane_index: 0,
            cell: CellCoord::new(0, 0),
            health,
            attack: 10,
            state: UnitState::Moving,
        }
    }

    #[test]
    fn damage_saturates_at_zero() {
        let mut roster = UnitRoster::default();
        let mut unit = unit(&mut roster, 5);
        assert_eq!(unit.take_damage(3), 2);
        assert_eq!(unit.take_damage(10), 0);
        assert!(!unit.can_act());
    }

    #[test]
    fn drain_keeps_remaining_units_in_order() {
        let mut roster = UnitRoster::default();
        for health in [10, 0, 20, 0] {
            let unit = unit(&mut roster, health);
            roster.push(unit);
        }

        let removed = roster.drain_where(|unit| unit.health == 0);

        assert_eq!(removed.len(), 2);
        let remaining: Vec<u32> = roster.iter().map(|unit| unit.id.get()).collect();
        assert_eq!(remaining, vec![0, 2]);
        assert!(roster.get(UnitId::new(2)).is_some());
        assert!(roster.get(UnitId::new(1)).is_none());
    }
}
