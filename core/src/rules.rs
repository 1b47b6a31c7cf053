use serde::{Deserialize, Serialize};

use crate::TowerKind;

/// Price and activation parameters of a single tower kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Unescalated purchase price.
    pub price: u32,
    /// Ticks between activations.
    pub cooldown: u32,
    /// Euclidean range in tiles.
    pub range: u32,
    /// Damage per hit, or income for houses, or unused for churches.
    pub power: u32,
}

impl TowerStats {
    /// Creates a new stat block.
    #[must_use]
    pub const fn new(price: u32, cooldown: u32, range: u32, power: u32) -> Self {
        Self {
            price,
            cooldown,
            range,
            power,
        }
    }
}

/// Tunable constants governing a match.
///
/// Missing fields in a rules file fall back to [`Rules::default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Turns played before the match ends without a victor.
    pub max_turns: u32,
    /// Treasury each team starts with.
    pub starting_money: u32,
    /// Health each base starts with.
    pub base_health: u32,
    /// Price of a single mercenary.
    pub mercenary_price: u32,
    /// Health of a freshly spawned mercenary.
    pub mercenary_health: u32,
    /// Damage dealt per mercenary strike.
    pub mercenary_attack: u32,
    /// Health of a freshly spawned demon.
    pub demon_health: u32,
    /// Damage dealt per demon strike.
    pub demon_attack: u32,
    /// Ticks between demon spawns.
    pub demon_spawner_reload: u32,
    /// Price of provoking the demons.
    pub provoke_price: u32,
    /// Percentage added to a tower kind's price after each purchase.
    pub tower_price_increase_percent: u32,
    /// Health restored by a church to each friendly mercenary in range.
    pub church_heal: u32,
    /// Seed of the random source used for final targeting tie-breaks.
    pub rng_seed: u64,
    /// House parameters; `power` is the income credited per activation.
    pub house: TowerStats,
    /// Crossbow parameters.
    pub crossbow: TowerStats,
    /// Cannon parameters.
    pub cannon: TowerStats,
    /// Minigun parameters.
    pub minigun: TowerStats,
    /// Church parameters; healing comes from `church_heal`.
    pub church: TowerStats,
}

impl Rules {
    /// Stat block for the provided tower kind.
    #[must_use]
    pub const fn tower(&self, kind: TowerKind) -> TowerStats {
        match kind {
            TowerKind::House => self.house,
            TowerKind::Crossbow => self.crossbow,
            TowerKind::Cannon => self.cannon,
            TowerKind::Minigun => self.minigun,
            TowerKind::Church => self.church,
        }
    }

    /// Price after one more purchase of a kind currently costing `price`.
    #[must_use]
    pub fn escalate(&self, price: u32) -> u32 {
        let grown = u64::from(price) * (100 + u64::from(self.tower_price_increase_percent)) / 100;
        u32::try_from(grown).unwrap_or(u32::MAX)
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            max_turns: 1000,
            starting_money: 30,
            base_health: 200,
            mercenary_price: 10,
            mercenary_health: 70,
            mercenary_attack: 10,
            demon_health: 70,
            demon_attack: 10,
            demon_spawner_reload: 10,
            provoke_price: 20,
            tower_price_increase_percent: 25,
            church_heal: 10,
            rng_seed: 0x5eed_1a4e_ba77_1e00,
            house: TowerStats::new(10, 5, 0, 4),
            crossbow: TowerStats::new(8, 1, 3, 6),
            cannon: TowerStats::new(15, 3, 2, 12),
            minigun: TowerStats::new(20, 1, 2, 3),
            church: TowerStats::new(15, 4, 2, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escalation_rounds_down() {
        let rules = Rules::default();
        assert_eq!(rules.escalate(8), 10);
        assert_eq!(rules.escalate(10), 12);
        assert_eq!(rules.escalate(15), 18);
        assert_eq!(rules.escalate(0), 0);
    }

    #[test]
    fn partial_rules_file_keeps_defaults() {
        let rules: Rules = serde_json::from_str(r#"{"max_turns": 12, "church_heal": 3}"#)
            .expect("rules parse");
        assert_eq!(rules.max_turns, 12);
        assert_eq!(rules.church_heal, 3);
        assert_eq!(rules.starting_money, Rules::default().starting_money);
        assert_eq!(rules.tower(TowerKind::Cannon), Rules::default().cannon);
    }
}
