//! Turns world events into log lines.

use lane_battle_core::{Event, Outcome, TowerId, TowerView, UnitClass, UnitId, UnitView};
use lane_battle_world::{query, World};
use tracing::{debug, info, warn};

struct Names {
    units: UnitView,
    towers: TowerView,
}

impl Names {
    fn unit(&self, id: UnitId) -> String {
        match self.units.get(id) {
            Some(unit) => format!("{} {}", class_label(unit.class), unit.name),
            None => format!("unit #{}", id.get()),
        }
    }

    fn tower(&self, id: TowerId) -> String {
        self.towers
            .get(id)
            .map_or_else(|| format!("tower #{}", id.get()), |tower| tower.name.clone())
    }
}

fn class_label(class: UnitClass) -> &'static str {
    match class {
        UnitClass::Mercenary { .. } => "Mercenary",
        UnitClass::Demon { .. } => "Demon",
    }
}

/// Logs a batch of events produced by one group of commands.
pub(crate) fn events(world: &World, events: &[Event]) {
    if events.is_empty() {
        return;
    }
    let names = Names {
        units: query::unit_view(world),
        towers: query::tower_view(world),
    };
    for event in events {
        log(&names, event);
    }
}

fn log(names: &Names, event: &Event) {
    match event {
        Event::TowerPlaced {
            tower,
            team,
            kind,
            cell,
            price,
        } => info!(
            team = team.label(),
            ?kind,
            ?cell,
            price,
            "{} built",
            names.tower(*tower)
        ),
        Event::TowerPlacementRejected {
            team,
            kind,
            cell,
            reason,
        } => warn!(team = team.label(), ?kind, ?cell, %reason, "build rejected"),
        Event::TowerRemoved {
            tower,
            team,
            cell,
            refund,
        } => info!(
            team = team.label(),
            tower = tower.get(),
            ?cell,
            refund,
            "tower destroyed"
        ),
        Event::TowerRemovalRejected { team, cell, reason } => {
            warn!(team = team.label(), ?cell, %reason, "destroy rejected");
        }
        Event::MercenaryQueued { team, direction } => {
            info!(team = team.label(), direction = direction.token(), "mercenary bought");
        }
        Event::MercenaryPurchaseRejected {
            team,
            direction,
            reason,
        } => warn!(
            team = team.label(),
            direction = direction.token(),
            %reason,
            "mercenary purchase rejected"
        ),
        Event::DemonsProvoked { team } => info!(team = team.label(), "demons provoked"),
        Event::ProvocationRejected { team, reason } => {
            warn!(team = team.label(), %reason, "provocation rejected");
        }
        Event::DemonsWiped { count } => info!(count, "mutual provocation wiped the demons"),
        Event::DemonSurgeTriggered { team } => {
            info!(team = team.label(), "lone provocation triggers a demon surge");
        }
        Event::UnitAdvanced { unit, from, to } => {
            debug!(?from, ?to, "{} advanced", names.unit(*unit));
        }
        Event::UnitStruck {
            attacker,
            target,
            damage,
            remaining,
        } => debug!(
            damage,
            remaining,
            "{} struck {}",
            names.unit(*attacker),
            names.unit(*target)
        ),
        Event::BaseStruck {
            attacker,
            team,
            damage,
            remaining,
        } => debug!(
            base = team.label(),
            damage,
            remaining,
            "{} struck the base",
            names.unit(*attacker)
        ),
        Event::UnitKilled { unit, cell, .. } => info!(?cell, "{} died", names.unit(*unit)),
        Event::UnitSpawned { unit, cell, .. } => info!(?cell, "{} spawned", names.unit(*unit)),
        Event::SpawnBlocked { class, cell } => {
            debug!(?cell, "{} spawn blocked", class_label(*class));
        }
        Event::TowerFired {
            tower,
            target,
            damage,
            remaining,
        } => debug!(
            damage,
            remaining,
            "{} fired at {}",
            names.tower(*tower),
            names.unit(*target)
        ),
        Event::IncomeCollected {
            tower,
            team,
            amount,
        } => debug!(team = team.label(), amount, "{} paid out", names.tower(*tower)),
        Event::UnitBlessed {
            tower,
            unit,
            amount,
        } => debug!(amount, "{} blessed {}", names.tower(*tower), names.unit(*unit)),
        Event::VictoryDeclared { victory } => match victory.outcome {
            Outcome::Winner(team) => {
                info!(winner = team.label(), reason = ?victory.reason, "victory declared");
            }
            Outcome::Tie => info!(reason = ?victory.reason, "match tied"),
        },
        Event::TurnAdvanced { turn, remaining } => debug!(turn, remaining, "turn complete"),
    }
}
