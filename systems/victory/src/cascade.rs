use std::cmp::Ordering;

use lane_battle_core::{Outcome, Standings, Team, TeamStanding, Victory, VictoryReason};

type Criterion = fn(&TeamStanding) -> u64;

const CASCADE: [(VictoryReason, Criterion); 5] = [
    (VictoryReason::TreasuryTiebreak, money),
    (VictoryReason::TowerCountTiebreak, tower_count),
    (VictoryReason::TowerSpendTiebreak, tower_spend),
    (VictoryReason::MercenaryCountTiebreak, mercenary_count),
    (VictoryReason::MercenaryHealthTiebreak, mercenary_health),
];

fn money(team: &TeamStanding) -> u64 {
    u64::from(team.money)
}

fn tower_count(team: &TeamStanding) -> u64 {
    u64::from(team.tower_count)
}

fn tower_spend(team: &TeamStanding) -> u64 {
    team.tower_base_price_total
}

fn mercenary_count(team: &TeamStanding) -> u64 {
    u64::from(team.mercenary_count)
}

fn mercenary_health(team: &TeamStanding) -> u64 {
    team.mercenary_health_total
}

/// Walks the tie-break criteria until one separates the teams.
pub(crate) fn resolve(standings: &Standings) -> Victory {
    for (reason, criterion) in CASCADE {
        let winner = match criterion(&standings.red).cmp(&criterion(&standings.blue)) {
            Ordering::Greater => Team::Red,
            Ordering::Less => Team::Blue,
            Ordering::Equal => continue,
        };
        return Victory {
            outcome: Outcome::Winner(winner),
            reason,
        };
    }

    Victory {
        outcome: Outcome::Tie,
        reason: VictoryReason::TiebreaksExhausted,
    }
}
