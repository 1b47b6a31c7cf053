#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn orchestrator that owns the world and sequences every system once per turn.

mod report;

use lane_battle_core::{Command, GameSnapshot, Rules, Team, TeamActions, TurnAction, UnitFamily};
use lane_battle_system_economy::{Economy, Phase};
use lane_battle_system_lane_combat::LaneCombat;
use lane_battle_system_spawning::Spawning;
use lane_battle_system_tower_targeting::TowerTargeting;
use lane_battle_system_victory::WinCondition;
use lane_battle_world::{self as world, query, LoadError, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, info_span, warn};

/// A running match: the world, the systems that drive it and the seeded RNG.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    economy: Economy,
    lane_combat: LaneCombat,
    spawning: Spawning,
    tower_targeting: TowerTargeting,
    win_condition: WinCondition,
    rng: ChaCha8Rng,
    snapshot: GameSnapshot,
}

impl Simulation {
    /// Starts a match on an already loaded world.
    ///
    /// The RNG is seeded from the world's rules so identical inputs replay
    /// identically.
    #[must_use]
    pub fn new(world: World) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(query::rules(&world).rng_seed);
        let snapshot = query::snapshot(&world);
        Self {
            world,
            economy: Economy::new(),
            lane_combat: LaneCombat::new(),
            spawning: Spawning::new(),
            tower_targeting: TowerTargeting::new(),
            win_condition: WinCondition::new(),
            rng,
            snapshot,
        }
    }

    /// Loads a JSON map and starts a match on it.
    pub fn from_json(map: &str, rules: Rules) -> Result<Self, LoadError> {
        World::from_json(map, rules).map(Self::new)
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// State captured at the end of the most recent turn.
    #[must_use]
    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    /// Reports whether a victory was declared or the turns ran out.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        query::is_game_over(&self.world)
    }

    /// Decodes raw agent payloads and plays one turn.
    ///
    /// A payload that fails to decode counts as doing nothing for that team.
    pub fn advance_raw(&mut self, red: &str, blue: &str) -> &GameSnapshot {
        let actions = TeamActions::new(decode(Team::Red, red), decode(Team::Blue, blue));
        self.advance(actions)
    }

    /// Plays exactly one turn with the provided actions.
    ///
    /// Phases run in a fixed order: structures, mercenary purchases,
    /// provocation, then the world update. Calls after the match ended leave
    /// the world untouched and return the final snapshot.
    pub fn advance(&mut self, actions: TeamActions) -> &GameSnapshot {
        if self.is_game_over() {
            warn!(
                turn = query::turn(&self.world),
                "turn requested after the match ended; ignoring"
            );
            return &self.snapshot;
        }

        let span = info_span!("turn", turn = query::turn(&self.world));
        let _guard = span.enter();

        for phase in Phase::ORDER {
            let mut commands = Vec::new();
            self.economy.handle(phase, &actions, &mut commands);
            self.execute(commands);
        }
        self.update_world();
        self.execute(vec![Command::AdvanceTurn]);

        self.snapshot = query::snapshot(&self.world);
        if self.snapshot.victory.is_none() && self.snapshot.turns_remaining == 0 {
            info!("turn limit reached without a victor");
        }
        &self.snapshot
    }

    fn update_world(&mut self) {
        self.execute(vec![Command::PurgeDead]);

        for family in [UnitFamily::Mercenaries, UnitFamily::Demons] {
            let mut commands = Vec::new();
            self.lane_combat.handle(
                family,
                query::lanes(&self.world),
                &query::unit_view(&self.world),
                query::occupancy_view(&self.world),
                &mut commands,
            );
            commands.push(Command::SweepMortalWounds);
            self.execute(commands);

            if self.declare_victory() {
                return;
            }
        }

        let mut commands = Vec::new();
        self.spawning
            .mercenaries(&query::pending_mercenaries(&self.world), &mut commands);
        self.spawning
            .demons(&query::spawners(&self.world), &mut commands);
        self.execute(commands);

        if query::demon_surge(&self.world) {
            let mut commands = Vec::new();
            self.spawning.surge(
                &query::spawners(&self.world),
                query::occupancy_view(&self.world),
                &mut commands,
            );
            self.execute(commands);
        }

        // Each tower sees the damage dealt by the towers handled before it.
        for tower in query::tower_view(&self.world).into_vec() {
            let mut commands = Vec::new();
            self.tower_targeting.handle(
                &tower,
                query::lanes(&self.world),
                &query::unit_view(&self.world),
                query::occupancy_view(&self.world),
                &mut self.rng,
                &mut commands,
            );
            self.execute(commands);
        }

        self.execute(vec![Command::SweepMortalWounds]);
    }

    fn declare_victory(&mut self) -> bool {
        let mut commands = Vec::new();
        self.win_condition
            .handle(&query::standings(&self.world), &mut commands);
        let decided = !commands.is_empty();
        self.execute(commands);
        decided
    }

    fn execute(&mut self, commands: Vec<Command>) {
        if commands.is_empty() {
            return;
        }
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        report::events(&self.world, &events);
    }
}

fn decode(team: Team, payload: &str) -> TurnAction {
    match TurnAction::decode(payload) {
        Ok(action) => action,
        Err(error) => {
            warn!(team = team.label(), %error, "malformed action; doing nothing");
            TurnAction::nothing()
        }
    }
}
