#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting mercenary and demon spawn commands.

use lane_battle_core::{Command, OccupancyView, PendingMercenary, SpawnerSnapshot};

/// Pure system that emits spawn commands for queued purchases and demon spawners.
#[derive(Debug, Default, Clone)]
pub struct Spawning;

impl Spawning {
    /// Creates a new spawning system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Requests a spawn for every queued mercenary.
    ///
    /// The world keeps a purchase pending while its spawn tile is occupied.
    pub fn mercenaries(&self, pending: &[PendingMercenary], out: &mut Vec<Command>) {
        for purchase in pending {
            out.push(Command::SpawnMercenary {
                team: purchase.team,
                direction: purchase.direction,
            });
        }
    }

    /// Runs the regular spawner tick: count down while reloading, otherwise try to spawn.
    pub fn demons(&self, spawners: &[SpawnerSnapshot], out: &mut Vec<Command>) {
        for spawner in spawners {
            if spawner.reload_remaining > 0 {
                out.push(Command::CountDownSpawner {
                    spawner: spawner.id,
                });
            } else {
                out.push(Command::SpawnDemon {
                    spawner: spawner.id,
                });
            }
        }
    }

    /// Runs the provoked extra pass: every spawner with a free tile spawns,
    /// regardless of its reload timer.
    pub fn surge(
        &self,
        spawners: &[SpawnerSnapshot],
        occupancy: OccupancyView<'_>,
        out: &mut Vec<Command>,
    ) {
        for spawner in spawners {
            if occupancy.is_free(spawner.cell) {
                out.push(Command::SpawnDemon {
                    spawner: spawner.id,
                });
            }
        }
    }
}
