//! Flavor name allocation for towers and lane units.

use lane_battle_core::{Team, TowerKind};

const RED_MERCENARIES: &[&str] = &[
    "Rodney", "Robert", "Ryan", "Raulston", "Russell", "Ronald", "Roger", "Roland", "Ralph",
    "Raymond", "Ricky", "Reuben", "Rafael", "Randy", "Rocco", "Raul", "Rory", "Rex", "Ruben",
    "Rhys", "Ronan", "Ross", "Roman", "Remy", "Reed", "Ramsey", "Rudy", "Rylan", "Rishi", "Rainer",
    "Ronin", "Rafe", "Ryker", "Ray", "Rick", "Raj", "Raiden", "Reese", "Rami", "River", "Roderick",
    "Roosevelt", "Rashad", "Ridley", "Raulito", "Roscoe", "Rafferty", "Renzo", "Rowan",
];

const BLUE_MERCENARIES: &[&str] = &[
    "Ben", "Boole", "Billy", "Benson", "Bradley", "Brayden", "Brent", "Brett", "Brody", "Brock",
    "Bruce", "Barry", "Bobby", "Bryan", "Brady", "Bill", "Bob", "Blaine", "Blake", "Basil", "Beau",
    "Barrett", "Brodie", "Bo", "Benedict", "Boris", "Byron", "Baxter", "Bowie", "Bennett", "Bryce",
    "Benton", "Benedek", "Blaise", "Branson", "Benedictus", "Bingham", "Bodie", "Bram", "Briar",
    "Blair", "Buster", "Bishop", "Boden", "Bernard", "Benny", "Baldwin", "Barney", "Benedetto",
    "Basilio",
];

const DEMONS: &[&str] = &[
    "Doyle", "Drake", "Donald", "Dorian", "Dylan", "Douglas", "Dean", "Dennis", "Darren", "Damon",
    "Dale", "Desmond", "Drew", "Davis", "Derrick", "Dustin", "Devin", "Dominic", "Diego", "Dexter",
    "Damian", "Declan", "Dario", "Dane", "Donovan", "Dimitri", "Darrell", "Darnell", "Daniel",
    "Dash", "Duncan", "Dallas", "Deacon", "Dayton", "Dirk", "Dewey", "Dax", "Dilan", "Dmitri",
    "Darryl", "Dominick", "Deshaun", "Domenico", "Deandre", "Dion", "Darwin",
];

const RED_TOWERS: &[&str] = &[
    "Optimus", "Wheeljack", "BumbleBee", "Tonnenman", "Holdsworth", "Cliffjumper", "Prowl", "Jazz",
    "Sideswipe", "Ratchet", "Ironhide", "Hound", "Mirage", "Trailbreaker", "Sunstreaker",
    "Bluestreak", "Windcharger", "Brawn", "Huffer", "Gears", "Skyfire", "Grimlock", "Slag",
    "Sludge", "Snarl", "Swoop", "Warpath", "Tracks", "Grapple", "Blaster", "Red Alert",
    "Smokescreen", "Perceptor", "Seaspray", "Hoist", "Powerglide", "Beachcomber", "Inferno",
    "Cosmos", "Omega", "Devcon", "Skids", "Alpha", "Silverbolt", "Air Raid", "Slingshot", "Skydive",
    "Fireflight", "Superion", "Streetwise",
];

const BLUE_TOWERS: &[&str] = &[
    "Megatron", "Galvatron", "Skywarp", "Starscream", "Thundercracker", "Soundwave", "Shockwave",
    "Reflector", "Shrapnel", "Bombshell", "Kickback", "Hook", "Scrapper", "Bonecrusher",
    "Long Haul", "Scavenger", "Mixmaster", "Devastator", "Thrust", "Blitzwing", "Dirge",
    "Astrotrain", "Motormaster", "Drag Strip", "Dead End", "Breakdown", "Wildrider", "Menasor",
    "Brawl", "Swindle", "Blastoff", "Vortex", "Onslaught", "Bruticus", "Cyclonus", "Scourge",
    "Octane", "Trypticon", "Rampage", "Headstrong", "Razorclaw", "Divebomb", "Predaking",
    "Runamuck", "Runabout", "Ripper", "Blot", "Cutthroat", "Abominus", "Skullcruncher",
];

/// Cycles through fixed name tables, one cursor per table.
///
/// Owned by a single world so concurrent simulations never share counters.
#[derive(Clone, Debug, Default)]
pub(crate) struct NameAllocator {
    red_mercenary: usize,
    blue_mercenary: usize,
    demon: usize,
    red_tower: usize,
    blue_tower: usize,
}

impl NameAllocator {
    /// Next mercenary name for the team.
    pub(crate) fn mercenary(&mut self, team: Team) -> String {
        match team {
            Team::Red => next(RED_MERCENARIES, &mut self.red_mercenary),
            Team::Blue => next(BLUE_MERCENARIES, &mut self.blue_mercenary),
        }
    }

    /// Next demon name.
    pub(crate) fn demon(&mut self) -> String {
        next(DEMONS, &mut self.demon)
    }

    /// Next tower name, prefixed with the team initial and the kind code.
    pub(crate) fn tower(&mut self, team: Team, kind: TowerKind) -> String {
        let (prefix, name) = match team {
            Team::Red => ("R", next(RED_TOWERS, &mut self.red_tower)),
            Team::Blue => ("B", next(BLUE_TOWERS, &mut self.blue_tower)),
        };
        format!("{prefix}_{}_{name}", kind.code())
    }
}

fn next(table: &[&str], cursor: &mut usize) -> String {
    let name = table.get(*cursor).copied().unwrap_or_default();
    *cursor = (*cursor + 1) % table.len().max(1);
    name.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_cycle_independently() {
        let mut names = NameAllocator::default();
        assert_eq!(names.mercenary(Team::Red), "Rodney");
        assert_eq!(names.mercenary(Team::Blue), "Ben");
        assert_eq!(names.mercenary(Team::Red), "Robert");
        assert_eq!(names.demon(), "Doyle");
        assert_eq!(names.tower(Team::Red, TowerKind::Cannon), "R_CN_Optimus");
        assert_eq!(names.tower(Team::Blue, TowerKind::House), "B_HS_Megatron");
    }

    #[test]
    fn names_do_not_repeat_within_a_cycle() {
        for table in [RED_MERCENARIES, BLUE_MERCENARIES, DEMONS, RED_TOWERS, BLUE_TOWERS] {
            let distinct: std::collections::HashSet<&str> = table.iter().copied().collect();
            assert_eq!(distinct.len(), table.len());
            assert!(table.len() >= 45, "table too short: {}", table.len());
        }

        let mut names = NameAllocator::default();
        let blues: Vec<String> = (0..BLUE_MERCENARIES.len())
            .map(|_| names.mercenary(Team::Blue))
            .collect();
        assert_eq!(blues.last().map(String::as_str), Some("Basilio"));
    }

    #[test]
    fn cursor_wraps_after_last_name() {
        let mut names = NameAllocator::default();
        let first = names.demon();
        for _ in 1..DEMONS.len() {
            let _ = names.demon();
        }
        assert_eq!(names.demon(), first);
    }
}
