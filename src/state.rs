use crate::*;

/// Accumulated resource stock and owned robots at a point in time
///
/// Packs are pure values: field-wise equality and hashing make histories with the same counts
/// indistinguishable, which is what makes them sound memoization keys.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Pack {
    pub resources: ResourceCounts,
    pub robots: ResourceCounts,
}

impl Pack {
    /// The conventional starting pack: one ore robot, nothing harvested yet
    pub const fn initial() -> Self {
        Self {
            resources: ResourceCounts::ZERO,
            robots: ResourceCounts {
                ore: 1_u16,
                clay: 0_u16,
                obsidian: 0_u16,
                diamonds: 0_u16,
            },
        }
    }

    /// One production tick: every owned robot adds one unit of its resource kind
    #[inline(always)]
    pub const fn produce(self) -> Self {
        Self {
            resources: self.resources.add(self.robots),
            robots: self.robots,
        }
    }

    /// Whether the current stock covers the cost of one robot of `kind`
    #[inline(always)]
    pub fn can_build(self, blueprint: &Blueprint, kind: ResourceKind) -> bool {
        self.resources.contains(blueprint.robot_cost(kind))
    }

    /// Spends the cost of one robot of `kind` and adds that robot.
    ///
    /// The caller must have verified `can_build` first; the precondition is not re-checked here.
    pub fn build(self, blueprint: &Blueprint, kind: ResourceKind) -> Self {
        let mut robots: ResourceCounts = self.robots;

        *robots.get_mut(kind) += 1_u16;

        Self {
            resources: self.resources.sub(blueprint.robot_cost(kind)),
            robots,
        }
    }
}

/// A pack paired with the number of turns left to act on it. States are ephemeral values: each
/// transition returns a new state, and a state is discarded once its subtree has been explored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SimulationState {
    pub pack: Pack,
    pub remaining_turns: u16,
}

impl SimulationState {
    pub const fn new(pack: Pack, remaining_turns: u16) -> Self {
        Self {
            pack,
            remaining_turns,
        }
    }

    /// Advances one turn: the chosen build is applied first, then every owned robot produces,
    /// the freshly built one included. Requires `remaining_turns > 0`.
    pub fn step(self, blueprint: &Blueprint, chosen_build: Option<ResourceKind>) -> Self {
        let pack: Pack = match chosen_build {
            Some(kind) => self.pack.build(blueprint, kind),
            None => self.pack,
        };

        Self {
            pack: pack.produce(),
            remaining_turns: self.remaining_turns - 1_u16,
        }
    }

    /// Diamonds reachable if a new diamond robot could be built every remaining turn: current
    /// stock, guaranteed production from owned robots, and the triangle-number series the
    /// hypothetical builds would yield. Deliberately generous, never an under-estimate, which is
    /// all that futility pruning requires of it.
    pub fn upper_bound_diamonds(self) -> u32 {
        self.pack.resources.diamonds as u32
            + self.remaining_turns as u32 * self.pack.robots.diamonds as u32
            + triangle_number(self.remaining_turns as usize) as u32
    }
}
