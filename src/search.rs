use {
    crate::*,
    std::collections::HashMap,
    strum::EnumCount,
};

/// Per-solve observational counters. These never influence the optimum, only reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SearchStats {
    pub states_visited: usize,
    pub cache_attempts: usize,
    pub cache_hits: usize,
    pub futile_hits: usize,
}

impl SearchStats {
    fn visit_node(&mut self) {
        self.states_visited += 1_usize;
    }

    fn hit_cache(&mut self) {
        self.cache_attempts += 1_usize;
        self.cache_hits += 1_usize;
    }

    fn miss_cache(&mut self) {
        self.cache_attempts += 1_usize;
    }

    fn detect_futile(&mut self) {
        self.futile_hits += 1_usize;
    }

    pub fn cache_misses(self) -> usize {
        self.cache_attempts - self.cache_hits
    }

    pub fn cache_hit_rate(self) -> f64 {
        if self.cache_attempts == 0_usize {
            0.0_f64
        } else {
            self.cache_hits as f64 / self.cache_attempts as f64
        }
    }
}

/// Build permissions for a single turn, defaulting to everything allowed. The engine threads a
/// restricted mask into the wait branch only, to skip wait-then-build orderings that an immediate
/// build already covers; children of build branches start fresh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AllowedBuilds([bool; ResourceKind::COUNT]);

impl AllowedBuilds {
    pub const ALL: Self = Self([true; ResourceKind::COUNT]);

    #[inline(always)]
    fn allows(self, kind: ResourceKind) -> bool {
        self.0[kind as usize]
    }

    fn forbid(&mut self, kind: ResourceKind) {
        self.0[kind as usize] = false;
    }
}

impl Default for AllowedBuilds {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Clone, Copy)]
struct MemoEntry {
    best_result: i32,
    remaining_turns: u16,
}

/// Depth-first explorer of the build-or-wait decision tree for one blueprint
///
/// Owns the memo table, the best-observed bound used for futility pruning, and the stats, so
/// concurrent solves of independent blueprints can never share search state.
pub struct Explorer {
    blueprint: Blueprint,
    cache: HashMap<Pack, MemoEntry>,
    best_observed: i32,
    stats: SearchStats,
}

impl Explorer {
    /// Result of a pruned or short-circuited branch; loses to every real result
    const NO_IMPROVEMENT: i32 = -1_i32;

    /// Build priority: the terminal kind first, then the base kinds
    const BUILD_ORDER: [ResourceKind; ResourceKind::COUNT] = [
        ResourceKind::Diamond,
        ResourceKind::Ore,
        ResourceKind::Clay,
        ResourceKind::Obsidian,
    ];

    pub fn new(blueprint: Blueprint) -> Self {
        Self {
            blueprint,
            cache: HashMap::new(),
            best_observed: 0_i32,
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Returns the maximum diamond stock reachable from `state` under optimal play. The memo
    /// table, pruning bound, and stats are reset first, so repeated runs are independent.
    pub fn run(&mut self, state: SimulationState) -> u16 {
        self.cache.clear();
        self.best_observed = 0_i32;
        self.stats = SearchStats::default();

        // The fold over branch results starts at zero, so the sentinel never escapes the root
        self.solve(state, AllowedBuilds::ALL) as u16
    }

    fn solve(&mut self, state: SimulationState, allowed: AllowedBuilds) -> i32 {
        self.stats.visit_node();

        if state.remaining_turns == 0_u16 {
            return state.pack.resources.diamonds as i32;
        }

        if let Some(entry) = self.cache.get(&state.pack).copied() {
            if state.remaining_turns < entry.remaining_turns {
                // This pack was already fully explored with more turns left. Reaching it again
                // on a longer route cannot beat what that exploration folded into the ancestors'
                // maxima, so the branch is abandoned rather than recomputed.
                self.stats.hit_cache();
                return Self::NO_IMPROVEMENT;
            } else if state.remaining_turns == entry.remaining_turns {
                self.stats.hit_cache();
                return entry.best_result;
            }
        }

        self.stats.miss_cache();

        if state.upper_bound_diamonds() < self.best_observed as u32 {
            // Even the most generous continuation cannot beat the best found elsewhere
            self.stats.detect_futile();
            return Self::NO_IMPROVEMENT;
        }

        let mut next_allowed: AllowedBuilds = AllowedBuilds::ALL;
        let mut best_result: i32 = 0_i32;

        for kind in Self::BUILD_ORDER {
            if !state.pack.can_build(&self.blueprint, kind) || !allowed.allows(kind) {
                continue;
            }

            // Building `kind` now dominates waiting first and building it next turn, so the
            // wait branch below is forbidden from doing that. The robot-count cap does not
            // undo the restriction.
            next_allowed.forbid(kind);

            if kind != ResourceKind::Diamond
                && state.pack.robots.get(kind) >= self.blueprint.max_useful(kind)
            {
                // More robots of a base kind than any build can consume per turn are worthless
                continue;
            }

            let build_result: i32 =
                self.solve(state.step(&self.blueprint, Some(kind)), AllowedBuilds::ALL);

            self.best_observed = self.best_observed.max(build_result);
            best_result = best_result.max(build_result);
        }

        let wait_result: i32 = self.solve(state.step(&self.blueprint, None), next_allowed);

        self.best_observed = self.best_observed.max(wait_result);
        best_result = best_result.max(wait_result);

        self.cache.insert(
            state.pack,
            MemoEntry {
                best_result,
                remaining_turns: state.remaining_turns,
            },
        );

        best_result
    }
}
