use {
    crate::*,
    nom::{
        branch::alt,
        bytes::complete::tag,
        character::complete::line_ending,
        combinator::{map, opt, value},
        error::Error,
        multi::separated_list1,
        sequence::{delimited, separated_pair, terminated, tuple},
        Err, IResult,
    },
    static_assertions::const_assert,
    std::mem::{size_of, transmute},
    strum::{EnumCount, EnumIter, IntoEnumIterator},
};

/// A mineral kind that robots can harvest. Exactly one robot kind exists per resource kind, and a
/// robot of kind `k` yields one unit of resource `k` per turn once built, so the enumerator
/// doubles as the robot kind.
///
/// `Diamond` is the terminal kind: the objective of a run is the final diamond stock, and no
/// robot's cost ever contains diamonds.
#[derive(Clone, Copy, Debug, EnumCount, EnumIter, Eq, PartialEq)]
#[repr(u8)]
pub enum ResourceKind {
    Ore,
    Clay,
    Obsidian,
    Diamond,
}

impl ResourceKind {
    const fn tag_str(self) -> &'static str {
        match self {
            Self::Ore => "ore",
            Self::Clay => "clay",
            Self::Obsidian => "obsidian",
            Self::Diamond => "diamond",
        }
    }

    /// Parses a base (spendable) resource kind name. Diamond is intentionally absent: cost
    /// clauses never name it.
    fn parse_base<'i>(input: &'i str) -> IResult<&'i str, Self> {
        alt((
            value(Self::Ore, tag(Self::Ore.tag_str())),
            value(Self::Clay, tag(Self::Clay.tag_str())),
            value(Self::Obsidian, tag(Self::Obsidian.tag_str())),
        ))(input)
    }
}

/// Counts of each resource kind. The same value type serves as a robot's cost row, a stock of
/// harvested resources, and a tally of owned robots.
///
/// The four counts are packed into 8 aligned bytes so that component-wise addition can be done as
/// a single `u64` addition. Counts stay far below `u16::MAX` for any realistic turn horizon, so
/// lane carry-over is not a concern.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(align(8))]
pub struct ResourceCounts {
    pub ore: u16,
    pub clay: u16,
    pub obsidian: u16,
    pub diamonds: u16,
}

const_assert!(size_of::<ResourceCounts>() == size_of::<u64>());

impl ResourceCounts {
    pub const ZERO: Self = Self {
        ore: 0_u16,
        clay: 0_u16,
        obsidian: 0_u16,
        diamonds: 0_u16,
    };

    #[inline(always)]
    pub const fn get(self, kind: ResourceKind) -> u16 {
        match kind {
            ResourceKind::Ore => self.ore,
            ResourceKind::Clay => self.clay,
            ResourceKind::Obsidian => self.obsidian,
            ResourceKind::Diamond => self.diamonds,
        }
    }

    #[inline(always)]
    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut u16 {
        match kind {
            ResourceKind::Ore => &mut self.ore,
            ResourceKind::Clay => &mut self.clay,
            ResourceKind::Obsidian => &mut self.obsidian,
            ResourceKind::Diamond => &mut self.diamonds,
        }
    }

    /// Whether every component of `other` is covered by `self`
    pub fn contains(self, other: Self) -> bool {
        ResourceKind::iter().all(|kind: ResourceKind| self.get(kind) >= other.get(kind))
    }

    /// Component-wise sum, as a single `u64` addition
    #[inline(always)]
    pub const fn add(self, other: Self) -> Self {
        Self::from_u64(self.as_u64() + other.as_u64())
    }

    /// Component-wise difference. The caller must have verified `self.contains(other)` first.
    pub fn sub(self, other: Self) -> Self {
        Self {
            ore: self.ore - other.ore,
            clay: self.clay - other.clay,
            obsidian: self.obsidian - other.obsidian,
            diamonds: self.diamonds - other.diamonds,
        }
    }

    #[inline(always)]
    const fn as_u64(self) -> u64 {
        // SAFETY: `ResourceCounts` has `align(8)`, and it's 8 bytes
        unsafe { transmute(self) }
    }

    #[inline(always)]
    const fn from_u64(value: u64) -> Self {
        // SAFETY: `ResourceCounts` has `align(8)`, and it's 8 bytes
        unsafe { transmute(value) }
    }
}

/// A robot cost table plus its derived per-resource robot caps
///
/// # Run-time Invariants
///
/// No robot cost has a non-zero `diamonds` component: cost clauses only name base resources, and
/// `new` preserves whatever cost rows it is given, so constructed-by-hand blueprints must uphold
/// this themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blueprint {
    pub id: u16,
    robot_costs: [ResourceCounts; ResourceKind::COUNT],
    max_useful: ResourceCounts,
}

impl Blueprint {
    pub fn new(id: u16, robot_costs: [ResourceCounts; ResourceKind::COUNT]) -> Self {
        let mut max_useful: ResourceCounts = ResourceCounts::ZERO;

        for kind in ResourceKind::iter() {
            *max_useful.get_mut(kind) = robot_costs
                .iter()
                .map(|robot_cost: &ResourceCounts| robot_cost.get(kind))
                .max()
                .unwrap_or_default();
        }

        Self {
            id,
            robot_costs,
            max_useful,
        }
    }

    /// The cost to build one robot of `kind`
    #[inline(always)]
    pub fn robot_cost(&self, kind: ResourceKind) -> ResourceCounts {
        self.robot_costs[kind as usize]
    }

    /// The largest amount of resource `kind` that a single build can consume. Owning more robots
    /// of a base kind than this can never unlock an additional build, since only one robot is
    /// built per turn.
    #[inline(always)]
    pub fn max_useful(&self, kind: ResourceKind) -> u16 {
        self.max_useful.get(kind)
    }

    /// Parses one ` and `-separated cost clause list, e.g. `3 ore and 14 clay`
    fn parse_robot_cost<'i>(input: &'i str) -> IResult<&'i str, ResourceCounts> {
        map(
            separated_list1(
                tag(" and "),
                separated_pair(parse_integer, tag(" "), ResourceKind::parse_base),
            ),
            |cost_clauses: Vec<(u16, ResourceKind)>| {
                let mut robot_cost: ResourceCounts = ResourceCounts::ZERO;

                for (count, kind) in cost_clauses {
                    *robot_cost.get_mut(kind) = count;
                }

                robot_cost
            },
        )(input)
    }
}

impl Parse for Blueprint {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        let (mut input, id): (&str, u16) =
            delimited(tag("Blueprint "), parse_integer, tag(":"))(input)?;

        let mut robot_costs: [ResourceCounts; ResourceKind::COUNT] =
            [ResourceCounts::ZERO; ResourceKind::COUNT];

        for kind in ResourceKind::iter() {
            let (next_input, robot_cost): (&str, ResourceCounts) = delimited(
                tuple((tag(" Each "), tag(kind.tag_str()), tag(" robot costs "))),
                Self::parse_robot_cost,
                tag("."),
            )(input)?;

            robot_costs[kind as usize] = robot_cost;
            input = next_input;
        }

        Ok((input, Self::new(id, robot_costs)))
    }
}

impl<'i> TryFrom<&'i str> for Blueprint {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}

/// The blueprints evaluated by one program run, one blueprint per input line
#[derive(Debug, PartialEq)]
pub struct Blueprints(Vec<Blueprint>);

impl Blueprints {
    pub fn iter(&self) -> impl Iterator<Item = &Blueprint> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Parse for Blueprints {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            terminated(separated_list1(line_ending, Blueprint::parse), opt(line_ending)),
            Self,
        )(input)
    }
}

impl<'i> TryFrom<&'i str> for Blueprints {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const BLUEPRINTS_STR: &str = "\
        Blueprint 1: \
        Each ore robot costs 4 ore. \
        Each clay robot costs 2 ore. \
        Each obsidian robot costs 3 ore and 14 clay. \
        Each diamond robot costs 2 ore and 7 obsidian.\n\
        Blueprint 2: \
        Each ore robot costs 2 ore. \
        Each clay robot costs 3 ore. \
        Each obsidian robot costs 3 ore and 8 clay. \
        Each diamond robot costs 3 ore and 12 obsidian.\n";

    fn cost(ore: u16, clay: u16, obsidian: u16) -> ResourceCounts {
        ResourceCounts {
            ore,
            clay,
            obsidian,
            diamonds: 0_u16,
        }
    }

    fn blueprints() -> &'static Blueprints {
        static ONCE_LOCK: OnceLock<Blueprints> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| {
            Blueprints(vec![
                Blueprint::new(
                    1_u16,
                    [
                        cost(4_u16, 0_u16, 0_u16),
                        cost(2_u16, 0_u16, 0_u16),
                        cost(3_u16, 14_u16, 0_u16),
                        cost(2_u16, 0_u16, 7_u16),
                    ],
                ),
                Blueprint::new(
                    2_u16,
                    [
                        cost(2_u16, 0_u16, 0_u16),
                        cost(3_u16, 0_u16, 0_u16),
                        cost(3_u16, 8_u16, 0_u16),
                        cost(3_u16, 0_u16, 12_u16),
                    ],
                ),
            ])
        })
    }

    #[test]
    fn test_try_from_str() {
        assert_eq!(
            Blueprints::try_from(BLUEPRINTS_STR).as_ref(),
            Ok(blueprints())
        );
    }

    #[test]
    fn test_max_useful() {
        let blueprint: &Blueprint = &blueprints().0[0_usize];

        assert_eq!(blueprint.max_useful(ResourceKind::Ore), 4_u16);
        assert_eq!(blueprint.max_useful(ResourceKind::Clay), 14_u16);
        assert_eq!(blueprint.max_useful(ResourceKind::Obsidian), 7_u16);
        assert_eq!(blueprint.max_useful(ResourceKind::Diamond), 0_u16);
    }

    #[test]
    fn test_costs_never_contain_diamonds() {
        for blueprint in blueprints().iter() {
            for kind in ResourceKind::iter() {
                assert_eq!(blueprint.robot_cost(kind).diamonds, 0_u16);
            }
        }
    }

    #[test]
    fn test_counts_add_is_component_wise() {
        let lhs: ResourceCounts = ResourceCounts {
            ore: 1_u16,
            clay: 20_u16,
            obsidian: 300_u16,
            diamonds: 4000_u16,
        };
        let rhs: ResourceCounts = ResourceCounts {
            ore: 5_u16,
            clay: 60_u16,
            obsidian: 700_u16,
            diamonds: 8000_u16,
        };

        assert_eq!(
            lhs.add(rhs),
            ResourceCounts {
                ore: 6_u16,
                clay: 80_u16,
                obsidian: 1000_u16,
                diamonds: 12000_u16
            }
        );
    }

    #[test]
    fn test_malformed_blueprint_is_rejected() {
        assert!(Blueprint::try_from("Blueprint 1: Each ore robot costs 4 diamond.").is_err());
        assert!(Blueprint::try_from("Blueprint 1: Each ore robot costs four ore.").is_err());
        assert!(Blueprints::try_from("").is_err());
    }
}
