use serde::{Deserialize, Serialize};

use crate::bitset::bitset_traits;
use crate::{BISHOP, GOLD, KING, KNIGHT, LANCE, PAWN, ROOK, SILVER};

/// Cost of a single step direction.
pub const STEP_COST: u32 = 1;
/// Cost of the knight jump.
pub const KNIGHT_COST: u32 = 2 * STEP_COST;
/// Cost of each slide capability. Overlapping slides are not discounted.
pub const SLIDE_COST: u32 = 4 * STEP_COST;

/// The points each player may spend on their whole piece set during the design phase.
pub const POINT_BUDGET: u32 = 79;
/// The points a promoting piece may spend on extra steps and the knight jump.
pub const PROMOTION_BUDGET: u32 = 2 * STEP_COST;

/// One of the eight single-step directions.
///
/// Directions are relative to the piece's owner: "north" is always forward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum StepDir {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl StepDir {
    pub const ALL: [StepDir; 8] = [
        StepDir::N,
        StepDir::S,
        StepDir::E,
        StepDir::W,
        StepDir::NE,
        StepDir::NW,
        StepDir::SE,
        StepDir::SW,
    ];

    /// The offset as `(forward, column)`.
    ///
    /// Only the forward component is mirrored for the second player, the
    /// column component is absolute.
    pub fn offset(self) -> (i8, i8) {
        match self {
            StepDir::N => (1, 0),
            StepDir::S => (-1, 0),
            StepDir::E => (0, 1),
            StepDir::W => (0, -1),
            StepDir::NE => (1, 1),
            StepDir::NW => (1, -1),
            StepDir::SE => (-1, 1),
            StepDir::SW => (-1, -1),
        }
    }
}

/// One of the three sliding capabilities.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SlideKind {
    Forward,
    Orthogonal,
    Diagonal,
}

impl SlideKind {
    pub const ALL: [SlideKind; 3] = [SlideKind::Forward, SlideKind::Orthogonal, SlideKind::Diagonal];

    /// The directions walked by this slide, as `(forward, column)` offsets.
    pub fn directions(self) -> &'static [(i8, i8)] {
        match self {
            SlideKind::Forward => &[(1, 0)],
            SlideKind::Orthogonal => &[(1, 0), (-1, 0), (0, 1), (0, -1)],
            SlideKind::Diagonal => &[(1, 1), (1, -1), (-1, 1), (-1, -1)],
        }
    }
}

/// A compact set of [`StepDir`]s.
///
/// Like the other flag sets in this crate, this is an immutable `Copy` type:
/// "mutating" methods return a new value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "StepFlags", into = "StepFlags")]
pub struct StepSet {
    bits: u8,
}

bitset_traits!(StepSet, 0xff);

impl StepSet {
    pub const EMPTY: StepSet = StepSet { bits: 0 };
    pub const ALL: StepSet = StepSet { bits: 0xff };

    pub fn from_dirs(dirs: &[StepDir]) -> Self {
        dirs.iter().fold(Self::EMPTY, |set, &dir| set.insert(dir))
    }

    pub fn len(self) -> u32 {
        self.bits.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn contains(self, dir: StepDir) -> bool {
        self.bits & (1 << dir as u8) != 0
    }

    #[must_use]
    pub fn insert(self, dir: StepDir) -> Self {
        Self {
            bits: self.bits | (1 << dir as u8),
        }
    }

    #[must_use]
    pub fn remove(self, dir: StepDir) -> Self {
        Self {
            bits: self.bits & !(1 << dir as u8),
        }
    }

    pub fn iter(self) -> impl Iterator<Item = StepDir> {
        StepDir::ALL.into_iter().filter(move |&dir| self.contains(dir))
    }
}

/// A compact set of [`SlideKind`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "SlideFlags", into = "SlideFlags")]
pub struct SlideSet {
    bits: u8,
}

bitset_traits!(SlideSet, 0b111);

impl SlideSet {
    pub const EMPTY: SlideSet = SlideSet { bits: 0 };

    pub fn len(self) -> u32 {
        self.bits.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn contains(self, kind: SlideKind) -> bool {
        self.bits & (1 << kind as u8) != 0
    }

    #[must_use]
    pub fn insert(self, kind: SlideKind) -> Self {
        Self {
            bits: self.bits | (1 << kind as u8),
        }
    }

    #[must_use]
    pub fn remove(self, kind: SlideKind) -> Self {
        Self {
            bits: self.bits & !(1 << kind as u8),
        }
    }

    pub fn iter(self) -> impl Iterator<Item = SlideKind> {
        SlideKind::ALL.into_iter().filter(move |&kind| self.contains(kind))
    }
}

// The wire format of the two flag sets: an object of booleans, where a
// missing field means `false`.

#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
struct StepFlags {
    n: bool,
    s: bool,
    e: bool,
    w: bool,
    ne: bool,
    nw: bool,
    se: bool,
    sw: bool,
}

impl From<StepFlags> for StepSet {
    fn from(flags: StepFlags) -> Self {
        let pairs = [
            (flags.n, StepDir::N),
            (flags.s, StepDir::S),
            (flags.e, StepDir::E),
            (flags.w, StepDir::W),
            (flags.ne, StepDir::NE),
            (flags.nw, StepDir::NW),
            (flags.se, StepDir::SE),
            (flags.sw, StepDir::SW),
        ];
        pairs
            .into_iter()
            .filter(|&(on, _)| on)
            .fold(StepSet::EMPTY, |set, (_, dir)| set.insert(dir))
    }
}

impl From<StepSet> for StepFlags {
    fn from(set: StepSet) -> Self {
        StepFlags {
            n: set.contains(StepDir::N),
            s: set.contains(StepDir::S),
            e: set.contains(StepDir::E),
            w: set.contains(StepDir::W),
            ne: set.contains(StepDir::NE),
            nw: set.contains(StepDir::NW),
            se: set.contains(StepDir::SE),
            sw: set.contains(StepDir::SW),
        }
    }
}

#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
struct SlideFlags {
    forward: bool,
    orthogonal: bool,
    diagonal: bool,
}

impl From<SlideFlags> for SlideSet {
    fn from(flags: SlideFlags) -> Self {
        let mut set = SlideSet::EMPTY;
        if flags.forward {
            set = set.insert(SlideKind::Forward);
        }
        if flags.orthogonal {
            set = set.insert(SlideKind::Orthogonal);
        }
        if flags.diagonal {
            set = set.insert(SlideKind::Diagonal);
        }
        set
    }
}

impl From<SlideSet> for SlideFlags {
    fn from(set: SlideSet) -> Self {
        SlideFlags {
            forward: set.contains(SlideKind::Forward),
            orthogonal: set.contains(SlideKind::Orthogonal),
            diagonal: set.contains(SlideKind::Diagonal),
        }
    }
}

/// A single capability that can be switched on or off.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Step(StepDir),
    Knight,
    Slide(SlideKind),
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ability::Step(dir) => write!(f, "step {:?}", dir),
            Ability::Knight => write!(f, "knight jump"),
            Ability::Slide(kind) => write!(f, "{:?} slide", kind),
        }
    }
}

/// Everything one piece (or one promotion bonus) can do.
///
/// Every field is always present, so a missing field on the wire is `false`.
/// Combining two sets with `|` is the same as [`merge`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilitySet {
    pub step: StepSet,
    pub knight: bool,
    pub slide: SlideSet,
}

impl AbilitySet {
    pub const EMPTY: AbilitySet = AbilitySet {
        step: StepSet::EMPTY,
        knight: false,
        slide: SlideSet::EMPTY,
    };

    pub fn steps(dirs: &[StepDir]) -> Self {
        Self {
            step: StepSet::from_dirs(dirs),
            ..Self::EMPTY
        }
    }

    pub fn slides(kind: SlideKind) -> Self {
        Self {
            slide: SlideSet::EMPTY.insert(kind),
            ..Self::EMPTY
        }
    }

    /// The point cost of this set. Purely additive, no cross-term discounts.
    pub fn cost(&self) -> u32 {
        self.step.len() * STEP_COST
            + if self.knight { KNIGHT_COST } else { 0 }
            + self.slide.len() * SLIDE_COST
    }

    pub fn is_empty(&self) -> bool {
        self.step.is_empty() && !self.knight && self.slide.is_empty()
    }

    pub fn contains(&self, ability: Ability) -> bool {
        match ability {
            Ability::Step(dir) => self.step.contains(dir),
            Ability::Knight => self.knight,
            Ability::Slide(kind) => self.slide.contains(kind),
        }
    }

    #[must_use]
    pub fn with(self, ability: Ability, on: bool) -> Self {
        let mut next = self;
        match ability {
            Ability::Step(dir) => {
                next.step = if on { next.step.insert(dir) } else { next.step.remove(dir) }
            }
            Ability::Knight => next.knight = on,
            Ability::Slide(kind) => {
                next.slide = if on { next.slide.insert(kind) } else { next.slide.remove(kind) }
            }
        }
        next
    }

    #[must_use]
    pub fn toggle(self, ability: Ability) -> Self {
        self.with(ability, !self.contains(ability))
    }

    /// The same set with every slide removed, as granted by promotion.
    #[must_use]
    pub fn without_slides(self) -> Self {
        Self {
            slide: SlideSet::EMPTY,
            ..self
        }
    }
}

impl std::ops::BitOr for AbilitySet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            step: self.step | rhs.step,
            knight: self.knight || rhs.knight,
            slide: self.slide | rhs.slide,
        }
    }
}

/// Combines base abilities with optional extra abilities. Never removes anything.
pub fn merge(base: AbilitySet, extra: Option<AbilitySet>) -> AbilitySet {
    match extra {
        Some(extra) => base | extra,
        None => base,
    }
}

/// The conventional shogi movement of a well-known piece kind.
///
/// Kinds without a conventional movement get the empty set.
pub fn standard_abilities_for(kind: &str) -> AbilitySet {
    use StepDir::*;
    match kind {
        KING => AbilitySet {
            step: StepSet::ALL,
            ..AbilitySet::EMPTY
        },
        ROOK => AbilitySet::slides(SlideKind::Orthogonal),
        BISHOP => AbilitySet::slides(SlideKind::Diagonal),
        GOLD => AbilitySet::steps(&[N, S, E, W, NE, NW]),
        SILVER => AbilitySet::steps(&[N, NE, NW, SE, SW]),
        KNIGHT => AbilitySet {
            knight: true,
            ..AbilitySet::EMPTY
        },
        LANCE => AbilitySet::slides(SlideKind::Forward),
        PAWN => AbilitySet::steps(&[N]),
        _ => AbilitySet::EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    quickcheck! {
        fn merge_never_lowers_cost(a: AbilitySet, b: AbilitySet) -> bool {
            let merged = merge(a, Some(b));
            merged.cost() >= a.cost().max(b.cost())
        }

        fn merge_is_commutative(a: AbilitySet, b: AbilitySet) -> bool {
            merge(a, Some(b)) == merge(b, Some(a))
        }

        fn merge_is_idempotent(a: AbilitySet) -> bool {
            merge(a, Some(a)) == a && merge(a, None) == a
        }

        fn toggle_twice_is_identity(a: AbilitySet, ability: Ability) -> bool {
            a.toggle(ability).toggle(ability) == a
        }
    }

    #[test]
    fn cost_ratios() {
        assert_eq!(AbilitySet::steps(&[StepDir::N]).cost(), STEP_COST);
        let knight = AbilitySet::EMPTY.with(Ability::Knight, true);
        assert_eq!(knight.cost(), 2 * STEP_COST);
        for kind in SlideKind::ALL {
            assert_eq!(AbilitySet::slides(kind).cost(), 4 * STEP_COST);
        }
        let everything = AbilitySet {
            step: StepSet::ALL,
            knight: true,
            slide: !SlideSet::EMPTY,
        };
        assert_eq!(everything.cost(), 8 + 2 + 12);
    }

    #[test]
    fn standard_sets() {
        assert_eq!(standard_abilities_for(KING).cost(), 8);
        assert_eq!(standard_abilities_for(GOLD).step.len(), 6);
        assert!(!standard_abilities_for(GOLD).step.contains(StepDir::SE));
        assert_eq!(standard_abilities_for(SILVER).step.len(), 5);
        assert!(!standard_abilities_for(SILVER).step.contains(StepDir::S));
        assert!(standard_abilities_for(LANCE).slide.contains(SlideKind::Forward));
        assert!(standard_abilities_for("FUDO").is_empty());
    }

    #[test]
    fn wire_format_defaults_missing_fields() {
        let parsed: AbilitySet =
            serde_json::from_str(r#"{"step": {"n": true, "ne": true}, "slide": {}}"#).unwrap();
        assert_eq!(parsed, AbilitySet::steps(&[StepDir::N, StepDir::NE]));

        let json = serde_json::to_value(AbilitySet::slides(SlideKind::Diagonal)).unwrap();
        assert_eq!(json["slide"]["diagonal"], true);
        assert_eq!(json["slide"]["forward"], false);
        assert_eq!(json["step"]["sw"], false);
        assert_eq!(json["knight"], false);
    }

    #[test]
    fn ability_wire_format() {
        let ability: Ability = serde_json::from_str(r#"{"step": "nw"}"#).unwrap();
        assert_eq!(ability, Ability::Step(StepDir::NW));
        let ability: Ability = serde_json::from_str(r#""knight""#).unwrap();
        assert_eq!(ability, Ability::Knight);
    }
}
