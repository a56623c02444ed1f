use std::borrow::Borrow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{standard_abilities_for, AbilitySet, PieceInstance, RosterError};

pub const KING: &str = "KING";
pub const FUDO: &str = "FUDO";
pub const CHUNIN: &str = "CHUNIN";
pub const ROOK: &str = "ROOK";
pub const BISHOP: &str = "BISHOP";
pub const GOLD: &str = "GOLD";
pub const SILVER: &str = "SILVER";
pub const KNIGHT: &str = "KNIGHT";
pub const LANCE: &str = "LANCE";
pub const PAWN: &str = "PAWN";

/// Σ cost × count of the default roster with its standard abilities.
pub const STANDARD_RULESET_COST: u32 = 59;

/// Every instance of one side must fit into that side's three home ranks.
pub const MAX_INSTANCES_PER_SIDE: u32 = 27;

/// The stable identifier of a [`PieceKind`], e.g. `"PAWN"`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindId(String);

impl KindId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_king(&self) -> bool {
        self.0 == KING
    }
}

impl Borrow<str> for KindId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for KindId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for KindId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceKind {
    pub id: KindId,
    /// Display name. Defaults to the id.
    #[serde(default)]
    pub label: String,
    /// How many instances of this kind each player gets.
    pub count: u8,
    /// The abilities every instance starts the design phase with.
    #[serde(default)]
    pub abilities: AbilitySet,
    #[serde(default = "promotable_by_default")]
    pub promotable: bool,
}

fn promotable_by_default() -> bool {
    true
}

impl PieceKind {
    fn builtin(id: &str, label: &str, count: u8, promotable: bool) -> Self {
        Self {
            id: KindId::new(id),
            label: String::from(label),
            count,
            abilities: standard_abilities_for(id),
            promotable,
        }
    }

    /// The king can never promote, whatever the roster says.
    pub fn can_promote(&self) -> bool {
        self.promotable && !self.id.is_king()
    }

    /// Locked kinds cannot be edited during the design phase.
    pub fn is_locked(&self) -> bool {
        self.id.is_king()
    }
}

/// Either a plain list of kinds, or a list wrapped in a `pieces` key.
#[derive(Deserialize)]
#[serde(untagged)]
enum RosterDocument {
    List(Vec<PieceKind>),
    Wrapped { pieces: Vec<PieceKind> },
}

/// The ordered roster of piece kinds for one session.
///
/// Immutable once constructed. The only ways to get one are the validated
/// constructors and [`Catalog::default()`], the built-in roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Catalog {
    kinds: Vec<PieceKind>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            kinds: vec![
                PieceKind::builtin(KING, "王", 1, false),
                PieceKind::builtin(FUDO, "不動", 2, false),
                PieceKind::builtin(CHUNIN, "仲人", 2, false),
                PieceKind::builtin(ROOK, "飛", 1, true),
                PieceKind::builtin(BISHOP, "角", 1, true),
                PieceKind::builtin(GOLD, "金", 2, false),
                PieceKind::builtin(SILVER, "銀", 2, true),
                PieceKind::builtin(KNIGHT, "桂", 2, true),
                PieceKind::builtin(LANCE, "香", 2, true),
                PieceKind::builtin(PAWN, "歩", 9, true),
            ],
        }
    }
}

impl Catalog {
    /// Validates a roster and turns it into a catalog.
    pub fn new(mut kinds: Vec<PieceKind>) -> Result<Self, RosterError> {
        if kinds.is_empty() {
            return Err(RosterError::Empty);
        }
        let mut seen = BTreeSet::new();
        for kind in &kinds {
            if !seen.insert(kind.id.clone()) {
                return Err(RosterError::DuplicateKind(kind.id.clone()));
            }
        }
        match kinds.iter().find(|kind| kind.id.is_king()) {
            None => return Err(RosterError::MissingKing),
            Some(king) if king.count != 1 => return Err(RosterError::KingCount(king.count)),
            Some(_) => {}
        }
        let total: u32 = kinds.iter().map(|kind| kind.count as u32).sum();
        if total > MAX_INSTANCES_PER_SIDE {
            return Err(RosterError::TooManyPieces {
                total,
                max: MAX_INSTANCES_PER_SIDE,
            });
        }
        for kind in kinds.iter_mut() {
            if kind.label.is_empty() {
                kind.label = kind.id.to_string();
            }
        }
        Ok(Self { kinds })
    }

    /// Parses and validates a JSON roster.
    pub fn from_json(text: &str) -> Result<Self, RosterError> {
        let kinds = match serde_json::from_str::<RosterDocument>(text)? {
            RosterDocument::List(kinds) => kinds,
            RosterDocument::Wrapped { pieces } => pieces,
        };
        Self::new(kinds)
    }

    /// Like [`Catalog::from_json()`], but a missing or broken roster yields the
    /// built-in one instead of an error.
    pub fn from_json_or_default(text: Option<&str>) -> Self {
        let Some(text) = text else {
            return Self::default();
        };
        match Self::from_json(text) {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!(%err, "Could not use the piece roster, falling back to the default roster");
                Self::default()
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&PieceKind> {
        self.kinds.iter().find(|kind| kind.id.as_str() == id)
    }

    pub fn kinds(&self) -> &[PieceKind] {
        &self.kinds
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PieceKind> {
        self.kinds.iter()
    }

    /// Number of piece instances each player owns at the start.
    pub fn total_instances(&self) -> u32 {
        self.kinds.iter().map(|kind| kind.count as u32).sum()
    }

    /// What a whole side costs when every instance keeps its base abilities.
    pub fn standard_cost(&self) -> u32 {
        self.kinds
            .iter()
            .map(|kind| kind.abilities.cost() * kind.count as u32)
            .sum()
    }

    pub fn can_promote(&self, id: &str) -> bool {
        self.get(id).is_some_and(PieceKind::can_promote)
    }

    /// The display name of a piece, prefixed with 成 once promoted.
    pub fn label_for(&self, piece: &PieceInstance) -> String {
        let base = self
            .get(piece.kind.as_str())
            .map_or(piece.kind.as_str(), |kind| kind.label.as_str());
        if piece.is_promoted() {
            format!("成{}", base)
        } else {
            String::from(base)
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a PieceKind;
    type IntoIter = std::slice::Iter<'a, PieceKind>;

    fn into_iter(self) -> Self::IntoIter {
        self.kinds.iter()
    }
}
