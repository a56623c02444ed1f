use serde::Serialize;

use crate::{Ability, KindId, Square};

/// Why an action was refused.
///
/// A rejected action never changes any state, so these are ordinary
/// outcomes rather than faults. Serialized with a `reason` tag, e.g.
/// `{"reason": "over-budget", "cost": 81, "budget": 79}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum Rejected {
    /// A design edit or a promotion draft would exceed its point ceiling.
    OverBudget { cost: u32, budget: u32 },
    /// The kind cannot be customized.
    LockedPiece { kind: KindId },
    /// The move or drop target is not allowed.
    IllegalDestination { detail: Illegal },
    /// The named kind or instance does not exist.
    UnknownPiece { id: String },
    /// The ability cannot be bought in this context.
    UnavailableAbility { ability: Ability },
    /// The action does not apply to the current state.
    WrongPhase,
    /// The match is over.
    GameOver,
}

/// Details for [`Rejected::IllegalDestination`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Illegal {
    OffBoard,
    NoPieceAtOrigin,
    NotYourPiece,
    NotYourTurn,
    NotReachable { square: Square },
    Occupied { square: Square },
    EmptyHandStack,
}

impl std::error::Error for Rejected {}

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejected::OverBudget { cost, budget } => {
                write!(f, "Costs {} points, but only {} are available", cost, budget)
            }
            Rejected::LockedPiece { kind } => write!(f, "The {} cannot be customized", kind),
            Rejected::IllegalDestination { detail } => write!(f, "Illegal destination: {}", detail),
            Rejected::UnknownPiece { id } => write!(f, "There is no piece called {}", id),
            Rejected::UnavailableAbility { ability } => {
                write!(f, "The {} cannot be chosen here", ability)
            }
            Rejected::WrongPhase => write!(f, "This action is not possible right now"),
            Rejected::GameOver => write!(f, "The game is already over"),
        }
    }
}

impl std::fmt::Display for Illegal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Illegal::OffBoard => write!(f, "the square is outside of the board"),
            Illegal::NoPieceAtOrigin => write!(f, "there is no piece on the origin square"),
            Illegal::NotYourPiece => write!(f, "the piece belongs to the opponent"),
            Illegal::NotYourTurn => write!(f, "it is the opponent's turn"),
            Illegal::NotReachable { square } => {
                write!(f, "the piece cannot reach {}", square)
            }
            Illegal::Occupied { square } => write!(f, "{} is occupied", square),
            Illegal::EmptyHandStack => write!(f, "there is no such piece in hand"),
        }
    }
}

impl From<Illegal> for Rejected {
    fn from(detail: Illegal) -> Self {
        Rejected::IllegalDestination { detail }
    }
}

/// The error type for [`Catalog::from_json()`](crate::Catalog::from_json).
#[derive(Debug)]
pub enum RosterError {
    Json(serde_json::Error),
    Empty,
    DuplicateKind(KindId),
    MissingKing,
    KingCount(u8),
    TooManyPieces { total: u32, max: u32 },
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Json(_) => write!(f, "The roster is not valid JSON"),
            RosterError::Empty => write!(f, "The roster does not contain any pieces"),
            RosterError::DuplicateKind(kind) => {
                write!(f, "The piece kind {} is listed more than once", kind)
            }
            RosterError::MissingKing => write!(f, "The roster has no KING"),
            RosterError::KingCount(count) => {
                write!(f, "Each player needs exactly one KING, but the roster has {}", count)
            }
            RosterError::TooManyPieces { total, max } => write!(
                f,
                "The roster has {} pieces per player, but at most {} fit on the home ranks",
                total, max
            ),
        }
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        RosterError::Json(err)
    }
}

/// A player number other than 1 or 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidPlayer(pub u8);

impl std::error::Error for InvalidPlayer {}

impl std::fmt::Display for InvalidPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "There is no player {}, only 1 and 2", self.0)
    }
}
