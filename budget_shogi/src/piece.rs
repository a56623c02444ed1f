use std::borrow::Borrow;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{AbilitySet, InvalidPlayer, KindId, Square};

/// One of the two sides. Serialized as `1` or `2`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Player {
    /// Starts at the bottom (row 8) and moves first.
    One,
    /// Starts at the top (row 0).
    Two,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Row delta of one step "forward" for this player.
    pub fn forward_sign(self) -> i8 {
        match self {
            Player::One => -1,
            Player::Two => 1,
        }
    }

    /// The three rows farthest from this player's start.
    pub fn promotion_zone(self) -> RangeInclusive<u8> {
        match self {
            Player::One => 0..=2,
            Player::Two => 6..=8,
        }
    }

    pub fn in_promotion_zone(self, square: Square) -> bool {
        self.promotion_zone().contains(&square.row)
    }

    /// Index into per-player arrays.
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// Converts a square given from this player's point of view into a board
    /// square. `rank` counts from the player's home rank, `file` from the
    /// player's left. The second player's view is rotated by 180 degrees.
    pub fn square_from_home(self, rank: u8, file: u8) -> Square {
        match self {
            Player::One => Square::new(8 - rank, file),
            Player::Two => Square::new(rank, 8 - file),
        }
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> u8 {
        match player {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = InvalidPlayer;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            _ => Err(InvalidPlayer(value)),
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", u8::from(*self))
    }
}

/// Identifies one piece instance within its designer's configuration,
/// formatted as `<kind>-<index>`.
///
/// Both players have an instance called e.g. `PAWN-0`; which one is meant is
/// determined by the [`PieceInstance::config_owner`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(kind: &KindId, index: usize) -> Self {
        Self(format!("{}-{}", kind, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The kind part of the id.
    pub fn kind(&self) -> &str {
        self.0.rsplit_once('-').map_or(&self.0, |(kind, _)| kind)
    }
}

impl Borrow<str> for InstanceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        Self(String::from(id))
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A piece token, either on the board or in a hand.
///
/// The instance id and the config owner are fixed when the board is set up
/// and survive any number of captures and drops, so a captured piece keeps
/// moving the way its designer configured it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PieceInstance {
    pub kind: KindId,
    /// The side currently controlling the piece.
    pub owner: Player,
    /// Whose configuration store holds this piece's base abilities.
    pub config_owner: Player,
    pub instance_id: InstanceId,
    // Invariant: `extra_abilities.is_some() == promoted`
    promoted: bool,
    extra_abilities: Option<AbilitySet>,
}

impl PieceInstance {
    pub fn new(kind: KindId, owner: Player, index: usize) -> Self {
        let instance_id = InstanceId::new(&kind, index);
        Self {
            kind,
            owner,
            config_owner: owner,
            instance_id,
            promoted: false,
            extra_abilities: None,
        }
    }

    pub fn is_promoted(&self) -> bool {
        self.promoted
    }

    /// The abilities bought on promotion, if promoted.
    pub fn extra_abilities(&self) -> Option<AbilitySet> {
        self.extra_abilities
    }

    /// Promotes the piece. Promotion never grants slides.
    pub fn promote(&mut self, extra: AbilitySet) {
        self.promoted = true;
        self.extra_abilities = Some(extra.without_slides());
    }

    /// Turns a captured piece into a token in the capturer's hand.
    ///
    /// Promotion and its extras are lost; identity and designer are kept.
    #[must_use]
    pub fn captured_by(self, capturer: Player) -> Self {
        Self {
            owner: capturer,
            promoted: false,
            extra_abilities: None,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StepDir, SILVER};

    #[test]
    fn player_wire_format() {
        assert_eq!(serde_json::to_string(&Player::Two).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Player>("1").unwrap(), Player::One);
        assert!(serde_json::from_str::<Player>("3").is_err());
    }

    #[test]
    fn home_squares_are_rotated() {
        assert_eq!(Player::One.square_from_home(0, 0), Square::new(8, 0));
        assert_eq!(Player::Two.square_from_home(0, 0), Square::new(0, 8));
        assert_eq!(Player::One.square_from_home(1, 7), Square::new(7, 7));
        assert_eq!(Player::Two.square_from_home(1, 7), Square::new(1, 1));
    }

    #[test]
    fn promotion_zones() {
        assert!(Player::One.in_promotion_zone(Square::new(2, 4)));
        assert!(!Player::One.in_promotion_zone(Square::new(3, 4)));
        assert!(Player::Two.in_promotion_zone(Square::new(6, 0)));
        assert!(!Player::Two.in_promotion_zone(Square::new(2, 0)));
    }

    #[test]
    fn instance_ids() {
        let id = InstanceId::new(&KindId::from("GO-BETWEEN"), 1);
        assert_eq!(id.as_str(), "GO-BETWEEN-1");
        assert_eq!(id.kind(), "GO-BETWEEN");
    }

    #[test]
    fn capture_demotes_but_keeps_identity() {
        let mut piece = PieceInstance::new(KindId::from(SILVER), Player::Two, 1);
        piece.promote(AbilitySet::steps(&[StepDir::S]));
        assert!(piece.is_promoted());

        let token = piece.captured_by(Player::One);
        assert_eq!(token.owner, Player::One);
        assert_eq!(token.config_owner, Player::Two);
        assert_eq!(token.instance_id.as_str(), "SILVER-1");
        assert!(!token.is_promoted());
        assert_eq!(token.extra_abilities(), None);
    }
}
