use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{merge, AbilitySet, Board, ConfigStore, PieceInstance, Square};

/// A reachable destination.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub to: Square,
    /// Whether an opponent's piece stands on `to`.
    pub capture: bool,
}

/// Knight jumps as `(forward, column)` offsets.
const KNIGHT_JUMPS: [(i8, i8); 2] = [(2, -1), (2, 1)];

/// What a piece can do right now: its configured abilities plus whatever
/// it bought when promoting.
pub fn effective_abilities(piece: &PieceInstance, config: &ConfigStore) -> AbilitySet {
    merge(config.lookup(piece), piece.extra_abilities())
}

/// Collects destinations, keeping one entry per square.
struct Destinations<'a> {
    board: &'a Board,
    piece: &'a PieceInstance,
    include_own: bool,
    found: BTreeMap<Square, bool>,
}

impl Destinations<'_> {
    /// Records `to` if it may be entered. Returns whether a slide may continue past it.
    fn consider(&mut self, to: Square) -> bool {
        match self.board.get(to) {
            None => {
                self.insert(to, false);
                true
            }
            Some(other) if other.owner != self.piece.owner => {
                self.insert(to, true);
                false
            }
            Some(_) => {
                if self.include_own {
                    self.insert(to, false);
                }
                false
            }
        }
    }

    fn insert(&mut self, to: Square, capture: bool) {
        *self.found.entry(to).or_insert(capture) |= capture;
    }
}

/// The destinations `piece` can reach from `origin`.
///
/// The base abilities come from `config`, which must be the store of the
/// piece's config owner. Directions are oriented by the piece's current owner.
/// Moves are purely geometric: there is no notion of check.
///
/// With `include_own`, squares of the piece's own side are included as
/// non-captures (useful for coverage checks). Slides still stop there.
///
/// The result is sorted by square and has one entry per square; if a square is
/// reachable in several ways, the capturing variant wins.
pub fn legal_moves(
    board: &Board,
    origin: Square,
    piece: &PieceInstance,
    config: &ConfigStore,
    include_own: bool,
) -> Vec<Move> {
    let abilities = effective_abilities(piece, config);
    let forward = piece.owner.forward_sign();
    let orient = |(d_forward, d_col): (i8, i8)| (d_forward * forward, d_col);

    let mut destinations = Destinations {
        board,
        piece,
        include_own,
        found: BTreeMap::new(),
    };

    for dir in abilities.step.iter() {
        let (d_row, d_col) = orient(dir.offset());
        if let Some(to) = origin.offset(d_row, d_col) {
            destinations.consider(to);
        }
    }

    if abilities.knight {
        for jump in KNIGHT_JUMPS {
            let (d_row, d_col) = orient(jump);
            if let Some(to) = origin.offset(d_row, d_col) {
                destinations.consider(to);
            }
        }
    }

    for slide in abilities.slide.iter() {
        for &direction in slide.directions() {
            let (d_row, d_col) = orient(direction);
            let mut cursor = origin;
            while let Some(to) = cursor.offset(d_row, d_col) {
                if !destinations.consider(to) {
                    break;
                }
                cursor = to;
            }
        }
    }

    destinations
        .found
        .into_iter()
        .map(|(to, capture)| Move { to, capture })
        .collect()
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::{Catalog, KindId, PieceKind, Player, SlideKind, StepDir, KING, LANCE, PAWN, ROOK};

    /// A store where `PAWN-0` has the given abilities, with a player one and
    /// a player two instance of it.
    fn store_with(abilities: AbilitySet) -> (ConfigStore, PieceInstance, PieceInstance) {
        let catalog = Catalog::new(vec![
            PieceKind {
                id: KindId::from(KING),
                label: String::new(),
                count: 1,
                abilities: AbilitySet::EMPTY,
                promotable: false,
            },
            PieceKind {
                id: KindId::from(PAWN),
                label: String::new(),
                count: 1,
                abilities,
                promotable: true,
            },
        ])
        .unwrap();
        let store = ConfigStore::from_catalog(&catalog);
        let mine = PieceInstance::new(KindId::from(PAWN), Player::One, 0);
        let theirs = PieceInstance::new(KindId::from(PAWN), Player::Two, 0);
        (store, mine, theirs)
    }

    fn squares(moves: &[Move]) -> Vec<(u8, u8)> {
        moves.iter().map(|m| (m.to.row, m.to.col)).collect()
    }

    #[test]
    fn orthogonal_slide_from_the_centre() {
        let (store, piece, _) = store_with(AbilitySet::slides(SlideKind::Orthogonal));
        let mut board = Board::empty();
        let origin = Square::new(4, 4);
        board.place(origin, piece.clone());
        let moves = legal_moves(&board, origin, &piece, &store, false);
        assert_eq!(moves.len(), 16);
        assert!(moves.iter().all(|m| !m.capture));
        assert!(moves.iter().all(|m| m.to.row == 4 || m.to.col == 4));
    }

    #[test]
    fn slides_stop_at_the_first_piece() {
        let (store, piece, enemy) = store_with(AbilitySet::slides(SlideKind::Orthogonal));
        let mut board = Board::empty();
        let origin = Square::new(4, 4);
        board.place(origin, piece.clone());
        board.place(Square::new(2, 4), enemy.clone());
        board.place(Square::new(4, 6), piece.clone());

        let moves = legal_moves(&board, origin, &piece, &store, false);
        // North: (3,4) then the enemy at (2,4), nothing behind it.
        assert!(moves.contains(&Move { to: Square::new(3, 4), capture: false }));
        assert!(moves.contains(&Move { to: Square::new(2, 4), capture: true }));
        assert!(!moves.iter().any(|m| m.to.col == 4 && m.to.row < 2));
        // East: (4,5) only, the own piece at (4,6) is excluded.
        assert!(moves.contains(&Move { to: Square::new(4, 5), capture: false }));
        assert!(!moves.iter().any(|m| m.to.row == 4 && m.to.col >= 6));
        assert_eq!(moves.len(), 2 + 1 + 4 + 4);

        let coverage = legal_moves(&board, origin, &piece, &store, true);
        assert!(coverage.contains(&Move { to: Square::new(4, 6), capture: false }));
        assert!(!coverage.iter().any(|m| m.to == Square::new(4, 7)));
    }

    #[test]
    fn forward_is_mirrored_for_player_two() {
        let (store, mine, theirs) = store_with(AbilitySet::steps(&[StepDir::N, StepDir::E]));
        let mut board = Board::empty();
        board.place(Square::new(4, 4), mine.clone());
        board.place(Square::new(1, 1), theirs.clone());

        let moves = legal_moves(&board, Square::new(4, 4), &mine, &store, false);
        assert_eq!(squares(&moves), vec![(3, 4), (4, 5)]);
        // Player two's store is looked up the same way; orientation comes from the owner.
        let moves = legal_moves(&board, Square::new(1, 1), &theirs, &store, false);
        assert_eq!(squares(&moves), vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let knight = AbilitySet::EMPTY.with(crate::Ability::Knight, true);
        let (store, piece, enemy) = store_with(knight);
        let mut board = Board::empty();
        board.place(Square::new(8, 0), piece.clone());
        board.place(Square::new(7, 0), enemy.clone());
        board.place(Square::new(7, 1), enemy.clone());
        board.place(Square::new(6, 1), enemy.clone());

        let moves = legal_moves(&board, Square::new(8, 0), &piece, &store, false);
        assert_eq!(moves, vec![Move { to: Square::new(6, 1), capture: true }]);
    }

    #[test]
    fn overlapping_abilities_are_deduplicated() {
        let abilities = AbilitySet::steps(&[StepDir::N])
            | AbilitySet::slides(SlideKind::Forward)
            | AbilitySet::slides(SlideKind::Orthogonal);
        let (store, piece, enemy) = store_with(abilities);
        let mut board = Board::empty();
        board.place(Square::new(4, 4), piece.clone());
        board.place(Square::new(3, 4), enemy);

        let moves = legal_moves(&board, Square::new(4, 4), &piece, &store, false);
        let forward: Vec<_> = moves.iter().filter(|m| m.to == Square::new(3, 4)).collect();
        assert_eq!(forward, vec![&Move { to: Square::new(3, 4), capture: true }]);
        assert_eq!(moves.len(), 1 + 4 + 4 + 4);
    }

    #[test]
    fn promotion_extras_are_merged() {
        let (store, mut piece, _) = store_with(AbilitySet::steps(&[StepDir::N]));
        piece.promote(AbilitySet::steps(&[StepDir::S]) | AbilitySet::slides(SlideKind::Diagonal));
        let mut board = Board::empty();
        board.place(Square::new(4, 4), piece.clone());
        let moves = legal_moves(&board, Square::new(4, 4), &piece, &store, false);
        assert_eq!(squares(&moves), vec![(3, 4), (5, 4)]);
    }

    #[test]
    fn standard_pieces_in_the_opening() {
        let catalog = Catalog::default();
        let store = ConfigStore::from_catalog(&catalog);
        let board = Board::setup(&catalog);

        let rook_square = Square::new(7, 7);
        let rook = board.get(rook_square).unwrap();
        assert_eq!(rook.kind.as_str(), ROOK);
        // Boxed in by its own pawn, knight, FUDO and CHUNIN.
        assert!(legal_moves(&board, rook_square, rook, &store, false).is_empty());
        let coverage = legal_moves(&board, rook_square, rook, &store, true);
        assert_eq!(squares(&coverage), vec![(6, 7), (7, 6), (7, 8), (8, 7)]);

        let lance_square = Square::new(8, 0);
        let lance = board.get(lance_square).unwrap();
        assert_eq!(lance.kind.as_str(), LANCE);
        assert!(legal_moves(&board, lance_square, lance, &store, false).is_empty());

        let pawn_square = Square::new(6, 2);
        let pawn = board.get(pawn_square).unwrap();
        let moves = legal_moves(&board, pawn_square, pawn, &store, false);
        assert_eq!(squares(&moves), vec![(5, 2)]);
    }

    quickcheck! {
        fn generation_is_deterministic(abilities: AbilitySet, row: u8, col: u8) -> bool {
            let (store, piece, enemy) = store_with(abilities);
            let mut board = Board::setup(&Catalog::default());
            let origin = Square::new(3 + row % 3, col % 9);
            board.place(origin, piece.clone());
            board.place(Square::new(4, (col % 9 + 3) % 9), enemy);
            let first = legal_moves(&board, origin, &piece, &store, false);
            let second = legal_moves(&board, origin, &piece, &store, false);
            first == second
        }

        fn never_lands_on_own_pieces(abilities: AbilitySet, row: u8, col: u8) -> bool {
            let (store, piece, _) = store_with(abilities);
            let mut board = Board::setup(&Catalog::default());
            let origin = Square::new(3 + row % 3, col % 9);
            board.place(origin, piece.clone());
            legal_moves(&board, origin, &piece, &store, false)
                .iter()
                .all(|m| match board.get(m.to) {
                    None => !m.capture,
                    Some(other) => other.owner == Player::Two && m.capture,
                })
        }
    }
}
