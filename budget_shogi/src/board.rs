use serde::{Deserialize, Serialize};

use crate::{Catalog, KindId, PieceInstance, Player, BISHOP, GOLD, KING, KNIGHT, LANCE, PAWN, ROOK, SILVER};

pub const BOARD_SIZE: u8 = 9;

/// A cell of the board. Row 0 is player 2's home rank, row 8 player 1's.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// The square at the given offset, if it is on the board.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Square> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        let square = Square { row, col };
        square.is_on_board().then_some(square)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Standard shogi starting squares, as `(rank, file)` seen from the owner's
/// side of the board.
fn standard_slots(kind: &str) -> &'static [(u8, u8)] {
    match kind {
        LANCE => &[(0, 0), (0, 8)],
        KNIGHT => &[(0, 1), (0, 7)],
        SILVER => &[(0, 2), (0, 6)],
        GOLD => &[(0, 3), (0, 5)],
        KING => &[(0, 4)],
        ROOK => &[(1, 7)],
        BISHOP => &[(1, 1)],
        PAWN => &[
            (2, 0),
            (2, 1),
            (2, 2),
            (2, 3),
            (2, 4),
            (2, 5),
            (2, 6),
            (2, 7),
            (2, 8),
        ],
        _ => &[],
    }
}

// Where instances without a standard slot go: the second rank first, then
// the first and third, each filled from the edges towards the middle.
const FILL_RANKS: [u8; 3] = [1, 0, 2];
const FILL_FILES: [u8; 9] = [0, 8, 1, 7, 2, 6, 3, 5, 4];

/// The 9×9 grid of piece instances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Board {
    cells: [[Option<PieceInstance>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: std::array::from_fn(|_| std::array::from_fn(|_| None)),
        }
    }

    /// The starting position for the given roster.
    ///
    /// Every instance of every kind is placed, numbered per kind and per side
    /// in placement order. Known kinds use their shogi squares, everything
    /// else fills the free squares of the owner's three home ranks.
    pub fn setup(catalog: &Catalog) -> Self {
        let mut board = Self::empty();
        for player in Player::BOTH {
            let mut overflow: Vec<(&KindId, usize)> = Vec::new();
            for kind in catalog {
                let slots = standard_slots(kind.id.as_str());
                for index in 0..kind.count as usize {
                    match slots.get(index) {
                        Some(&(rank, file)) => {
                            let square = player.square_from_home(rank, file);
                            board.place(square, PieceInstance::new(kind.id.clone(), player, index));
                        }
                        None => overflow.push((&kind.id, index)),
                    }
                }
            }

            let free_squares: Vec<Square> = FILL_RANKS
                .iter()
                .flat_map(|&rank| FILL_FILES.iter().map(move |&file| (rank, file)))
                .map(|(rank, file)| player.square_from_home(rank, file))
                .filter(|&square| board.get(square).is_none())
                .collect();
            // The catalog guarantees that all instances fit.
            debug_assert!(overflow.len() <= free_squares.len());
            for ((kind, index), square) in overflow.into_iter().zip(free_squares) {
                board.place(square, PieceInstance::new(kind.clone(), player, index));
            }
        }
        board
    }

    pub fn get(&self, square: Square) -> Option<&PieceInstance> {
        self.cells
            .get(square.row as usize)?
            .get(square.col as usize)?
            .as_ref()
    }

    pub(crate) fn get_mut(&mut self, square: Square) -> Option<&mut PieceInstance> {
        self.cells
            .get_mut(square.row as usize)?
            .get_mut(square.col as usize)?
            .as_mut()
    }

    pub fn is_empty_at(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    /// Puts a piece on a square, returning whatever was there before.
    ///
    /// Panics if the square is off the board.
    pub fn place(&mut self, square: Square, piece: PieceInstance) -> Option<PieceInstance> {
        self.cells[square.row as usize][square.col as usize].replace(piece)
    }

    /// Removes and returns the piece on a square.
    pub fn take(&mut self, square: Square) -> Option<PieceInstance> {
        self.cells
            .get_mut(square.row as usize)?
            .get_mut(square.col as usize)?
            .take()
    }

    /// All pieces with their squares, in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, &PieceInstance)> {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, cell)| {
                cell.as_ref()
                    .map(|piece| (Square::new(row as u8, col as u8), piece))
            })
        })
    }

    pub fn len(&self) -> usize {
        self.pieces().count()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces().next().is_none()
    }
}
