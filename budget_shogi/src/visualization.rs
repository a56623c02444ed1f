use crate::{Board, Catalog, Hand, Match, PieceInstance, Player, Square, Staging, BOARD_SIZE};

fn glyph(catalog: &Catalog, piece: &PieceInstance) -> char {
    catalog
        .get(piece.kind.as_str())
        .and_then(|kind| kind.label.chars().next())
        .or_else(|| piece.kind.as_str().chars().next())
        .unwrap_or('?')
}

/// Draws the board with player two's home rank at the top.
///
/// Each occupied cell shows a `v` for player two's pieces, the first
/// character of the kind's label, and a `+` if the piece is promoted.
pub fn visualize_board(board: &Board, catalog: &Catalog) -> String {
    let mut result = String::from("    ");
    for col in 0..BOARD_SIZE {
        result += &format!("  {} ", col);
    }
    result += "\n   ╭";
    for _ in 0..BOARD_SIZE {
        result += "────";
    }
    result += "╮\n";
    for row in 0..BOARD_SIZE {
        result += &format!("{:>2} │", row);
        for col in 0..BOARD_SIZE {
            match board.get(Square::new(row, col)) {
                Some(piece) => {
                    let owner = if piece.owner == Player::Two { 'v' } else { ' ' };
                    let promoted = if piece.is_promoted() { '+' } else { ' ' };
                    result += &format!("{}{}{}", owner, glyph(catalog, piece), promoted);
                }
                None => result += " ・ ",
            }
        }
        result += "│\n";
    }
    result += "   ╰";
    for _ in 0..BOARD_SIZE {
        result += "────";
    }
    result += "╯";
    result
}

/// One line listing the non-empty stacks of a hand, e.g. `歩×2 銀×1`.
pub fn visualize_hand(hand: &Hand, catalog: &Catalog) -> String {
    let stacks: Vec<String> = hand
        .stacks()
        .filter(|(_, stack)| !stack.is_empty())
        .map(|(kind, stack)| {
            let label = catalog.get(kind.as_str()).map_or(kind.as_str(), |k| k.label.as_str());
            format!("{}×{}", label, stack.len())
        })
        .collect();
    if stacks.is_empty() {
        String::from("-")
    } else {
        stacks.join(" ")
    }
}

/// The board framed by both hands, followed by whose turn it is.
pub fn visualize_match(position: &Match) -> String {
    let catalog = position.catalog();
    let mut result = format!(
        "{} in hand: {}\n",
        Player::Two,
        visualize_hand(position.hand(Player::Two), catalog)
    );
    result += &visualize_board(position.board(), catalog);
    result += &format!(
        "\n{} in hand: {}\n",
        Player::One,
        visualize_hand(position.hand(Player::One), catalog)
    );
    match (position.winner(), position.staging()) {
        (Some(winner), _) => result += &format!("{} has won", winner),
        (None, Staging::PromotionOffered { offer }) => {
            let label = position
                .board()
                .get(offer.square)
                .map_or_else(String::new, |piece| catalog.label_for(piece));
            result += &format!(
                "{} to move, {} at {} may promote",
                position.turn(),
                label,
                offer.square
            )
        }
        (None, _) => result += &format!("{} to move", position.turn()),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigStore, KindId, PAWN};

    #[test]
    fn draws_the_opening() {
        let catalog = Catalog::default();
        let board = Board::setup(&catalog);
        let drawing = visualize_board(&board, &catalog);
        let lines: Vec<&str> = drawing.lines().collect();
        assert_eq!(lines.len(), 1 + 1 + 9 + 1);
        assert!(lines[2].starts_with(" 0 │v香 v桂 v銀 v金 v王 "));
        assert!(lines[10].starts_with(" 8 │ 香  桂  銀  金  王 "));
        assert_eq!(lines[6].matches('・').count(), 9);
    }

    #[test]
    fn marks_promotions_and_hands() {
        let catalog = Catalog::default();
        let mut board = Board::empty();
        let mut pawn = PieceInstance::new(KindId::from(PAWN), Player::Two, 0);
        pawn.promote(Default::default());
        board.place(Square::new(4, 4), pawn);
        let drawing = visualize_board(&board, &catalog);
        assert!(drawing.contains("v歩+"));

        let mut hand = Hand::new(&catalog);
        assert_eq!(visualize_hand(&hand, &catalog), "-");
        hand.push(PieceInstance::new(KindId::from(PAWN), Player::Two, 1).captured_by(Player::One));
        hand.push(PieceInstance::new(KindId::from(PAWN), Player::Two, 2).captured_by(Player::One));
        assert_eq!(visualize_hand(&hand, &catalog), "歩×2");
    }

    #[test]
    fn reports_the_turn() {
        let catalog = Catalog::default();
        let store = ConfigStore::from_catalog(&catalog);
        let position = Match::new(&catalog, [store.clone(), store]);
        let drawing = visualize_match(&position);
        assert!(drawing.ends_with("player 1 to move"));
        assert!(drawing.starts_with("player 2 in hand: -"));
    }
}
