use crate::ai::{Difficulty, MoveStrategy};
use crate::board::Board;
use crate::piece::{Move, PieceColor};

const SEARCH_DEPTH: u8 = 4;

/// Hard: fixed-depth minimax over board value copies.
///
/// Maximizes for the AI color on its own layers and minimizes on the
/// opponent's. Every branch works on a copy, so the search never touches
/// the board it was handed.
#[derive(Debug, Clone, Copy)]
pub struct MinimaxStrategy {
    depth: u8,
}

impl MinimaxStrategy {
    pub fn new() -> Self {
        Self::with_depth(SEARCH_DEPTH)
    }

    pub fn with_depth(depth: u8) -> Self {
        Self { depth }
    }
}

impl Default for MinimaxStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveStrategy for MinimaxStrategy {
    fn choose_move(&self, board: &Board, color: PieceColor) -> Option<Move> {
        let mut best: Option<Move> = None;
        let mut best_value = i32::MIN;

        for mv in board.legal_moves_for_side(color) {
            let mut next = *board;
            apply_move(&mut next, mv);
            let value = minimax(&next, self.depth.saturating_sub(1), false, color);
            // Strictly-greater keeps the first best move in generation
            // order.
            if value > best_value {
                best_value = value;
                best = Some(mv);
            }
        }

        best
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::Hard
    }
}

/// A branch is terminal when the depth is spent or either side is out of
/// legal moves; both cases are valued by the material count for the AI
/// color at the position reached so far.
fn minimax(board: &Board, depth: u8, maximizing: bool, ai_color: PieceColor) -> i32 {
    if depth == 0
        || board.legal_moves_for_side(ai_color).is_empty()
        || board.legal_moves_for_side(ai_color.opposite()).is_empty()
    {
        return board.evaluate(ai_color);
    }

    let mover = if maximizing { ai_color } else { ai_color.opposite() };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    for mv in board.legal_moves_for_side(mover) {
        let mut next = *board;
        apply_move(&mut next, mv);
        let value = minimax(&next, depth - 1, !maximizing, ai_color);
        best = if maximizing {
            best.max(value)
        } else {
            best.min(value)
        };
    }

    best
}

/// Applies one move to a search board. A capture chain is auto-continued
/// with the first continuation in generation order; alternative
/// continuations are not explored as separate branches.
fn apply_move(board: &mut Board, mv: Move) {
    board.move_piece(mv.from, mv.to);

    if let Some(captured) = mv.captured {
        board.remove_piece(captured);
        if let Some(piece) = board.piece(mv.to) {
            let continuation = piece
                .legal_moves(board, mv.to)
                .into_iter()
                .find(|m| m.is_capture());
            if let Some(next) = continuation {
                apply_move(board, next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Piece;
    use crate::types::Position;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn t10_prefers_capturing_the_king_over_the_checker() {
        let mut board = Board::empty();
        board.set_piece(pos(2, 1), Some(Piece::checker(PieceColor::Black)));
        board.set_piece(pos(2, 5), Some(Piece::checker(PieceColor::Black)));
        board.set_piece(pos(3, 2), Some(Piece::checker(PieceColor::White)));
        board.set_piece(pos(3, 6), Some(Piece::king(PieceColor::White)));

        let mv = MinimaxStrategy::with_depth(1)
            .choose_move(&board, PieceColor::Black)
            .expect("captures available");

        // The checker capture comes first in generation order, so only a
        // strictly better value can pick the king capture.
        assert_eq!(mv, Move::jump(pos(2, 5), pos(4, 7), pos(3, 6)));
    }

    #[test]
    fn takes_the_only_capture_at_full_depth() {
        let mut board = Board::empty();
        board.set_piece(pos(2, 1), Some(Piece::checker(PieceColor::Black)));
        board.set_piece(pos(3, 2), Some(Piece::checker(PieceColor::White)));
        board.set_piece(pos(5, 6), Some(Piece::checker(PieceColor::White)));

        let mv = MinimaxStrategy::new()
            .choose_move(&board, PieceColor::Black)
            .expect("forced capture");

        assert_eq!(mv, Move::jump(pos(2, 1), pos(4, 3), pos(3, 2)));
    }

    #[test]
    fn avoids_stepping_into_an_immediate_recapture() {
        let mut board = Board::empty();
        // Black at (2,3) can step to (3,2), (3,4). Stepping to (3,4)
        // feeds the white checker at (4,5); (3,2) is safe.
        board.set_piece(pos(2, 3), Some(Piece::checker(PieceColor::Black)));
        board.set_piece(pos(4, 5), Some(Piece::checker(PieceColor::White)));
        board.set_piece(pos(0, 1), Some(Piece::checker(PieceColor::Black)));

        let mv = MinimaxStrategy::new()
            .choose_move(&board, PieceColor::Black)
            .expect("quiet moves available");

        assert_ne!(mv.to, pos(3, 4));
    }

    #[test]
    fn returns_none_when_the_side_has_no_moves() {
        let mut board = Board::empty();
        board.set_piece(pos(4, 3), Some(Piece::checker(PieceColor::White)));

        assert_eq!(
            MinimaxStrategy::new().choose_move(&board, PieceColor::Black),
            None
        );
    }

    #[test]
    fn apply_move_auto_continues_the_capture_chain() {
        let mut board = Board::empty();
        board.set_piece(pos(2, 1), Some(Piece::checker(PieceColor::Black)));
        board.set_piece(pos(3, 2), Some(Piece::checker(PieceColor::White)));
        board.set_piece(pos(5, 2), Some(Piece::checker(PieceColor::White)));

        apply_move(&mut board, Move::jump(pos(2, 1), pos(4, 3), pos(3, 2)));

        assert_eq!(board.piece(pos(3, 2)), None);
        assert_eq!(board.piece(pos(5, 2)), None);
        assert_eq!(
            board.piece(pos(6, 1)),
            Some(Piece::checker(PieceColor::Black))
        );
    }

    #[test]
    fn apply_move_promotes_at_the_end_of_a_jump() {
        let mut board = Board::empty();
        board.set_piece(pos(5, 2), Some(Piece::checker(PieceColor::Black)));
        board.set_piece(pos(6, 3), Some(Piece::checker(PieceColor::White)));

        apply_move(&mut board, Move::jump(pos(5, 2), pos(7, 4), pos(6, 3)));

        assert_eq!(board.piece(pos(7, 4)), Some(Piece::king(PieceColor::Black)));
    }
}
