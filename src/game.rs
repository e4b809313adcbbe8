use log::{debug, info, warn};
use web_time::Instant;

use crate::ai::{self, Difficulty, MoveStrategy};
use crate::board::Board;
use crate::piece::{Move, PieceColor};
use crate::types::{GameState, Position, SessionResult};

pub const PLAYER_WHITE: u8 = 1;
pub const PLAYER_BLACK: u8 = 2;

/// One game session: board, turn state machine and the AI opponent.
///
/// White is the human side, Black the AI side. The current player
/// alternates strictly, except that a capture whose landing piece can
/// capture again holds the turn until the chain is dry.
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    current_player: PieceColor,
    difficulty: Difficulty,
    game_over: bool,
    winner: Option<PieceColor>,
    player_captures: u32,
    ai_captures: u32,
    /// Origin of a pending multi-capture chain on the human side. While
    /// set, the next interaction is restricted to this piece's
    /// continuation captures.
    chain: Option<Position>,
    strategy: Box<dyn MoveStrategy>,
}

impl GameSession {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_strategy(difficulty, ai::create(difficulty))
    }

    pub fn with_strategy(difficulty: Difficulty, strategy: Box<dyn MoveStrategy>) -> Self {
        Self {
            board: Board::new(),
            current_player: PieceColor::White,
            difficulty,
            game_over: false,
            winner: None,
            player_captures: 0,
            ai_captures: 0,
            chain: None,
            strategy,
        }
    }

    /// Rebuilds a session from snapshot fields. The strategy is re-derived
    /// from the difficulty tag; a pending chain is not part of a snapshot.
    pub fn resume(
        board: Board,
        current_player: PieceColor,
        difficulty: Difficulty,
        player_captures: u32,
        ai_captures: u32,
    ) -> Self {
        Self {
            board,
            current_player,
            difficulty,
            game_over: false,
            winner: None,
            player_captures,
            ai_captures,
            chain: None,
            strategy: ai::create(difficulty),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> PieceColor {
        self.current_player
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<PieceColor> {
        self.winner
    }

    pub fn player_captures(&self) -> u32 {
        self.player_captures
    }

    pub fn ai_captures(&self) -> u32 {
        self.ai_captures
    }

    fn is_human_turn(&self) -> bool {
        !self.game_over && self.current_player == PieceColor::White
    }

    /// Destination highlights for the square the player clicked: the
    /// clicked piece's own moves, narrowed to continuation captures while
    /// a chain is pending. Pure query.
    pub fn square_highlights(&self, pos: Position) -> Vec<Position> {
        if !self.is_human_turn() {
            return Vec::new();
        }
        if let Some(origin) = self.chain {
            if pos != origin {
                return Vec::new();
            }
            return self
                .continuation_captures(origin)
                .iter()
                .map(|m| m.to)
                .collect();
        }
        match self.board.piece(pos) {
            Some(piece) if piece.color == self.current_player => piece
                .legal_moves(&self.board, pos)
                .iter()
                .map(|m| m.to)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Validates and executes one human move.
    ///
    /// Rejections never mutate the session; they come back as errors for
    /// the frontend to surface.
    pub fn handle_move(&mut self, from: Position, to: Position) -> Result<(), String> {
        if self.game_over {
            return Err("game is already over".to_string());
        }
        if self.current_player != PieceColor::White {
            return Err("it is not the player's turn".to_string());
        }
        if let Some(origin) = self.chain
            && from != origin
        {
            warn!(
                "move from ({}, {}) rejected: capture chain pins the piece at ({}, {})",
                from.row, from.col, origin.row, origin.col
            );
            return Err("a capture chain is in progress for another piece".to_string());
        }

        let mv = self.find_move(from, to)?;
        if self.chain.is_some() && !mv.is_capture() {
            return Err("only continuation captures are allowed".to_string());
        }

        info!(
            "player moves ({}, {}) -> ({}, {})",
            from.row, from.col, to.row, to.col
        );
        self.execute_move(mv);
        Ok(())
    }

    fn find_move(&self, from: Position, to: Position) -> Result<Move, String> {
        let Some(piece) = self.board.piece(from) else {
            warn!("no piece at move origin ({}, {})", from.row, from.col);
            return Err("no piece at move origin".to_string());
        };
        if piece.color != self.current_player {
            warn!(
                "piece at ({}, {}) does not belong to the side to move",
                from.row, from.col
            );
            return Err("piece does not belong to the side to move".to_string());
        }
        piece
            .legal_moves(&self.board, from)
            .into_iter()
            .find(|m| m.to == to)
            .ok_or_else(|| "illegal move".to_string())
    }

    /// Selects and executes the AI reply. A strategy with no move to offer
    /// is the game-over signal for Black, not an error.
    pub fn do_ai_move(&mut self) -> Result<(), String> {
        if self.game_over {
            return Err("game is already over".to_string());
        }
        if self.current_player != PieceColor::Black {
            return Err("it is not the AI's turn".to_string());
        }

        let started = Instant::now();
        let chosen = self.strategy.choose_move(&self.board, self.current_player);
        debug!(
            "{} strategy answered in {:?}",
            self.difficulty.name(),
            started.elapsed()
        );

        let Some(mv) = chosen else {
            self.end_game(self.current_player.opposite());
            return Ok(());
        };
        if !self.board.legal_moves_for_side(self.current_player).contains(&mv) {
            return Err("ai selected an illegal move".to_string());
        }

        info!(
            "ai moves ({}, {}) -> ({}, {})",
            mv.from.row, mv.from.col, mv.to.row, mv.to.col
        );
        self.execute_move(mv);
        Ok(())
    }

    /// Applies an accepted move, then the chain rule: a capture whose
    /// landing piece can capture again holds the turn. The human's next
    /// interaction is pinned to that piece; the AI auto-continues with the
    /// first continuation. Otherwise the turn switches and the session
    /// checks for a winner.
    fn execute_move(&mut self, mv: Move) {
        self.board.move_piece(mv.from, mv.to);

        if let Some(captured) = mv.captured {
            self.board.remove_piece(captured);
            if self.current_player == PieceColor::White {
                self.player_captures += 1;
            } else {
                self.ai_captures += 1;
            }

            let continuations = self.continuation_captures(mv.to);
            if !continuations.is_empty() {
                if self.current_player == PieceColor::White {
                    self.chain = Some(mv.to);
                } else {
                    self.execute_move(continuations[0]);
                }
                return;
            }
        }

        self.chain = None;
        self.current_player = self.current_player.opposite();
        self.check_game_over();
    }

    fn continuation_captures(&self, pos: Position) -> Vec<Move> {
        match self.board.piece(pos) {
            Some(piece) => piece
                .legal_moves(&self.board, pos)
                .into_iter()
                .filter(|m| m.is_capture())
                .collect(),
            None => Vec::new(),
        }
    }

    /// A side left without a legal reply loses on the spot; covers both
    /// no-pieces and fully-blocked positions.
    fn check_game_over(&mut self) {
        if self.board.legal_moves_for_side(self.current_player).is_empty() {
            self.end_game(self.current_player.opposite());
        }
    }

    fn end_game(&mut self, winner: PieceColor) {
        self.game_over = true;
        self.winner = Some(winner);
        info!("game over, winner: {}", winner.name());
    }

    pub fn to_game_state(&self) -> GameState {
        GameState {
            board: self.board.to_cells().to_vec(),
            current_player: player_code(self.current_player),
            player_captures: self.player_captures,
            ai_captures: self.ai_captures,
            is_game_over: self.game_over,
            winner: self.winner.map(player_code).unwrap_or(0),
            difficulty: self.difficulty.name().to_string(),
        }
    }

    /// The record the frontend forwards to its stats store; `None` while
    /// the session is still live.
    pub fn to_session_result(&self) -> Option<SessionResult> {
        self.winner.map(|winner| SessionResult {
            won: winner == PieceColor::White,
            difficulty: self.difficulty.name().to_string(),
        })
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, current_player: PieceColor) {
        self.board = board;
        self.current_player = current_player;
        self.game_over = false;
        self.winner = None;
        self.chain = None;
    }
}

fn player_code(color: PieceColor) -> u8 {
    match color {
        PieceColor::White => PLAYER_WHITE,
        PieceColor::Black => PLAYER_BLACK,
    }
}
