use serde::Serialize;

const BOARD_SIZE: i32 = 8;

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE as u8 && col < BOARD_SIZE as u8);
        Self { row, col }
    }

    /// Offsets by `(dr, dc)`, or `None` when that leaves the board.
    pub fn offset(self, dr: i32, dc: i32) -> Option<Position> {
        let row = self.row as i32 + dr;
        let col = self.col as i32 + dc;
        if (0..BOARD_SIZE).contains(&row) && (0..BOARD_SIZE).contains(&col) {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }
}

/// Public session state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// Contract: 64 row-major cells,
    /// 0=empty, 1=white checker, 2=white king, 3=black checker, 4=black king.
    pub board: Vec<u8>,
    /// Contract: 1=white (human), 2=black (AI).
    pub current_player: u8,
    pub player_captures: u32,
    pub ai_captures: u32,
    pub is_game_over: bool,
    /// Contract:
    /// - 0 while the session is live.
    /// - 1=white, 2=black once `is_game_over` is set.
    pub winner: u8,
    /// Difficulty wire name (`EASY`/`MEDIUM`/`HARD`).
    pub difficulty: String,
}

/// Structured result handed to the frontend's stats store after game over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResult {
    pub won: bool,
    pub difficulty: String,
}
