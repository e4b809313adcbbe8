use crate::ai::Difficulty;
use crate::board::{BOARD_SIZE, Board};
use crate::game::GameSession;
use crate::piece::{Piece, PieceColor, PieceKind};
use crate::types::Position;

/// Serializes a live session into the line-oriented snapshot format:
/// 8 rows of 8 cell characters, then the side to move, the player and AI
/// capture counters, and the difficulty name. Where the snapshot ends up
/// (file, localStorage) is the frontend's business.
pub fn write_snapshot(session: &GameSession) -> Result<String, String> {
    if session.is_game_over() {
        return Err("a finished session is never persisted".to_string());
    }

    let mut out = String::new();
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            out.push(cell_char(
                session.board().piece(Position::new(row as u8, col as u8)),
            ));
        }
        out.push('\n');
    }
    out.push_str(session.current_player().name());
    out.push('\n');
    out.push_str(&session.player_captures().to_string());
    out.push('\n');
    out.push_str(&session.ai_captures().to_string());
    out.push('\n');
    out.push_str(session.difficulty().name());
    out.push('\n');

    Ok(out)
}

/// Rebuilds a session from snapshot text. Any malformed line (wrong
/// length, unrecognized character, unparsable counter, unrecognized enum
/// name, missing line) fails the whole load; there is no partial
/// reconstruction.
pub fn parse_snapshot(text: &str) -> Result<GameSession, String> {
    let mut lines = text.lines();

    let mut board = Board::empty();
    for row in 0..BOARD_SIZE {
        let line = lines
            .next()
            .ok_or_else(|| format!("snapshot truncated at board row {row}"))?;
        if line.chars().count() != BOARD_SIZE {
            return Err(format!("invalid board row length at row {row}: {line:?}"));
        }
        for (col, c) in line.chars().enumerate() {
            let cell = match c {
                ' ' => None,
                'w' => Some(Piece::checker(PieceColor::White)),
                'W' => Some(Piece::king(PieceColor::White)),
                'b' => Some(Piece::checker(PieceColor::Black)),
                'B' => Some(Piece::king(PieceColor::Black)),
                other => {
                    return Err(format!("invalid piece character {other:?} at row {row}"));
                }
            };
            board.set_piece(Position::new(row as u8, col as u8), cell);
        }
    }

    let current_player = next_line(&mut lines, "side to move").and_then(|line| {
        PieceColor::from_name(line.trim())
            .ok_or_else(|| format!("unrecognized color name: {:?}", line.trim()))
    })?;
    let player_captures = parse_count(&mut lines, "player capture count")?;
    let ai_captures = parse_count(&mut lines, "ai capture count")?;
    let difficulty = next_line(&mut lines, "difficulty").and_then(|line| {
        Difficulty::from_name(line.trim())
            .ok_or_else(|| format!("unrecognized difficulty name: {:?}", line.trim()))
    })?;

    Ok(GameSession::resume(
        board,
        current_player,
        difficulty,
        player_captures,
        ai_captures,
    ))
}

fn cell_char(cell: Option<Piece>) -> char {
    match cell {
        None => ' ',
        Some(piece) => match (piece.color, piece.kind) {
            (PieceColor::White, PieceKind::Checker) => 'w',
            (PieceColor::White, PieceKind::King) => 'W',
            (PieceColor::Black, PieceKind::Checker) => 'b',
            (PieceColor::Black, PieceKind::King) => 'B',
        },
    }
}

fn next_line<'a>(lines: &mut std::str::Lines<'a>, what: &str) -> Result<&'a str, String> {
    lines
        .next()
        .ok_or_else(|| format!("snapshot truncated before the {what} line"))
}

fn parse_count(lines: &mut std::str::Lines<'_>, what: &str) -> Result<u32, String> {
    let line = next_line(lines, what)?;
    line.trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid {what}: {:?}", line.trim()))
}
