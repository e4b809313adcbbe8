//! WASM boundary: one logical session behind a single lock.
//!
//! Every export acquires the session mutex around the whole
//! validate + apply + chain + game-over sequence, so a human move and an
//! AI reply posted back by the frontend can never interleave on the same
//! board. Move selection itself works on board value copies and needs no
//! extra synchronization.

use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use wasm_bindgen::prelude::*;

use crate::ai::Difficulty;
use crate::board::BOARD_SIZE;
use crate::game::GameSession;
use crate::save;
use crate::types::Position;

static SESSION: Lazy<Mutex<Option<GameSession>>> = Lazy::new(|| Mutex::new(None));

/// One-time wasm-side setup: panic messages and log output go to the
/// browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }
}

/// Starts a fresh session, replacing any existing one.
#[wasm_bindgen]
pub fn new_game(difficulty: &str) -> Result<JsValue, JsValue> {
    let difficulty = Difficulty::from_name(difficulty)
        .ok_or_else(|| JsValue::from_str("unrecognized difficulty name"))?;

    let mut guard = lock_session()?;
    let session = GameSession::new(difficulty);
    let state = session.to_game_state();
    *guard = Some(session);
    to_js(&state)
}

/// Destination highlights for a clicked square.
#[wasm_bindgen]
pub fn handle_square_click(row: u8, col: u8) -> Result<JsValue, JsValue> {
    let pos = position(row, col)?;
    let guard = lock_session()?;
    let session = live_session(&guard)?;
    to_js(&session.square_highlights(pos))
}

/// Validates and applies one human move, returning the resulting state.
/// Rejected moves come back as errors and leave the session untouched.
#[wasm_bindgen]
pub fn handle_move(
    from_row: u8,
    from_col: u8,
    to_row: u8,
    to_col: u8,
) -> Result<JsValue, JsValue> {
    let from = position(from_row, from_col)?;
    let to = position(to_row, to_col)?;

    let mut guard = lock_session()?;
    let session = live_session_mut(&mut guard)?;
    session.handle_move(from, to).map_err(js_error)?;
    to_js(&session.to_game_state())
}

/// Selects and applies the AI reply. The frontend calls this after its
/// "thinking" delay; the delay itself carries no game meaning.
#[wasm_bindgen]
pub fn apply_ai_move() -> Result<JsValue, JsValue> {
    let mut guard = lock_session()?;
    let session = live_session_mut(&mut guard)?;
    session.do_ai_move().map_err(js_error)?;
    to_js(&session.to_game_state())
}

#[wasm_bindgen]
pub fn game_state() -> Result<JsValue, JsValue> {
    let guard = lock_session()?;
    let session = live_session(&guard)?;
    to_js(&session.to_game_state())
}

/// The structured `{won, difficulty}` record for the stats store, or
/// `null` while the session is still live.
#[wasm_bindgen]
pub fn session_result() -> Result<JsValue, JsValue> {
    let guard = lock_session()?;
    let session = live_session(&guard)?;
    match session.to_session_result() {
        Some(result) => to_js(&result),
        None => Ok(JsValue::NULL),
    }
}

/// Serializes the live session to snapshot text. Finished sessions are
/// never persisted.
#[wasm_bindgen]
pub fn save_snapshot() -> Result<String, JsValue> {
    let guard = lock_session()?;
    let session = live_session(&guard)?;
    save::write_snapshot(session).map_err(js_error)
}

/// Restores a session from snapshot text. A malformed snapshot is a clean
/// failure: the current session (if any) is kept and the frontend falls
/// back to starting fresh.
#[wasm_bindgen]
pub fn load_snapshot(text: &str) -> Result<JsValue, JsValue> {
    let session = save::parse_snapshot(text).map_err(js_error)?;
    let state = session.to_game_state();

    let mut guard = lock_session()?;
    *guard = Some(session);
    to_js(&state)
}

/// Drops the session. The only transition out of a finished game.
#[wasm_bindgen]
pub fn clear_session() -> Result<(), JsValue> {
    let mut guard = lock_session()?;
    *guard = None;
    Ok(())
}

fn lock_session() -> Result<MutexGuard<'static, Option<GameSession>>, JsValue> {
    SESSION
        .lock()
        .map_err(|_| JsValue::from_str("session lock poisoned"))
}

fn live_session<'a>(
    guard: &'a MutexGuard<'static, Option<GameSession>>,
) -> Result<&'a GameSession, JsValue> {
    guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("no active session"))
}

fn live_session_mut<'a>(
    guard: &'a mut MutexGuard<'static, Option<GameSession>>,
) -> Result<&'a mut GameSession, JsValue> {
    guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("no active session"))
}

fn position(row: u8, col: u8) -> Result<Position, JsValue> {
    if row >= BOARD_SIZE as u8 || col >= BOARD_SIZE as u8 {
        return Err(JsValue::from_str("row/col out of range"));
    }
    Ok(Position::new(row, col))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}
