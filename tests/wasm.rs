#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn new_game_returns_a_state_and_round_trips_a_snapshot() {
    assert!(draughts::wasm_ready());

    let state = draughts::api::new_game("EASY").expect("fresh session");
    assert!(!state.is_null());

    let text = draughts::api::save_snapshot().expect("live session serializes");
    let restored = draughts::api::load_snapshot(&text).expect("own snapshot parses");
    assert!(!restored.is_null());

    assert!(draughts::api::new_game("BRUTAL").is_err());
}
