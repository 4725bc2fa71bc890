//! Dino Morph core crate.
//!
//! A dino roams the arena, grabs the star and turns into another land or sea
//! creature, with matching background and freshly scattered decor. Game logic
//! (decor layout, input fusion, movement, scoring) is plain Rust and testable
//! natively; `game::stage` binds it to the page.

use wasm_bindgen::prelude::*;

pub mod assets;
pub mod config;
pub mod decor;
pub mod game;
pub mod input;

pub use assets::{AssetError, Creature, CreatureRoster};
pub use config::GameConfig;
pub use decor::{DecorBuffer, DecorGenerator, DecorSet, HabitatCategory};
pub use game::GameState;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// Entrypoints called from the page
// -----------------------------------------------------------------------------

/// Start the game. `config_json` may override any [`GameConfig`] field.
#[wasm_bindgen]
pub fn start_game(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(json) => GameConfig::from_json(json)?,
        None => GameConfig::default(),
    };
    game::stage::start(config)
}

/// Hand over the text of `decor.json`. May be called before or after `start_game`.
#[wasm_bindgen]
pub fn load_decor_catalog(json: &str) -> Result<(), JsValue> {
    game::stage::load_decor_catalog(json)
}

/// Hand over the text of `protagonist.json`. May be called before or after `start_game`.
#[wasm_bindgen]
pub fn load_creature_roster(json: &str) -> Result<(), JsValue> {
    game::stage::load_creature_roster(json)
}
