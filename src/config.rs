//! Tunable game constants. Everything has a default; a JSON object passed to
//! `start_game` may override any subset of fields.

use serde::Deserialize;
use serde::de::Error as _;

use crate::assets::AssetError;

/// Upper bound for any pixel quantity (sizes, speed, joystick travel).
const MAX_PIXELS: f64 = 10_000.0;
const MAX_DECOR_SIZE: u32 = 4096;
const MAX_TALL_SCALE: u32 = 16;
/// One hour.
const MAX_RESPAWN_MS: f64 = 3_600_000.0;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side of the square player sprite, px.
    pub dino_size: f64,
    /// Movement per frame at full input, px.
    pub speed: f64,
    pub collectible_size: f64,
    /// Side of a small decor glyph, px. Tall glyphs are `tall_scale` times this.
    pub decor_base_size: u32,
    pub tall_scale: u32,
    /// Fraction of the viewport height reserved for the header.
    pub header_fraction: f64,
    /// Joystick centre in joystick-local px.
    pub joystick_center: (f64, f64),
    /// Handle travel that maps to full deflection.
    pub joystick_max_distance: f64,
    pub respawn_min_ms: f64,
    pub respawn_max_ms: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dino_size: 100.0,
            speed: 7.0,
            collectible_size: 70.0,
            decor_base_size: 50,
            tall_scale: 3,
            header_fraction: 0.2,
            joystick_center: (100.0, 100.0),
            joystick_max_distance: 80.0,
            respawn_min_ms: 1000.0,
            respawn_max_ms: 2000.0,
        }
    }
}

impl GameConfig {
    /// Parse a JSON object of overrides. Arrays and scalars are rejected: the
    /// derive would otherwise read an array positionally.
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(AssetError::Config)?;
        if !value.is_object() {
            return Err(AssetError::Config(serde_json::Error::custom(
                "config must be a JSON object",
            )));
        }
        let config: GameConfig = serde_json::from_value(value).map_err(AssetError::Config)?;
        Ok(config.sanitized())
    }

    // Keep every value finite and inside a range the game can work with.
    fn sanitized(self) -> Self {
        let d = GameConfig::default();
        let respawn_min_ms = finite_or(self.respawn_min_ms, d.respawn_min_ms).clamp(0.0, MAX_RESPAWN_MS);
        let mut respawn_max_ms =
            finite_or(self.respawn_max_ms, d.respawn_max_ms).clamp(0.0, MAX_RESPAWN_MS + 1.0);
        // min is bounded, so min + 1.0 is always strictly greater.
        if respawn_max_ms <= respawn_min_ms {
            respawn_max_ms = respawn_min_ms + 1.0;
        }
        Self {
            dino_size: finite_or(self.dino_size, d.dino_size).clamp(1.0, MAX_PIXELS),
            speed: finite_or(self.speed, d.speed).clamp(0.0, MAX_PIXELS),
            collectible_size: finite_or(self.collectible_size, d.collectible_size).clamp(1.0, MAX_PIXELS),
            decor_base_size: self.decor_base_size.clamp(1, MAX_DECOR_SIZE),
            tall_scale: self.tall_scale.clamp(1, MAX_TALL_SCALE),
            header_fraction: finite_or(self.header_fraction, d.header_fraction).clamp(0.0, 0.9),
            joystick_center: (
                finite_or(self.joystick_center.0, d.joystick_center.0).clamp(-MAX_PIXELS, MAX_PIXELS),
                finite_or(self.joystick_center.1, d.joystick_center.1).clamp(-MAX_PIXELS, MAX_PIXELS),
            ),
            joystick_max_distance: finite_or(self.joystick_max_distance, d.joystick_max_distance)
                .clamp(1.0, MAX_PIXELS),
            respawn_min_ms,
            respawn_max_ms,
        }
    }
}

fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}
