//! Game state and the per-frame update.
//!
//! [`GameState`] owns everything that changes while playing: player position,
//! score, current creature + habitat, the collectible, the decor preload buffer
//! and the RNG. It never touches the DOM; [`stage`] drives it once per animation
//! frame and applies the returned [`TickOutcome`] to the page.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::assets::{Assets, Creature, CreatureRoster};
use crate::config::GameConfig;
use crate::decor::{Arena, DecorBuffer, DecorCatalog, DecorGenerator, DecorSet, HabitatCategory};
use crate::input::InputState;

pub mod stage;

pub const COLLECTIBLE_GLYPH: &str = "⭐";

pub const LAND_BACKGROUNDS: [&str; 4] = ["#556B2F", "#2E8B57", "#006400", "#013220"];
pub const SEA_BACKGROUNDS: [&str; 4] = ["#5D7A81", "#65828A", "#6B8C96", "#7093A1"];

pub fn backgrounds(category: HabitatCategory) -> &'static [&'static str] {
    match category {
        HabitatCategory::Land => &LAND_BACKGROUNDS,
        HabitatCategory::Sea => &SEA_BACKGROUNDS,
    }
}

/// Horizontal orientation of the player sprite. Emoji animals face left as
/// drawn, so walking right needs a mirror.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    #[default]
    Natural,
    Mirrored,
}

impl Facing {
    pub fn scale_x(self) -> f64 {
        match self {
            Facing::Natural => 1.0,
            Facing::Mirrored => -1.0,
        }
    }
}

/// The star. Hidden between being collected and respawning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collectible {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub visible: bool,
}

/// Everything the page needs to show a new creature.
#[derive(Clone, Debug, PartialEq)]
pub struct Morph {
    pub creature: Creature,
    pub category: HabitatCategory,
    pub background: &'static str,
    pub decor: DecorSet,
}

/// Result of picking up the star.
#[derive(Clone, Debug, PartialEq)]
pub struct Collection {
    pub score: u32,
    /// `None` when the roster (or the randomly chosen half of it) is empty.
    pub morph: Option<Morph>,
    pub respawn_after_ms: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickOutcome {
    pub moving: bool,
    /// Leg wiggle: only land creatures walk.
    pub legs_animated: bool,
    pub collection: Option<Collection>,
}

pub struct GameState {
    config: GameConfig,
    arena: Arena,
    x: f64,
    y: f64,
    facing: Facing,
    score: u32,
    category: HabitatCategory,
    creature: Creature,
    collectible: Collectible,
    decor: DecorBuffer,
    assets: Assets,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: GameConfig, arena: Arena) -> Self {
        Self::with_rng(config, arena, StdRng::from_entropy())
    }

    pub fn with_rng(config: GameConfig, arena: Arena, rng: StdRng) -> Self {
        let collectible = Collectible { x: 0.0, y: 0.0, size: config.collectible_size, visible: false };
        let mut state = Self {
            config,
            arena,
            x: 0.0,
            y: 0.0,
            facing: Facing::default(),
            score: 0,
            category: HabitatCategory::Land,
            creature: Creature::starter(),
            collectible,
            decor: DecorBuffer::new(),
            assets: Assets::new(),
            rng,
        };
        state.recenter();
        state
    }

    // --- Accessors -----------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn category(&self) -> HabitatCategory {
        self.category
    }

    pub fn creature(&self) -> &Creature {
        &self.creature
    }

    pub fn collectible(&self) -> &Collectible {
        &self.collectible
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn decor_buffer(&self) -> &DecorBuffer {
        &self.decor
    }

    pub fn decor_generator(&self) -> DecorGenerator {
        DecorGenerator::new(self.arena, self.config.decor_base_size, self.config.tall_scale)
    }

    // --- Assets --------------------------------------------------------------

    pub fn load_decor(&mut self, catalog: DecorCatalog) {
        self.assets.set_decor(catalog);
        // Anything preloaded so far was built without (or with an older) catalog.
        self.decor.clear();
    }

    /// Store the roster and roll a fresh land background for the starter.
    pub fn load_roster(&mut self, roster: CreatureRoster) -> &'static str {
        log::info!(
            "roster loaded: {} land / {} sea creatures",
            roster.land_animals.len(),
            roster.sea_animals.len()
        );
        self.assets.set_roster(roster);
        self.pick_background(HabitatCategory::Land)
    }

    // --- Layout --------------------------------------------------------------

    /// Put the player back in the middle of the arena.
    pub fn recenter(&mut self) {
        self.x = (self.arena.width as f64 - self.config.dino_size) / 2.0;
        self.y = (self.arena.height as f64 - self.config.dino_size) / 2.0;
    }

    pub fn resize(&mut self, arena: Arena) {
        if arena != self.arena {
            // The preload was laid out for the old bounds.
            self.decor.clear();
        }
        self.arena = arena;
        self.recenter();
    }

    /// Decor to draw now for the current habitat; preloads the next layout.
    pub fn render_decor(&mut self) -> DecorSet {
        let generator = self.decor_generator();
        let category = self.category;
        let drawn = self
            .decor
            .ensure_ready(&generator, self.assets.decor(), category, &mut self.rng)
            .clone();
        self.decor.advance(&generator, self.assets.decor(), category, &mut self.rng);
        drawn
    }

    pub fn pick_background(&mut self, category: HabitatCategory) -> &'static str {
        backgrounds(category).choose(&mut self.rng).copied().unwrap_or("#000000")
    }

    // --- Creature ------------------------------------------------------------

    /// Become `creature`: switch habitat, background and decor.
    pub fn morph_into(&mut self, creature: Creature) -> Morph {
        let category = self.assets.category_of(&creature);
        log::info!("morphing into {} ({})", creature.emoji, category.label());
        self.category = category;
        self.creature = creature.clone();
        let background = self.pick_background(category);
        let decor = self.render_decor();
        Morph { creature, category, background, decor }
    }

    /// Coin flip between land and sea, then a random creature from that half.
    fn pick_creature(&mut self) -> Option<Creature> {
        let roster = self.assets.roster()?;
        let category = if self.rng.gen_bool(0.5) {
            HabitatCategory::Land
        } else {
            HabitatCategory::Sea
        };
        roster.creatures(category).choose(&mut self.rng).cloned()
    }

    // --- Collectible ---------------------------------------------------------

    pub fn place_collectible(&mut self, x: f64, y: f64) {
        self.collectible.x = x;
        self.collectible.y = y;
        self.collectible.visible = true;
    }

    /// Drop the star somewhere random. Safe to call repeatedly.
    pub fn spawn_collectible(&mut self) -> Collectible {
        let size = self.collectible.size;
        let x = floor_uniform(&mut self.rng, self.arena.width as f64 - size);
        let y = floor_uniform(&mut self.rng, self.arena.height as f64 - size);
        self.place_collectible(x, y);
        self.collectible
    }

    fn respawn_delay(&mut self) -> f64 {
        self.rng.gen_range(self.config.respawn_min_ms..self.config.respawn_max_ms)
    }

    // --- Tick ----------------------------------------------------------------

    pub fn tick(&mut self, input: &InputState) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if let Some((dx, dy)) = input.direction() {
            self.x += dx * self.config.speed;
            self.y += dy * self.config.speed;
            outcome.moving = true;
            outcome.legs_animated = self.category == HabitatCategory::Land;
            if dx < 0.0 {
                self.facing = Facing::Natural;
            } else if dx > 0.0 {
                self.facing = Facing::Mirrored;
            }
        }

        let size = self.config.dino_size;
        let max_x = (self.arena.width as f64 - size).max(0.0);
        let max_y = (self.arena.height as f64 - size).max(0.0);
        self.x = self.x.clamp(0.0, max_x);
        self.y = self.y.clamp(0.0, max_y);

        if self.collectible.visible && self.touches_collectible() {
            outcome.collection = Some(self.collect());
        }
        outcome
    }

    // Inclusive: boxes that merely touch count as a pickup.
    fn touches_collectible(&self) -> bool {
        let size = self.config.dino_size;
        let c = &self.collectible;
        !(self.x + size < c.x || self.x > c.x + c.size || self.y + size < c.y || self.y > c.y + c.size)
    }

    fn collect(&mut self) -> Collection {
        self.collectible.visible = false;
        self.score += 1;
        let morph = self.pick_creature().map(|creature| self.morph_into(creature));
        let respawn_after_ms = self.respawn_delay();
        log::debug!("star collected, score {}", self.score);
        Collection { score: self.score, morph, respawn_after_ms }
    }
}

// Whole pixels uniform in [0, max); 0 when there is no room.
fn floor_uniform<R: Rng + ?Sized>(rng: &mut R, max: f64) -> f64 {
    if max <= 0.0 { 0.0 } else { rng.gen_range(0.0..max).floor() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{JoystickVec, KeyState};

    fn state(width: u32, height: u32, seed: u64) -> GameState {
        GameState::with_rng(GameConfig::default(), Arena::new(width, height), StdRng::seed_from_u64(seed))
    }

    fn holding(key: &str) -> InputState {
        let mut keys = KeyState::default();
        keys.set(key, true);
        InputState { keys, ..Default::default() }
    }

    fn roster() -> CreatureRoster {
        crate::assets::parse_creature_roster(
            r#"{"land_animals": [{"emoji": "🐘", "translations": {"mg": "Elefanta"}}],
                "sea_animals": [{"emoji": "🐙", "translations": {"mg": "Horita"}}]}"#,
        )
        .unwrap()
    }

    #[test]
    fn starts_centred_as_trex_on_land() {
        let game = state(800, 600, 1);
        assert_eq!(game.position(), (350.0, 250.0));
        assert_eq!(game.creature().emoji, "🦖");
        assert_eq!(game.category(), HabitatCategory::Land);
        assert!(!game.collectible().visible);
    }

    #[test]
    fn moves_by_speed_and_mirrors_when_heading_right() {
        let mut game = state(800, 600, 1);
        let out = game.tick(&holding("ArrowRight"));
        assert!(out.moving);
        assert!(out.legs_animated);
        assert_eq!(game.position(), (357.0, 250.0));
        assert_eq!(game.facing(), Facing::Mirrored);
        game.tick(&holding("ArrowLeft"));
        assert_eq!(game.facing(), Facing::Natural);
        // Pure vertical movement keeps the facing.
        game.tick(&holding("ArrowUp"));
        assert_eq!(game.facing(), Facing::Natural);
    }

    #[test]
    fn idle_tick_reports_no_motion() {
        let mut game = state(800, 600, 1);
        let out = game.tick(&InputState::default());
        assert!(!out.moving);
        assert!(!out.legs_animated);
        assert_eq!(game.position(), (350.0, 250.0));
    }

    #[test]
    fn diagonal_is_not_faster() {
        let mut game = state(800, 600, 1);
        let mut input = holding("ArrowDown");
        input.joystick = JoystickVec { dx: 1.0, dy: 0.0 };
        game.tick(&input);
        let (x, y) = game.position();
        let travelled = (x - 350.0).hypot(y - 250.0);
        assert!((travelled - 7.0).abs() < 1e-9);
    }

    #[test]
    fn position_is_clamped_to_arena() {
        let mut game = state(300, 200, 1);
        for _ in 0..100 {
            game.tick(&holding("ArrowLeft"));
            game.tick(&holding("ArrowUp"));
        }
        assert_eq!(game.position(), (0.0, 0.0));
        for _ in 0..100 {
            game.tick(&holding("ArrowRight"));
            game.tick(&holding("ArrowDown"));
        }
        assert_eq!(game.position(), (200.0, 100.0));
    }

    #[test]
    fn collecting_scores_hides_star_and_schedules_respawn() {
        let mut game = state(800, 600, 4);
        game.place_collectible(350.0, 250.0);
        let out = game.tick(&InputState::default());
        let collection = out.collection.unwrap();
        assert_eq!(collection.score, 1);
        assert_eq!(game.score(), 1);
        assert!(!game.collectible().visible);
        assert!((1000.0..2000.0).contains(&collection.respawn_after_ms));
        // No roster yet: score still counts but nothing to morph into.
        assert!(collection.morph.is_none());
        // Hidden star can't be collected twice.
        assert!(game.tick(&InputState::default()).collection.is_none());
    }

    #[test]
    fn touching_edges_count_as_collision() {
        let mut game = state(800, 600, 4);
        // Dino spans x 350..=450; star starts exactly at its right edge.
        game.place_collectible(450.0, 250.0);
        assert!(game.tick(&InputState::default()).collection.is_some());
        game.place_collectible(451.0, 250.0);
        assert!(game.tick(&InputState::default()).collection.is_none());
    }

    #[test]
    fn morph_follows_roster_membership() {
        let mut game = state(1200, 900, 8);
        game.load_roster(roster());
        for _ in 0..20 {
            game.place_collectible(game.position().0, game.position().1);
            let morph = game.tick(&InputState::default()).collection.unwrap().morph.unwrap();
            let expected = if morph.creature.emoji == "🐘" {
                HabitatCategory::Land
            } else {
                HabitatCategory::Sea
            };
            assert_eq!(morph.category, expected);
            assert_eq!(game.category(), expected);
            assert_eq!(morph.decor.category(), expected);
            assert!(backgrounds(expected).contains(&morph.background));
        }
    }

    #[test]
    fn morph_preloads_next_layout_for_same_habitat() {
        let mut game = state(1200, 900, 3);
        game.load_roster(roster());
        game.load_decor(DecorCatalog::default());
        let morph = game.morph_into(Creature { emoji: "🐙".into(), ..Default::default() });
        assert_eq!(morph.category, HabitatCategory::Sea);
        let pending = game.decor_buffer().pending().unwrap();
        assert_eq!(pending.category(), HabitatCategory::Sea);
    }

    #[test]
    fn catalog_arriving_after_start_fills_the_arena() {
        let mut game = state(1200, 900, 6);
        let first = game.morph_into(Creature::starter());
        assert!(first.decor.is_empty());
        game.load_decor(
            crate::assets::parse_decor_catalog(
                r#"{"land_decor": {"tall": ["🌳"], "small": ["🌼"]},
                    "sea_decor": {"tall": ["🪸"], "small": []}}"#,
            )
            .unwrap(),
        );
        let drawn = game.render_decor();
        assert_eq!(drawn.category(), HabitatCategory::Land);
        assert!(!drawn.is_empty());
    }

    #[test]
    fn extreme_config_values_do_not_panic() {
        let config = GameConfig::from_json(
            r#"{"decor_base_size": 2000000000, "respawn_min_ms": 1e300, "respawn_max_ms": 5}"#,
        )
        .unwrap();
        let mut game = GameState::with_rng(config, Arena::new(800, 600), StdRng::seed_from_u64(2));
        game.load_decor(DecorCatalog {
            land_decor: crate::decor::DecorPalette { tall: vec!["🌳".into()], small: vec!["🌼".into()] },
            sea_decor: Default::default(),
        });
        game.render_decor();
        game.place_collectible(game.position().0, game.position().1);
        let collection = game.tick(&InputState::default()).collection.unwrap();
        assert!(collection.respawn_after_ms.is_finite());
    }

    #[test]
    fn spawned_star_fits_inside_arena() {
        let mut game = state(400, 300, 12);
        for _ in 0..100 {
            let star = game.spawn_collectible();
            assert!(star.visible);
            assert!(star.x >= 0.0 && star.x < 330.0);
            assert!(star.y >= 0.0 && star.y < 230.0);
            assert_eq!(star.x, star.x.floor());
        }
    }

    #[test]
    fn resize_recentres_and_drops_stale_preload() {
        let mut game = state(800, 600, 5);
        game.render_decor();
        assert!(game.decor_buffer().pending().is_some());
        game.tick(&holding("ArrowRight"));
        game.resize(Arena::new(1000, 700));
        assert_eq!(game.position(), (450.0, 300.0));
        assert!(game.decor_buffer().pending().is_none());
    }
}
