//! Procedural decor: the emoji scenery scattered behind the player.
//!
//! Three layers, bottom-up:
//! - [`placement`]: rejection sampling for a free rectangle inside the arena.
//! - [`generator`]: picks glyphs + instance counts for a habitat and places them.
//! - [`buffer`]: keeps one preloaded [`DecorSet`] so a re-render does not stall
//!   on generation.
//!
//! Nothing here touches the DOM; the stage turns a [`DecorSet`] into elements.

use serde::Deserialize;

pub mod buffer;
pub mod generator;
pub mod placement;

pub use buffer::DecorBuffer;
pub use generator::{DecorGenerator, DecorPlan, GlyphRun};
pub use placement::{MAX_PLACEMENT_ATTEMPTS, Slot, SlotSearch, find_free_slot, search_free_slot};

// --- Habitat -----------------------------------------------------------------

/// Which world the current creature lives in. Drives decor and background palettes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HabitatCategory {
    #[default]
    Land,
    Sea,
}

impl HabitatCategory {
    pub fn label(self) -> &'static str {
        match self {
            HabitatCategory::Land => "land",
            HabitatCategory::Sea => "sea",
        }
    }
}

// --- Geometry ----------------------------------------------------------------

/// Arena dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arena {
    pub width: u32,
    pub height: u32,
}

impl Arena {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Strict overlap: rectangles sharing only an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    pub fn fits_in(&self, arena: Arena) -> bool {
        self.right() <= arena.width && self.bottom() <= arena.height
    }
}

// --- Palettes (loaded from decor.json) ---------------------------------------

/// Glyph lists for one habitat. One tall glyph and up to three small glyphs are
/// drawn from these per generation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DecorPalette {
    #[serde(default)]
    pub tall: Vec<String>,
    #[serde(default)]
    pub small: Vec<String>,
}

/// The whole decor document: one palette per habitat.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DecorCatalog {
    pub land_decor: DecorPalette,
    pub sea_decor: DecorPalette,
}

impl DecorCatalog {
    pub fn palette(&self, category: HabitatCategory) -> &DecorPalette {
        match category {
            HabitatCategory::Land => &self.land_decor,
            HabitatCategory::Sea => &self.sea_decor,
        }
    }
}

// --- Placed decor --------------------------------------------------------------

/// One placed glyph. Width / height are fixed per size class (tall vs small).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecorItem {
    pub glyph: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl DecorItem {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A complete decor layout for one habitat. Built in one go by the generator and
/// read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecorSet {
    category: HabitatCategory,
    items: Vec<DecorItem>,
}

impl DecorSet {
    pub(crate) fn new(category: HabitatCategory, items: Vec<DecorItem>) -> Self {
        Self { category, items }
    }

    /// "No decor yet", e.g. before decor.json arrived.
    pub fn empty(category: HabitatCategory) -> Self {
        Self::new(category, Vec::new())
    }

    pub fn category(&self) -> HabitatCategory {
        self.category
    }

    pub fn items(&self) -> &[DecorItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecorItem> {
        self.items.iter()
    }
}
