//! Decor generation: choose glyphs and counts for a habitat, then place them.

use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::SliceRandom;

use super::placement::find_free_slot;
use super::{Arena, DecorCatalog, DecorItem, DecorPalette, DecorSet, HabitatCategory, Rect};

/// Instances of the single tall glyph per layout.
pub const TALL_COUNT: RangeInclusive<u32> = 5..=15;
/// Instances of each chosen small glyph.
pub const SMALL_COUNT: RangeInclusive<u32> = 1..=11;
/// Distinct small glyphs per layout (fewer if the palette is shorter).
pub const MAX_SMALL_GLYPHS: usize = 3;

/// A glyph and how many copies of it were requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRun {
    pub glyph: String,
    pub count: u32,
}

/// What a generation asks for, before placement drops anything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecorPlan {
    pub tall: Option<GlyphRun>,
    pub small: Vec<GlyphRun>,
}

impl DecorPlan {
    pub fn choose<R: Rng + ?Sized>(palette: &DecorPalette, rng: &mut R) -> Self {
        let tall = palette.tall.choose(rng).map(|glyph| GlyphRun {
            glyph: glyph.clone(),
            count: rng.gen_range(TALL_COUNT),
        });

        let mut pool: Vec<&String> = palette.small.iter().collect();
        pool.shuffle(rng);
        let small = pool
            .into_iter()
            .take(MAX_SMALL_GLYPHS)
            .map(|glyph| GlyphRun {
                glyph: glyph.clone(),
                count: rng.gen_range(SMALL_COUNT),
            })
            .collect();

        Self { tall, small }
    }

    pub fn requested(&self) -> u32 {
        self.tall.as_ref().map_or(0, |t| t.count) + self.small.iter().map(|s| s.count).sum::<u32>()
    }
}

/// Lays decor out inside a fixed arena. Tall items are `tall_scale` times the
/// small `base_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecorGenerator {
    pub arena: Arena,
    pub base_size: u32,
    pub tall_scale: u32,
}

impl DecorGenerator {
    pub fn new(arena: Arena, base_size: u32, tall_scale: u32) -> Self {
        Self { arena, base_size, tall_scale }
    }

    pub fn tall_size(&self) -> u32 {
        self.base_size.saturating_mul(self.tall_scale)
    }

    /// Build a fresh layout for `category`. Without a catalog the result is an
    /// empty set: the renderer just shows no decor yet.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        catalog: Option<&DecorCatalog>,
        category: HabitatCategory,
        rng: &mut R,
    ) -> DecorSet {
        let Some(catalog) = catalog else {
            log::debug!("decor catalog not loaded; empty {} layout", category.label());
            return DecorSet::empty(category);
        };
        let plan = DecorPlan::choose(catalog.palette(category), rng);
        self.place(&plan, category, rng)
    }

    /// Place every requested instance, tall ones first, then each small group in
    /// plan order. Instances with no free slot are dropped.
    pub fn place<R: Rng + ?Sized>(
        &self,
        plan: &DecorPlan,
        category: HabitatCategory,
        rng: &mut R,
    ) -> DecorSet {
        let tall_size = self.tall_size();
        let runs = plan
            .tall
            .iter()
            .map(|run| (run, tall_size))
            .chain(plan.small.iter().map(|run| (run, self.base_size)));

        let mut occupied: Vec<Rect> = Vec::new();
        let mut items: Vec<DecorItem> = Vec::new();
        for (run, size) in runs {
            for _ in 0..run.count {
                let Some(slot) = find_free_slot(rng, size, size, &occupied, self.arena) else {
                    continue;
                };
                let item = DecorItem {
                    glyph: run.glyph.clone(),
                    x: slot.x,
                    y: slot.y,
                    width: size,
                    height: size,
                };
                occupied.push(item.rect());
                items.push(item);
            }
        }

        let requested = plan.requested() as usize;
        if items.len() < requested {
            log::debug!(
                "{} decor: placed {} of {} items ({} crowded out)",
                category.label(),
                items.len(),
                requested,
                requested - items.len()
            );
        }
        DecorSet::new(category, items)
    }
}
