//! One-slot decor preload.
//!
//! The renderer calls [`DecorBuffer::ensure_ready`] to get the layout it should
//! draw, then [`DecorBuffer::advance`] to pre-generate the next one. `advance`
//! regenerates for the category that was *just drawn*, so switching habitat on
//! the following render still generates synchronously inside `ensure_ready`.

use rand::Rng;

use super::{DecorCatalog, DecorGenerator, DecorSet, HabitatCategory};

#[derive(Clone, Debug, Default)]
pub struct DecorBuffer {
    pending: Option<DecorSet>,
}

impl DecorBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&DecorSet> {
        self.pending.as_ref()
    }

    /// Layout to draw for `category`: the preloaded one if it matches, otherwise
    /// a freshly generated one (which then becomes the pending set).
    pub fn ensure_ready<R: Rng + ?Sized>(
        &mut self,
        generator: &DecorGenerator,
        catalog: Option<&DecorCatalog>,
        category: HabitatCategory,
        rng: &mut R,
    ) -> &DecorSet {
        if self.pending.as_ref().is_none_or(|set| set.category() != category) {
            log::debug!("no preloaded {} decor; generating inline", category.label());
            self.pending = Some(generator.generate(catalog, category, rng));
        }
        self.pending.get_or_insert_with(|| DecorSet::empty(category))
    }

    /// Replace the pending set with a new layout for `category`.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        generator: &DecorGenerator,
        catalog: Option<&DecorCatalog>,
        category: HabitatCategory,
        rng: &mut R,
    ) {
        self.pending = Some(generator.generate(catalog, category, rng));
    }

    /// Forget the preload, e.g. after the arena was resized.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}
