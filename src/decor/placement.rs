//! Rejection sampling for a free spot in the arena.

use rand::Rng;

use super::{Arena, Rect};

/// Upper bound on candidate draws per item. Keeps generation bounded when the
/// arena is crowded; the item is simply dropped once this is exhausted.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

/// Top-left corner of an accepted placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub x: u32,
    pub y: u32,
}

/// Outcome of a search, including how many candidates were drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotSearch {
    pub slot: Option<Slot>,
    pub attempts: u32,
}

/// Find a `width` x `height` spot that does not overlap anything in `occupied`.
pub fn find_free_slot<R: Rng + ?Sized>(
    rng: &mut R,
    width: u32,
    height: u32,
    occupied: &[Rect],
    bounds: Arena,
) -> Option<Slot> {
    search_free_slot(rng, width, height, occupied, bounds).slot
}

/// Same as [`find_free_slot`] but also reports the number of draws used.
pub fn search_free_slot<R: Rng + ?Sized>(
    rng: &mut R,
    width: u32,
    height: u32,
    occupied: &[Rect],
    bounds: Arena,
) -> SlotSearch {
    // An item bigger than the arena can never be placed; don't burn attempts on it.
    if width > bounds.width || height > bounds.height {
        return SlotSearch { slot: None, attempts: 0 };
    }
    let span_x = bounds.width - width;
    let span_y = bounds.height - height;

    for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
        let x = axis_candidate(rng, span_x);
        let y = axis_candidate(rng, span_y);
        let candidate = Rect::new(x, y, width, height);
        if !occupied.iter().any(|r| r.overlaps(&candidate)) {
            return SlotSearch { slot: Some(Slot { x, y }), attempts: attempt };
        }
    }
    SlotSearch { slot: None, attempts: MAX_PLACEMENT_ATTEMPTS }
}

// Uniform in [0, span); an item exactly as wide as the arena can only sit at 0.
fn axis_candidate<R: Rng + ?Sized>(rng: &mut R, span: u32) -> u32 {
    if span == 0 { 0 } else { rng.gen_range(0..span) }
}
