// Integration tests for decor generation invariants.
// These tests are native-friendly and avoid wasm/browser APIs.

use dino_morph::decor::generator::{MAX_SMALL_GLYPHS, SMALL_COUNT, TALL_COUNT};
use dino_morph::decor::{
    Arena, DecorBuffer, DecorCatalog, DecorGenerator, DecorPalette, DecorPlan, HabitatCategory,
    MAX_PLACEMENT_ATTEMPTS, Rect, find_free_slot, search_free_slot,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

fn catalog() -> DecorCatalog {
    DecorCatalog {
        land_decor: DecorPalette {
            tall: strings(&["🌳", "🌲", "🌴"]),
            small: strings(&["🌼", "🍄", "🌾", "🪨", "🌷", "🌿"]),
        },
        sea_decor: DecorPalette {
            tall: strings(&["🪸", "🌊"]),
            small: strings(&["🐚", "🫧"]),
        },
    }
}

#[test]
fn generated_items_stay_inside_the_arena() {
    let mut rng = StdRng::seed_from_u64(100);
    let cat = catalog();
    for (w, h) in [(400, 300), (800, 600), (1280, 720), (160, 160)] {
        let arena = Arena::new(w, h);
        let generator = DecorGenerator::new(arena, 50, 3);
        for category in [HabitatCategory::Land, HabitatCategory::Sea] {
            let set = generator.generate(Some(&cat), category, &mut rng);
            for item in set.iter() {
                assert!(item.rect().fits_in(arena), "{:?} escapes {}x{}", item, w, h);
            }
        }
    }
}

#[test]
fn generated_items_never_overlap() {
    let mut rng = StdRng::seed_from_u64(101);
    let cat = catalog();
    let generator = DecorGenerator::new(Arena::new(900, 600), 50, 3);
    for _ in 0..50 {
        let set = generator.generate(Some(&cat), HabitatCategory::Land, &mut rng);
        let items = set.items();
        for (i, a) in items.iter().enumerate() {
            for b in &items[i + 1..] {
                assert!(!a.rect().overlaps(&b.rect()), "{:?} overlaps {:?}", a, b);
            }
        }
    }
}

#[test]
fn generate_tags_result_with_requested_category() {
    let mut rng = StdRng::seed_from_u64(102);
    let cat = catalog();
    let generator = DecorGenerator::new(Arena::new(800, 600), 50, 3);
    for category in [HabitatCategory::Sea, HabitatCategory::Land, HabitatCategory::Sea] {
        assert_eq!(generator.generate(Some(&cat), category, &mut rng).category(), category);
        assert_eq!(generator.generate(None, category, &mut rng).category(), category);
    }
}

#[test]
fn sea_layout_only_uses_sea_glyphs() {
    let mut rng = StdRng::seed_from_u64(103);
    let cat = catalog();
    let generator = DecorGenerator::new(Arena::new(800, 600), 50, 3);
    let set = generator.generate(Some(&cat), HabitatCategory::Sea, &mut rng);
    assert!(!set.is_empty());
    let sea = &cat.sea_decor;
    for item in set.iter() {
        assert!(sea.tall.contains(&item.glyph) || sea.small.contains(&item.glyph));
    }
}

#[test]
fn plan_counts_match_documented_ranges() {
    let mut rng = StdRng::seed_from_u64(104);
    let cat = catalog();
    for _ in 0..300 {
        for category in [HabitatCategory::Land, HabitatCategory::Sea] {
            let palette = cat.palette(category);
            let plan = DecorPlan::choose(palette, &mut rng);
            let tall = plan.tall.expect("tall glyph");
            assert!(TALL_COUNT.contains(&tall.count), "tall count {}", tall.count);
            assert_eq!(plan.small.len(), MAX_SMALL_GLYPHS.min(palette.small.len()));
            for run in &plan.small {
                assert!(SMALL_COUNT.contains(&run.count), "small count {}", run.count);
            }
        }
    }
}

#[test]
fn tall_glyph_appears_once_per_layout() {
    let mut rng = StdRng::seed_from_u64(105);
    let cat = catalog();
    let generator = DecorGenerator::new(Arena::new(2000, 1500), 50, 3);
    for _ in 0..20 {
        let set = generator.generate(Some(&cat), HabitatCategory::Land, &mut rng);
        let mut tall: Vec<&str> = set
            .iter()
            .filter(|i| i.width == 150)
            .map(|i| i.glyph.as_str())
            .collect();
        tall.dedup();
        assert_eq!(tall.len(), 1);
    }
}

#[test]
fn full_arena_exhausts_exactly_the_attempt_cap() {
    let mut rng = StdRng::seed_from_u64(106);
    let arena = Arena::new(400, 300);
    let cover = [Rect::new(0, 0, 400, 300)];
    let search = search_free_slot(&mut rng, 50, 50, &cover, arena);
    assert_eq!(search.slot, None);
    assert_eq!(search.attempts, MAX_PLACEMENT_ATTEMPTS);
    assert_eq!(MAX_PLACEMENT_ATTEMPTS, 100);
}

#[test]
fn tall_glyph_in_small_arena_lands_in_range() {
    let mut rng = StdRng::seed_from_u64(107);
    for _ in 0..200 {
        let slot = find_free_slot(&mut rng, 150, 150, &[], Arena::new(400, 300)).expect("slot");
        assert!(slot.x <= 250, "x = {}", slot.x);
        assert!(slot.y <= 150, "y = {}", slot.y);
    }
}

#[test]
fn buffer_returns_same_layout_until_advanced() {
    let mut rng = StdRng::seed_from_u64(108);
    let cat = catalog();
    let generator = DecorGenerator::new(Arena::new(800, 600), 50, 3);
    let mut buffer = DecorBuffer::new();
    let a = buffer.ensure_ready(&generator, Some(&cat), HabitatCategory::Sea, &mut rng).clone();
    let b = buffer.ensure_ready(&generator, Some(&cat), HabitatCategory::Sea, &mut rng).clone();
    assert_eq!(a, b);
}

#[test]
fn buffer_switching_habitat_after_advance_regenerates() {
    let mut rng = StdRng::seed_from_u64(109);
    let cat = catalog();
    let generator = DecorGenerator::new(Arena::new(800, 600), 50, 3);
    let mut buffer = DecorBuffer::new();
    buffer.ensure_ready(&generator, Some(&cat), HabitatCategory::Land, &mut rng);
    buffer.advance(&generator, Some(&cat), HabitatCategory::Land, &mut rng);
    let next = buffer.ensure_ready(&generator, Some(&cat), HabitatCategory::Sea, &mut rng);
    assert_eq!(next.category(), HabitatCategory::Sea);
    assert_eq!(buffer.pending().map(|s| s.category()), Some(HabitatCategory::Sea));
}
