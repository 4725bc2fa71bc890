//! Browser stage: binds [`GameState`] to the page.
//!
//! The page provides the static skeleton (`game-container`, `controller`,
//! `dino-container` with the `emojiTop` / `emojiBottom` images, `collectible`,
//! `score-header`, `animal-name`). Everything else (decor layer, joystick) is
//! created here. State lives in a thread-local and is only touched from the
//! animation-frame callback and DOM event handlers.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement,
    HtmlImageElement, Window, window,
};

use super::{COLLECTIBLE_GLYPH, GameState, Morph, TickOutcome};
use crate::assets::{Assets, Creature, parse_creature_roster, parse_decor_catalog};
use crate::config::GameConfig;
use crate::decor::{Arena, DecorSet};
use crate::input::{InputState, Joystick};

struct Stage {
    game: GameState,
    input: InputState,
    joystick: Joystick,
    doc: Document,
    container: HtmlElement,
    dino: HtmlElement,
    emoji_top: HtmlImageElement,
    emoji_bottom: HtmlImageElement,
    collectible: HtmlElement,
    score_header: Element,
    animal_name: Element,
    decor_layer: HtmlElement,
    joystick_base: HtmlElement,
    joystick_handle: HtmlElement,
}

thread_local! {
    static STAGE: RefCell<Option<Stage>> = const { RefCell::new(None) };
    // Documents that arrived before `start_game`.
    static EARLY_ASSETS: RefCell<Assets> = RefCell::new(Assets::new());
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn with_stage<R>(f: impl FnOnce(&mut Stage) -> R) -> Option<R> {
    STAGE.with(|cell| cell.borrow_mut().as_mut().map(f))
}

// --- DOM helpers -------------------------------------------------------------

fn by_id<T: JsCast>(doc: &Document, id: &str) -> Result<T, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{id} has unexpected element type")))
}

fn create<T: JsCast>(doc: &Document, tag: &str, id: Option<&str>) -> Result<T, JsValue> {
    let el = doc.create_element(tag)?;
    if let Some(id) = id {
        el.set_id(id);
    }
    el.dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("<{tag}> has unexpected element type")))
}

fn set_styles(el: &HtmlElement, props: &[(&str, &str)]) -> Result<(), JsValue> {
    let style = el.style();
    for (name, value) in props {
        style.set_property(name, value)?;
    }
    Ok(())
}

fn px(v: f64) -> String {
    format!("{v}px")
}

/// Reserve the header band at the top of the viewport and give the rest to the
/// game container.
fn fit_container(win: &Window, container: &HtmlElement, header_fraction: f64) -> Result<(), JsValue> {
    let inner = win.inner_height()?.as_f64().unwrap_or(0.0);
    let header = inner * header_fraction;
    set_styles(
        container,
        &[("height", px(inner - header).as_str()), ("margin-top", px(header).as_str())],
    )
}

fn arena_of(container: &HtmlElement) -> Arena {
    Arena::new(container.client_width().max(0) as u32, container.client_height().max(0) as u32)
}

// --- Stage -------------------------------------------------------------------

impl Stage {
    fn show_morph(&self, morph: &Morph) -> Result<(), JsValue> {
        set_styles(&self.container, &[("background", morph.background)])?;
        self.draw_creature(&morph.creature)?;
        self.draw_decor(&morph.decor)?;
        self.animal_name.set_text_content(Some(&morph.creature.header_label()));
        Ok(())
    }

    /// Rasterise the creature emoji and use it for both halves of the sprite
    /// (the bottom half wiggles as legs).
    fn draw_creature(&self, creature: &Creature) -> Result<(), JsValue> {
        let size = self.game.config().dino_size;
        let canvas: HtmlCanvasElement = create(&self.doc, "canvas", None)?;
        canvas.set_width(size as u32);
        canvas.set_height(size as u32);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        ctx.set_font(&format!("{size}px serif"));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.clear_rect(0.0, 0.0, size, size);
        // "middle" baseline centres the em box, not the glyph ink; correct by metrics.
        let metrics = ctx.measure_text(&creature.emoji)?;
        let offset_y =
            (metrics.actual_bounding_box_ascent() - metrics.actual_bounding_box_descent()) / 2.0;
        ctx.fill_text(&creature.emoji, size / 2.0, size / 2.0 + offset_y)?;
        let url = canvas.to_data_url()?;
        self.emoji_top.set_src(&url);
        self.emoji_bottom.set_src(&url);
        Ok(())
    }

    fn draw_decor(&self, decor: &DecorSet) -> Result<(), JsValue> {
        self.decor_layer.set_inner_html("");
        for item in decor.iter() {
            let el: HtmlElement = create(&self.doc, "div", None)?;
            el.set_class_name("decor-item");
            set_styles(
                &el,
                &[
                    ("position", "absolute"),
                    ("left", px(item.x as f64).as_str()),
                    ("top", px(item.y as f64).as_str()),
                    ("width", px(item.width as f64).as_str()),
                    ("height", px(item.height as f64).as_str()),
                    ("font-size", px(item.height as f64).as_str()),
                ],
            )?;
            el.set_text_content(Some(&item.glyph));
            self.decor_layer.append_child(&el)?;
        }
        log::debug!("drew {} {} decor items", decor.len(), decor.category().label());
        Ok(())
    }

    fn show_collectible(&mut self) -> Result<(), JsValue> {
        let star = self.game.spawn_collectible();
        set_styles(
            &self.collectible,
            &[("left", px(star.x).as_str()), ("top", px(star.y).as_str()), ("display", "block")],
        )
    }

    fn apply(&mut self, outcome: TickOutcome) -> Result<(), JsValue> {
        let legs = self.emoji_bottom.class_list();
        if outcome.legs_animated {
            legs.add_1("moving")?;
        } else {
            legs.remove_1("moving")?;
        }

        let (x, y) = self.game.position();
        let flip = self.game.facing().scale_x();
        let transform = format!("translate({x}px, {y}px) scaleX({flip})");
        set_styles(&self.dino, &[("transform", transform.as_str())])?;

        let Some(collection) = outcome.collection else {
            return Ok(());
        };
        set_styles(&self.collectible, &[("display", "none")])?;
        self.score_header.set_text_content(Some(&format!("Isa: {}", collection.score)));
        if let Some(morph) = &collection.morph {
            self.show_morph(morph)?;
        }
        schedule_respawn(collection.respawn_after_ms)
    }

    /// Pointer at client coordinates; moves the handle and updates the stick vector.
    fn steer_joystick(&mut self, client_x: f64, client_y: f64) -> Result<(), JsValue> {
        let rect = self.joystick_base.get_bounding_client_rect();
        let local_x = client_x - rect.left();
        let local_y = client_y - rect.top();
        let (dx, dy) = self.joystick.handle_offset(local_x, local_y);
        self.place_handle(dx, dy)?;
        self.input.joystick = self.joystick.deflection(local_x, local_y);
        Ok(())
    }

    fn place_handle(&self, dx: f64, dy: f64) -> Result<(), JsValue> {
        let (cx, cy) = self.joystick.center;
        let half_w = self.joystick_handle.offset_width() as f64 / 2.0;
        let half_h = self.joystick_handle.offset_height() as f64 / 2.0;
        set_styles(
            &self.joystick_handle,
            &[("left", px(cx - half_w + dx).as_str()), ("top", px(cy - half_h + dy).as_str())],
        )
    }

    fn release_joystick(&mut self) -> Result<(), JsValue> {
        if !self.input.joystick_active {
            return Ok(());
        }
        self.input.release_joystick();
        self.place_handle(0.0, 0.0)
    }

    fn resize(&mut self) -> Result<(), JsValue> {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        fit_container(&win, &self.container, self.game.config().header_fraction)?;
        self.game.resize(arena_of(&self.container));
        Ok(())
    }
}

// Fire-and-forget: spawning is idempotent, so a late or doubled respawn is harmless.
fn schedule_respawn(delay_ms: f64) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let callback = Closure::once_into_js(move || {
        with_stage(|stage| {
            if let Err(err) = stage.show_collectible() {
                log::error!("respawn failed: {:?}", err);
            }
        });
    });
    win.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay_ms as i32,
    )?;
    Ok(())
}

// --- Setup -------------------------------------------------------------------

/// Whether `start` has already bound a stage to the page.
pub fn is_running() -> bool {
    STAGE.with(|cell| cell.borrow().is_some())
}

pub fn start(config: GameConfig) -> Result<(), JsValue> {
    // A second start would add another set of listeners and a second frame loop.
    if is_running() {
        log::warn!("start_game called while already running; ignored");
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let container: HtmlElement = by_id(&doc, "game-container")?;
    fit_container(&win, &container, config.header_fraction)?;

    let dino: HtmlElement = by_id(&doc, "dino-container")?;
    let dino_px = px(config.dino_size);
    // Sprite above decor.
    set_styles(
        &dino,
        &[("width", dino_px.as_str()), ("height", dino_px.as_str()), ("z-index", "1000")],
    )?;

    // Decor layer sits behind everything and never eats pointer events.
    let decor_layer: HtmlElement = match doc.get_element_by_id("decor-container") {
        Some(el) => el.dyn_into()?,
        None => {
            let el: HtmlElement = create(&doc, "div", Some("decor-container"))?;
            container.append_child(&el)?;
            el
        }
    };
    set_styles(
        &decor_layer,
        &[
            ("position", "absolute"),
            ("top", "0"),
            ("left", "0"),
            ("width", "100%"),
            ("height", "100%"),
            ("pointer-events", "none"),
            ("z-index", "0"),
        ],
    )?;

    let collectible: HtmlElement = by_id(&doc, "collectible")?;
    let star_px = px(config.collectible_size);
    set_styles(
        &collectible,
        &[
            ("width", star_px.as_str()),
            ("height", star_px.as_str()),
            ("font-size", star_px.as_str()),
            ("z-index", "1000"),
        ],
    )?;
    collectible.set_inner_text(COLLECTIBLE_GLYPH);

    // Joystick: base + draggable handle inside #controller.
    let controller: HtmlElement = by_id(&doc, "controller")?;
    controller.set_inner_html("");
    let joystick_base: HtmlElement = create(&doc, "div", Some("joystick"))?;
    controller.append_child(&joystick_base)?;
    let joystick_handle: HtmlElement = create(&doc, "div", Some("joystick-handle"))?;
    joystick_base.append_child(&joystick_handle)?;

    let mut game = GameState::new(config.clone(), arena_of(&container));
    let early = EARLY_ASSETS.with(|cell| cell.replace(Assets::new()));
    if let Some(catalog) = early.decor() {
        game.load_decor(catalog.clone());
    }
    let initial_background = early.roster().map(|roster| game.load_roster(roster.clone()));

    let mut stage = Stage {
        game,
        input: InputState::default(),
        joystick: Joystick::new(config.joystick_center, config.joystick_max_distance),
        doc: doc.clone(),
        container,
        dino,
        emoji_top: by_id(&doc, "emojiTop")?,
        emoji_bottom: by_id(&doc, "emojiBottom")?,
        collectible,
        score_header: by_id(&doc, "score-header")?,
        animal_name: by_id(&doc, "animal-name")?,
        decor_layer,
        joystick_base: joystick_base.clone(),
        joystick_handle,
    };

    let morph = stage.game.morph_into(Creature::starter());
    stage.show_morph(&morph)?;
    if let Some(background) = initial_background {
        set_styles(&stage.container, &[("background", background)])?;
    }
    stage.show_collectible()?;
    stage.place_handle(0.0, 0.0)?;

    STAGE.with(|cell| cell.replace(Some(stage)));

    install_listeners(&win, &joystick_base)?;
    start_loop();
    log::info!("dino morph started");
    Ok(())
}

fn install_listeners(win: &Window, joystick_base: &HtmlElement) -> Result<(), JsValue> {
    // Arrow keys
    for (event, pressed) in [("keydown", true), ("keyup", false)] {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            with_stage(|stage| stage.input.keys.set(&evt.key(), pressed));
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Joystick drag
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::PointerEvent| {
            with_stage(|stage| {
                stage.input.joystick_active = true;
                if let Err(err) = stage.steer_joystick(evt.client_x() as f64, evt.client_y() as f64) {
                    log::warn!("joystick update failed: {:?}", err);
                }
            });
        }) as Box<dyn FnMut(_)>);
        joystick_base
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::PointerEvent| {
            with_stage(|stage| {
                if !stage.input.joystick_active {
                    return;
                }
                if let Err(err) = stage.steer_joystick(evt.client_x() as f64, evt.client_y() as f64) {
                    log::warn!("joystick update failed: {:?}", err);
                }
            });
        }) as Box<dyn FnMut(_)>);
        joystick_base
            .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Release anywhere on the page
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::PointerEvent| {
            with_stage(|stage| {
                if let Err(err) = stage.release_joystick() {
                    log::warn!("joystick release failed: {:?}", err);
                }
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            with_stage(|stage| {
                if let Err(err) = stage.resize() {
                    log::warn!("resize failed: {:?}", err);
                }
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        with_stage(|stage| {
            let outcome = stage.game.tick(&stage.input);
            if let Err(err) = stage.apply(outcome) {
                log::error!("frame update failed: {:?}", err);
            }
        });
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

// --- Asset intake ------------------------------------------------------------

pub fn load_decor_catalog(json: &str) -> Result<(), JsValue> {
    let catalog = parse_decor_catalog(json).inspect_err(|err| log::error!("{err}"))?;
    log::info!("decor catalog loaded");
    let applied = with_stage(|stage| {
        stage.game.load_decor(catalog.clone());
        // Fill the arena now instead of waiting for the first morph.
        let decor = stage.game.render_decor();
        stage.draw_decor(&decor)
    });
    match applied {
        Some(result) => result,
        None => {
            EARLY_ASSETS.with(|cell| cell.borrow_mut().set_decor(catalog));
            Ok(())
        }
    }
}

pub fn load_creature_roster(json: &str) -> Result<(), JsValue> {
    let roster = parse_creature_roster(json).inspect_err(|err| log::error!("{err}"))?;
    let applied = with_stage(|stage| {
        let background = stage.game.load_roster(roster.clone());
        set_styles(&stage.container, &[("background", background)])
    });
    match applied {
        Some(result) => result,
        None => {
            EARLY_ASSETS.with(|cell| cell.borrow_mut().set_roster(roster));
            Ok(())
        }
    }
}
