//! DOM presenter
//!
//! Entities are absolutely positioned `div`s inside the play area; the HUD is
//! a handful of elements looked up once at start-up.

use std::collections::HashMap;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use crate::sim::{Layout, Presenter, VisualHandle};

const PLAY_ICON: &str = r#"<i class="fa fa-play"></i>"#;
const PAUSE_ICON: &str = r#"<i class="fa fa-pause"></i>"#;
const HEART: &str = "❤️";

/// Look up a required element; a missing one is a start-up error
fn element(document: &Document, selector: &str) -> Result<HtmlElement, JsValue> {
    document
        .query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("missing element {}", selector)))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("{} is not an HTML element", selector)))
}

fn set_px(el: &HtmlElement, property: &str, value: f32) {
    let _ = el.style().set_property(property, &format!("{}px", value));
}

pub struct DomPresenter {
    document: Document,
    background: HtmlElement,
    cannon: HtmlElement,
    coin_count: HtmlElement,
    hearts: HtmlElement,
    high_score_message: HtmlElement,
    pause_button: HtmlElement,
    visuals: HashMap<VisualHandle, HtmlElement>,
    next_handle: u32,
}

impl DomPresenter {
    pub fn new(document: Document) -> Result<Self, JsValue> {
        Ok(Self {
            background: element(&document, ".game-container__background")?,
            cannon: element(&document, "#cannon")?,
            coin_count: element(&document, "#coinCount")?,
            hearts: element(&document, "#heartsContainer")?,
            high_score_message: element(&document, "#highscoreMessage")?,
            pause_button: element(&document, "#pauseButton")?,
            document,
            visuals: HashMap::new(),
            next_handle: 0,
        })
    }

    /// Play area element (pointer and click target)
    pub fn background(&self) -> &HtmlElement {
        &self.background
    }

    pub fn pause_button(&self) -> &HtmlElement {
        &self.pause_button
    }

    /// Create a positioned `div` in the play area and register it
    fn attach(&mut self, classes: &[&str], pos: Vec2) -> VisualHandle {
        self.next_handle += 1;
        let handle = VisualHandle(self.next_handle);

        let el = match self
            .document
            .create_element("div")
            .map(|el| el.dyn_into::<HtmlElement>())
        {
            Ok(Ok(el)) => el,
            _ => {
                log::error!("Failed to create visual {:?}", handle);
                return handle;
            }
        };
        for class in classes {
            let _ = el.class_list().add_1(class);
        }
        set_px(&el, "left", pos.x);
        set_px(&el, "top", pos.y);
        if self.background.append_child(&el).is_err() {
            log::error!("Failed to attach visual {:?}", handle);
            return handle;
        }

        self.visuals.insert(handle, el);
        handle
    }
}

impl Presenter for DomPresenter {
    fn layout(&self) -> Layout {
        let play = self.background.get_bounding_client_rect();
        let cannon = self.cannon.get_bounding_client_rect();
        Layout {
            play_size: Vec2::new(
                self.background.offset_width() as f32,
                self.background.offset_height() as f32,
            ),
            cannon_size: Vec2::new(
                self.cannon.offset_width() as f32,
                self.cannon.offset_height() as f32,
            ),
            cannon_top: (cannon.top() - play.top()) as f32,
        }
    }

    fn move_cannon(&mut self, x: f32) {
        set_px(&self.cannon, "left", x);
    }

    fn render_bullet(&mut self, pos: Vec2, _size: Vec2) -> VisualHandle {
        self.attach(&["bullet"], pos)
    }

    fn render_ball(&mut self, pos: Vec2, radius: f32, hue: u16) -> VisualHandle {
        let handle = self.attach(&["ball", "random-color"], pos);
        if let Some(el) = self.visuals.get(&handle) {
            set_px(el, "width", radius * 2.0);
            set_px(el, "height", radius * 2.0);
            let _ = el.style().set_property("--hue", &hue.to_string());
        }
        handle
    }

    fn move_visual(&mut self, handle: VisualHandle, pos: Vec2) {
        if let Some(el) = self.visuals.get(&handle) {
            set_px(el, "left", pos.x);
            set_px(el, "top", pos.y);
        }
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        if let Some(el) = self.visuals.remove(&handle) {
            el.remove();
        }
    }

    fn update_score(&mut self, coins: u64) {
        self.coin_count.set_text_content(Some(&coins.to_string()));
    }

    fn update_lives(&mut self, lives: u8) {
        self.hearts
            .set_text_content(Some(&HEART.repeat(lives as usize)));
    }

    fn show_high_score_banner(&mut self) {
        let _ = self.high_score_message.style().set_property("display", "block");
    }

    fn hide_high_score_banner(&mut self) {
        let _ = self.high_score_message.style().set_property("display", "none");
    }

    fn set_paused(&mut self, paused: bool) {
        self.pause_button
            .set_inner_html(if paused { PLAY_ICON } else { PAUSE_ICON });
    }

    fn show_game_over(&mut self, _coins: u64) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message("Game Over!");
        }
    }
}
