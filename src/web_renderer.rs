use crate::game::{Cell, Game, GameState};
use crate::renderer::{wrap_text, Input, Renderer};
use crate::tick::Crash;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::f64::consts::PI;
use std::io;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Element, Event, HtmlCanvasElement, HtmlElement, KeyboardEvent,
    TouchEvent,
};

const CELL_SIZE: f64 = 24.0;
const HUD_HEIGHT: f64 = 36.0;
const TARGET_FRAME_TIME: f64 = 16.0; // ~60 FPS
const SWIPE_THRESHOLD: f64 = 30.0; // Below this a touch counts as a tap
const FACT_LINE_CHARS: usize = 44;

// Neon palette
const COLOR_BACKGROUND: &str = "#0f172a";
const COLOR_BOARD: &str = "#1e293b";
const COLOR_GRID_LINE: &str = "#164e63";
const COLOR_HEAD: &str = "#67e8f9";
const COLOR_BODY: &str = "#06b6d4";
const COLOR_FOOD: &str = "#f87171";
const COLOR_SCORE: &str = "#67e8f9";
const COLOR_BEST: &str = "#facc15";
const COLOR_TEXT: &str = "#e2e8f0";
const COLOR_MUTED: &str = "#94a3b8";
const COLOR_GAME_OVER: &str = "#ef4444";
const COLOR_OVERLAY: &str = "rgba(0, 0, 0, 0.7)";

fn js_io_error(e: JsValue) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{:?}", e))
}

pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    window: web_sys::Window,
    device_pixel_ratio: f64,
    last_render_time: f64,

    // Input arrives from DOM callbacks; the game loop drains it in order.
    pending_input: Rc<RefCell<VecDeque<Input>>>,
    touch_start_pos: Rc<RefCell<Option<(f64, f64)>>>,
}

impl WebRenderer {
    pub fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let device_pixel_ratio = window.device_pixel_ratio();

        Ok(Self {
            canvas,
            context,
            window,
            device_pixel_ratio,
            last_render_time: 0.0,
            pending_input: Rc::new(RefCell::new(VecDeque::new())),
            touch_start_pos: Rc::new(RefCell::new(None)),
        })
    }

    pub fn current_time(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn setup_keyboard_listener(&self) -> Result<(), JsValue> {
        let pending_input = self.pending_input.clone();

        let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            if let Some(input) = Input::from_key(&event.key()) {
                // There is nothing to quit to in a browser tab.
                if input != Input::Quit {
                    pending_input.borrow_mut().push_back(input);
                    event.prevent_default();
                }
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);

        self.window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget(); // Keep listener alive
        Ok(())
    }

    /// Wires every element carrying a `data-direction` attribute
    /// (`up`, `down`, `left`, `right`, `start` or `restart`) as a touch
    /// button.
    fn setup_button_listeners(&self) -> Result<(), JsValue> {
        let document = self.window.document().ok_or("no document")?;
        let buttons = document.query_selector_all("[data-direction]")?;

        for i in 0..buttons.length() {
            let Some(node) = buttons.get(i) else {
                continue;
            };
            let element: Element = node.dyn_into()?;
            let Some(input) = element
                .get_attribute("data-direction")
                .and_then(|name| Input::from_button(&name))
            else {
                continue;
            };

            let pending_input = self.pending_input.clone();
            let closure = Closure::wrap(Box::new(move |event: Event| {
                event.prevent_default();
                pending_input.borrow_mut().push_back(input);
            }) as Box<dyn FnMut(Event)>);

            for event_name in ["touchstart", "mousedown"] {
                element.add_event_listener_with_callback(
                    event_name,
                    closure.as_ref().unchecked_ref(),
                )?;
            }
            closure.forget();
        }
        Ok(())
    }

    fn setup_touch_listeners(&self) -> Result<(), JsValue> {
        let canvas = self.canvas.clone();

        // TouchStart: Record initial position
        let touch_start_pos = self.touch_start_pos.clone();
        let touchstart_closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default(); // Prevent zooming, scrolling, etc.
            if let Some(touch) = event.touches().item(0) {
                *touch_start_pos.borrow_mut() =
                    Some((touch.client_x() as f64, touch.client_y() as f64));
            }
        }) as Box<dyn FnMut(TouchEvent)>);
        canvas.add_event_listener_with_callback(
            "touchstart",
            touchstart_closure.as_ref().unchecked_ref(),
        )?;
        touchstart_closure.forget();

        // TouchMove: Prevent default to avoid scrolling
        let touchmove_closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default();
        }) as Box<dyn FnMut(TouchEvent)>);
        canvas.add_event_listener_with_callback(
            "touchmove",
            touchmove_closure.as_ref().unchecked_ref(),
        )?;
        touchmove_closure.forget();

        // TouchEnd: classify as swipe or tap
        let touch_start_pos = self.touch_start_pos.clone();
        let pending_input = self.pending_input.clone();
        let touchend_closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default();
            let Some(touch) = event.changed_touches().item(0) else {
                return;
            };
            if let Some((start_x, start_y)) = touch_start_pos.borrow_mut().take() {
                let dx = touch.client_x() as f64 - start_x;
                let dy = touch.client_y() as f64 - start_y;
                pending_input
                    .borrow_mut()
                    .push_back(Input::from_swipe(dx, dy, SWIPE_THRESHOLD));
            }
        }) as Box<dyn FnMut(TouchEvent)>);
        canvas.add_event_listener_with_callback(
            "touchend",
            touchend_closure.as_ref().unchecked_ref(),
        )?;
        touchend_closure.forget();

        // TouchCancel: Clear state if touch is cancelled
        let touch_start_pos = self.touch_start_pos.clone();
        let touchcancel_closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default();
            *touch_start_pos.borrow_mut() = None;
        }) as Box<dyn FnMut(TouchEvent)>);
        canvas.add_event_listener_with_callback(
            "touchcancel",
            touchcancel_closure.as_ref().unchecked_ref(),
        )?;
        touchcancel_closure.forget();

        Ok(())
    }

    fn resize(&self, display_width: f64, display_height: f64) -> Result<(), JsValue> {
        let pixel_width = (display_width * self.device_pixel_ratio) as u32;
        let pixel_height = (display_height * self.device_pixel_ratio) as u32;

        if self.canvas.width() == pixel_width && self.canvas.height() == pixel_height {
            return Ok(());
        }

        self.canvas.set_width(pixel_width);
        self.canvas.set_height(pixel_height);

        let element: &HtmlElement = self.canvas.unchecked_ref();
        element
            .style()
            .set_property("width", &format!("{}px", display_width))?;
        element
            .style()
            .set_property("height", &format!("{}px", display_height))?;

        // Setting width/height resets the context transform
        self.context
            .scale(self.device_pixel_ratio, self.device_pixel_ratio)
    }

    fn cell_origin(x: i32, y: i32) -> (f64, f64) {
        (x as f64 * CELL_SIZE, HUD_HEIGHT + y as f64 * CELL_SIZE)
    }

    fn draw_board(&self, game: &Game) {
        let size = game.grid().size() as f64 * CELL_SIZE;
        self.context.set_fill_style_str(COLOR_BOARD);
        self.context.fill_rect(0.0, HUD_HEIGHT, size, size);

        self.context.set_stroke_style_str(COLOR_GRID_LINE);
        self.context.set_line_width(1.0);
        self.context.stroke_rect(0.5, HUD_HEIGHT + 0.5, size - 1.0, size - 1.0);
    }

    fn draw_snake(&self, game: &Game) {
        let len = game.snake().len() as f64;
        for (i, pos) in game.snake().segments().enumerate() {
            let (px, py) = Self::cell_origin(pos.x, pos.y);
            // Segments shrink and fade toward the tail
            let scale = 1.0 - (i as f64 / len) * 0.4;
            let inset = CELL_SIZE * (1.0 - scale) / 2.0;
            let alpha = 1.0 - i as f64 / (len + 5.0);
            let color = if game.cell_at(pos.x, pos.y) == Cell::Head {
                COLOR_HEAD
            } else {
                COLOR_BODY
            };

            self.context.set_global_alpha(alpha);
            self.context.set_fill_style_str(color);
            self.context.fill_rect(
                px + inset,
                py + inset,
                CELL_SIZE - inset * 2.0,
                CELL_SIZE - inset * 2.0,
            );
        }
        self.context.set_global_alpha(1.0);
    }

    fn draw_food(&self, game: &Game) -> Result<(), JsValue> {
        let food = game.food();
        if game.cell_at(food.x, food.y) != Cell::Food {
            return Ok(());
        }
        let (px, py) = Self::cell_origin(food.x, food.y);
        self.context.set_fill_style_str(COLOR_FOOD);
        self.context.begin_path();
        self.context.arc(
            px + CELL_SIZE / 2.0,
            py + CELL_SIZE / 2.0,
            CELL_SIZE * 0.35,
            0.0,
            2.0 * PI,
        )?;
        self.context.fill();
        Ok(())
    }

    fn draw_hud(&self, game: &Game, width: f64) -> Result<(), JsValue> {
        self.context.set_font("16px monospace");
        self.context.set_text_baseline("middle");

        self.context.set_text_align("left");
        self.context.set_fill_style_str(COLOR_SCORE);
        self.context
            .fill_text(&format!("SCORE {}", game.score()), 8.0, HUD_HEIGHT / 2.0)?;

        self.context.set_text_align("right");
        self.context.set_fill_style_str(COLOR_BEST);
        self.context.fill_text(
            &format!("BEST {}", game.high_score()),
            width - 8.0,
            HUD_HEIGHT / 2.0,
        )?;
        Ok(())
    }

    fn draw_overlay(&self, game: &Game, width: f64) -> Result<(), JsValue> {
        let board = game.grid().size() as f64 * CELL_SIZE;
        let center_x = width / 2.0;
        let mut y = HUD_HEIGHT + board * 0.3;

        let mut lines: Vec<(String, &str, &str)> = Vec::new();
        match game.state() {
            GameState::Playing => return Ok(()),
            GameState::Start => {
                lines.push((
                    "NEON SNAKE".to_string(),
                    "bold 36px monospace",
                    COLOR_HEAD,
                ));
                lines.push((String::new(), "16px monospace", COLOR_TEXT));
                lines.push((
                    "Press Enter or tap to start".to_string(),
                    "16px monospace",
                    COLOR_TEXT,
                ));
            }
            GameState::GameOver => {
                lines.push((
                    "GAME OVER".to_string(),
                    "bold 32px monospace",
                    COLOR_GAME_OVER,
                ));
                let cause = match game.last_crash() {
                    Some(Crash::Wall) => "You hit the wall",
                    Some(Crash::Body) => "You bit your own tail",
                    None => "You filled the board!",
                };
                lines.push((cause.to_string(), "14px monospace", COLOR_MUTED));
                lines.push((
                    format!("Score {}   Best {}", game.score(), game.high_score()),
                    "18px monospace",
                    COLOR_TEXT,
                ));
                if game.is_new_record() {
                    lines.push((
                        "New high score!".to_string(),
                        "bold 16px monospace",
                        COLOR_BEST,
                    ));
                }
                lines.push((String::new(), "14px monospace", COLOR_TEXT));
                let fact_color = if game.fun_fact_pending() {
                    COLOR_MUTED
                } else {
                    COLOR_TEXT
                };
                for line in wrap_text(game.fun_fact(), FACT_LINE_CHARS) {
                    lines.push((line, "italic 13px monospace", fact_color));
                }
                lines.push((String::new(), "14px monospace", COLOR_TEXT));
                lines.push((
                    "Press R or Play Again to restart".to_string(),
                    "16px monospace",
                    COLOR_HEAD,
                ));
            }
        }

        self.context.set_fill_style_str(COLOR_OVERLAY);
        self.context.fill_rect(0.0, HUD_HEIGHT, width, board);

        self.context.set_text_align("center");
        self.context.set_text_baseline("middle");
        for (text, font, color) in lines {
            self.context.set_font(font);
            self.context.set_fill_style_str(color);
            self.context.fill_text(&text, center_x, y)?;
            y += 24.0;
        }
        Ok(())
    }

    fn draw(&mut self, game: &Game) -> Result<(), JsValue> {
        let width = game.grid().size() as f64 * CELL_SIZE;
        let height = HUD_HEIGHT + width;
        self.resize(width, height)?;

        self.context.set_fill_style_str(COLOR_BACKGROUND);
        self.context.fill_rect(0.0, 0.0, width, height);

        self.draw_hud(game, width)?;
        self.draw_board(game);
        self.draw_food(game)?;
        if game.state() != GameState::Start {
            self.draw_snake(game);
        }
        self.draw_overlay(game, width)
    }
}

impl Renderer for WebRenderer {
    fn init(&mut self) -> io::Result<()> {
        self.setup_keyboard_listener().map_err(js_io_error)?;
        self.setup_touch_listeners().map_err(js_io_error)?;
        self.setup_button_listeners().map_err(js_io_error)?;
        self.last_render_time = self.current_time();
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        let now = self.current_time();

        // Frame rate limiting
        if now - self.last_render_time < TARGET_FRAME_TIME {
            return Ok(());
        }
        self.last_render_time = now;

        self.draw(game).map_err(js_io_error)
    }

    fn cleanup(&mut self) -> io::Result<()> {
        // No cleanup needed for web
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        Ok(self.pending_input.borrow_mut().pop_front())
    }
}
