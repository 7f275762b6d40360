//! Platform helpers
//!
//! Canvas fitting, URL query parsing and browser storage. The pure pieces
//! are testable natively; the DOM side is WASM only.

pub mod storage;

use crate::config::Variant;

/// CSS size that fits a `game_w` x `game_h` canvas inside the window while
/// keeping its aspect ratio
pub fn fit_canvas(window_w: f64, window_h: f64, game_w: f64, game_h: f64) -> (f64, f64) {
    let window_ratio = window_w / window_h;
    let game_ratio = game_w / game_h;
    if window_ratio < game_ratio {
        (window_w, window_w / game_ratio)
    } else {
        (window_h * game_ratio, window_h)
    }
}

/// Read `variant=` from a URL query string such as `?variant=scoring`
pub fn variant_from_query(search: &str) -> Option<Variant> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "variant")
        .and_then(|(_, value)| Variant::from_str(value))
}

/// Resize the canvas element's CSS box to fit the window
#[cfg(target_arch = "wasm32")]
pub fn apply_canvas_fit(canvas: &web_sys::HtmlCanvasElement, game_w: f64, game_h: f64) {
    use wasm_bindgen::JsCast;

    let Some(window) = web_sys::window() else {
        return;
    };
    let window_w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(game_w);
    let window_h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(game_h);

    let (css_w, css_h) = fit_canvas(window_w, window_h, game_w, game_h);
    if let Some(el) = canvas.dyn_ref::<web_sys::HtmlElement>() {
        let style = el.style();
        let _ = style.set_property("width", &format!("{}px", css_w));
        let _ = style.set_property("height", &format!("{}px", css_h));
    }
}
