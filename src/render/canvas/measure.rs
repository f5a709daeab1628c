//! Text measurement through `measureText` on a detached canvas.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::error::Result;
use crate::render::cache::LruCache;
use crate::render::text::TextMeasurer;

const MEASURE_CACHE_CAP: usize = 8192;

/// Measures with the browser's font metrics. Results are cached per
/// `(font, text)` since the same strings come back on every scroll step.
pub struct CanvasTextMeasurer {
    ctx: CanvasRenderingContext2d,
    font: String,
    cache: LruCache<(String, String), f64>,
}

impl CanvasTextMeasurer {
    pub fn new(document: &Document) -> Result<Self> {
        let canvas = document
            .create_element("canvas")
            .map_err(|_| "Failed to create measuring canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "Failed to cast to HtmlCanvasElement")?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| "Failed to get 2d context")?
            .ok_or("No 2d context available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;
        Ok(Self {
            ctx,
            font: String::new(),
            cache: LruCache::new(MEASURE_CACHE_CAP),
        })
    }
}

impl TextMeasurer for CanvasTextMeasurer {
    fn measure(&mut self, text: &str, font: &str) -> f64 {
        let key = (font.to_string(), text.to_string());
        if let Some(width) = self.cache.get(&key) {
            return *width;
        }
        if self.font != font {
            self.ctx.set_font(font);
            self.font = font.to_string();
        }
        let width = self
            .ctx
            .measure_text(text)
            .map(|m| m.width())
            .unwrap_or(0.0);
        self.cache.insert(key, width);
        width
    }
}
