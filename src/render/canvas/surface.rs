//! Stacked layer canvases implementing [`RenderBackend`].

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use super::painter::paint_node;
use crate::error::Result;
use crate::render::backend::RenderBackend;
use crate::render::compositor::{LayerKind, PAINT_ORDER};
use crate::render::scene::{NodeId, Scene};

struct LayerCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl LayerCanvas {
    fn new(document: &Document, layer: LayerKind) -> Result<Self> {
        let canvas = document
            .create_element("canvas")
            .map_err(|_| "Failed to create canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "Failed to cast to HtmlCanvasElement")?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| "Failed to get 2d context")?
            .ok_or("No 2d context available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;

        let style = canvas.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("left", "0px");
        let _ = style.set_property("top", "0px");
        let _ = style.set_property("pointer-events", "none");
        let _ = style.set_property("z-index", &layer.z_index().to_string());
        canvas.set_class_name(&format!("vgrid-layer vgrid-layer-{}", layer.name()));

        Ok(Self { canvas, ctx })
    }
}

/// One canvas per layer inside a host container, in paint order.
pub struct CanvasSurface {
    container: HtmlElement,
    layers: Vec<(LayerKind, LayerCanvas)>,
    width: f64,
    height: f64,
    dpr: f64,
}

impl CanvasSurface {
    /// Create the layer canvases and append them to `container`.
    pub fn new(document: &Document, container: HtmlElement) -> Result<Self> {
        let _ = container.style().set_property("position", "relative");
        let mut layers = Vec::with_capacity(PAINT_ORDER.len());
        for layer in PAINT_ORDER {
            let canvas = LayerCanvas::new(document, layer)?;
            container
                .append_child(&canvas.canvas)
                .map_err(|_| "Failed to attach layer canvas")?;
            layers.push((layer, canvas));
        }
        Ok(Self {
            container,
            layers,
            width: 0.0,
            height: 0.0,
            dpr: 1.0,
        })
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    /// Remove the layer canvases from the container.
    pub fn detach(&self) {
        for (_, layer) in &self.layers {
            layer.canvas.remove();
        }
    }
}

impl RenderBackend for CanvasSurface {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;
        let physical_w = (width * dpr).round().max(0.0) as u32;
        let physical_h = (height * dpr).round().max(0.0) as u32;

        for (_, layer) in &self.layers {
            let style = layer.canvas.style();
            let _ = style.set_property("width", &format!("{width}px"));
            let _ = style.set_property("height", &format!("{height}px"));
            // Setting the buffer size resets the context transform
            layer.canvas.set_width(physical_w);
            layer.canvas.set_height(physical_h);
            let _ = layer.ctx.scale(dpr, dpr);
        }
    }

    fn paint_layer(&mut self, layer: LayerKind, scene: &Scene, root: NodeId) -> Result<()> {
        let Some((_, target)) = self.layers.iter().find(|(kind, _)| *kind == layer) else {
            return Ok(());
        };
        target.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        paint_node(&target.ctx, scene, root)
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }
}
