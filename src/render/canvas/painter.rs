//! Paint scene subtrees onto a 2D context.

use web_sys::CanvasRenderingContext2d;

use crate::error::{GridError, Result};
use crate::render::scene::{
    GroupAttrs, NodeId, PolygonAttrs, RectAttrs, Scene, Shape, TextAttrs,
};
use crate::types::{Align, VerticalAlign};

fn js_err(what: &str, e: &wasm_bindgen::JsValue) -> GridError {
    GridError::Render(format!("{what}: {e:?}"))
}

/// Paint `id` and its children in child order.
pub(super) fn paint_node(ctx: &CanvasRenderingContext2d, scene: &Scene, id: NodeId) -> Result<()> {
    let Some(node) = scene.get(id) else {
        return Ok(());
    };
    if !node.visible {
        return Ok(());
    }
    match &node.shape {
        Shape::Group(group) => paint_group(ctx, scene, group, node.children()),
        Shape::Rect(rect) => {
            paint_rect(ctx, rect);
            Ok(())
        }
        Shape::Text(text) => paint_text(ctx, text),
        Shape::Polygon(polygon) => {
            paint_polygon(ctx, polygon);
            Ok(())
        }
    }
}

fn paint_group(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene,
    group: &GroupAttrs,
    children: &[NodeId],
) -> Result<()> {
    ctx.save();
    let result = (|| {
        ctx.translate(group.x, group.y)
            .map_err(|e| js_err("translate", &e))?;
        if let Some(clip) = group.clip {
            ctx.begin_path();
            ctx.rect(clip.x, clip.y, clip.width, clip.height);
            ctx.clip();
        }
        for child in children {
            paint_node(ctx, scene, *child)?;
        }
        Ok(())
    })();
    ctx.restore();
    result
}

fn rounded_path(ctx: &CanvasRenderingContext2d, rect: &RectAttrs) {
    let r = rect.corner_radius.min(rect.width / 2.0).min(rect.height / 2.0);
    let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.quadratic_curve_to(x + w, y, x + w, y + r);
    ctx.line_to(x + w, y + h - r);
    ctx.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
    ctx.line_to(x + r, y + h);
    ctx.quadratic_curve_to(x, y + h, x, y + h - r);
    ctx.line_to(x, y + r);
    ctx.quadratic_curve_to(x, y, x + r, y);
    ctx.close_path();
}

fn paint_rect(ctx: &CanvasRenderingContext2d, rect: &RectAttrs) {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return;
    }
    if rect.corner_radius > 0.0 {
        rounded_path(ctx, rect);
        if let Some(fill) = &rect.fill {
            ctx.set_fill_style_str(fill);
            ctx.fill();
        }
        if let Some(stroke) = rect.stroke.as_ref().filter(|_| rect.stroke_width > 0.0) {
            ctx.set_stroke_style_str(stroke);
            ctx.set_line_width(rect.stroke_width);
            ctx.stroke();
        }
        return;
    }

    if let Some(fill) = &rect.fill {
        ctx.set_fill_style_str(fill);
        ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }
    if let Some(stroke) = rect.stroke.as_ref().filter(|_| rect.stroke_width > 0.0) {
        ctx.set_stroke_style_str(stroke);
        ctx.set_line_width(rect.stroke_width);
        // Half-pixel offset keeps 1px borders crisp.
        ctx.stroke_rect(
            rect.x.floor() + 0.5,
            rect.y.floor() + 0.5,
            rect.width,
            rect.height,
        );
    }
}

fn paint_text(ctx: &CanvasRenderingContext2d, text: &TextAttrs) -> Result<()> {
    if text.text.is_empty() || text.width <= 0.0 {
        return Ok(());
    }
    ctx.save();
    ctx.begin_path();
    ctx.rect(text.x, text.y, text.width, text.height);
    ctx.clip();
    ctx.set_font(&text.font);
    ctx.set_fill_style_str(&text.fill);
    ctx.set_text_align(match text.align {
        Align::Left => "left",
        Align::Center => "center",
        Align::Right => "right",
    });
    ctx.set_text_baseline(match text.vertical_align {
        VerticalAlign::Top => "top",
        VerticalAlign::Middle => "middle",
        VerticalAlign::Bottom => "bottom",
    });
    let result = ctx
        .fill_text(&text.text, text.anchor_x(), text.anchor_y())
        .map_err(|e| js_err("fill_text", &e));
    ctx.restore();
    result
}

fn paint_polygon(ctx: &CanvasRenderingContext2d, polygon: &PolygonAttrs) {
    let mut points = polygon.points.iter();
    let Some((x0, y0)) = points.next() else {
        return;
    };
    ctx.begin_path();
    ctx.move_to(*x0, *y0);
    for (x, y) in points {
        ctx.line_to(*x, *y);
    }
    ctx.close_path();
    if let Some(fill) = &polygon.fill {
        ctx.set_fill_style_str(fill);
        ctx.fill();
    }
    if let Some(stroke) = polygon.stroke.as_ref().filter(|_| polygon.stroke_width > 0.0) {
        ctx.set_stroke_style_str(stroke);
        ctx.set_line_width(polygon.stroke_width);
        ctx.stroke();
    }
}
