//! Canvas rendering for the editor.
//!
//! Draws in three passes: the background (screen space), then edges and nodes
//! (world space, through the view transform), then the notice banner (screen
//! space again). Selected items are drawn last so they sit on top.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ViewTransform;
use super::theme::Theme;
use super::types::{Frame, FrameEdge, FrameNode};

/// Canvas size and the transform the graph is drawn through.
pub struct Viewport<'a> {
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Pan and zoom.
	pub transform: &'a ViewTransform,
}

/// Renders one frame to the canvas.
pub fn render(
	ctx: &CanvasRenderingContext2d,
	frame: &Frame,
	viewport: &Viewport<'_>,
	node_radius: f64,
	theme: &Theme,
	notice: Option<&str>,
) {
	draw_background(ctx, viewport, theme);

	let t = viewport.transform;
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);

	draw_edges(ctx, frame, t.k, theme);
	draw_nodes(ctx, frame, node_radius, t.k, theme);

	ctx.restore();

	if let Some(text) = notice {
		draw_notice(ctx, viewport, theme, text);
	}
}

fn draw_background(ctx: &CanvasRenderingContext2d, viewport: &Viewport<'_>, theme: &Theme) {
	let (w, h) = (viewport.width, viewport.height);
	match ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w.max(h) * 0.8) {
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(&theme.background.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_edges(ctx: &CanvasRenderingContext2d, frame: &Frame, k: f64, theme: &Theme) {
	let (plain, selected): (Vec<&FrameEdge>, Vec<&FrameEdge>) =
		frame.edges.iter().partition(|e| !e.selected);

	ctx.set_stroke_style_str(&theme.edge.to_css());
	ctx.set_line_width(theme.edge_width / k.max(0.5));
	for edge in plain {
		draw_edge_line(ctx, edge);
	}

	if !selected.is_empty() {
		ctx.set_stroke_style_str(&theme.selection.to_css());
		ctx.set_line_width(theme.edge_width * 2.0 / k.max(0.5));
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(8.0 / k),
			&JsValue::from_f64(4.0 / k),
		));
		for edge in selected {
			draw_edge_line(ctx, edge);
		}
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
}

fn draw_edge_line(ctx: &CanvasRenderingContext2d, edge: &FrameEdge) {
	ctx.begin_path();
	ctx.move_to(edge.x1, edge.y1);
	ctx.line_to(edge.x2, edge.y2);
	ctx.stroke();
}

fn draw_nodes(ctx: &CanvasRenderingContext2d, frame: &Frame, radius: f64, k: f64, theme: &Theme) {
	ctx.set_font("13px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	// Selected node last so its ring is not covered by neighbours.
	let ordered = frame
		.nodes
		.iter()
		.enumerate()
		.filter(|(_, n)| !n.selected)
		.chain(frame.nodes.iter().enumerate().filter(|(_, n)| n.selected));

	for (i, node) in ordered {
		draw_node(ctx, node, radius, theme, i);
		if node.selected {
			ctx.begin_path();
			let _ = ctx.arc(node.x, node.y, radius + 4.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&theme.selection.to_css());
			ctx.set_line_width(3.0 / k);
			ctx.stroke();
		}
	}
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &FrameNode,
	radius: f64,
	theme: &Theme,
	index: usize,
) {
	let (x, y) = (node.x, node.y);
	let base = theme.palette.get(index);

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	match ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius) {
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &base.to_css());
			let _ = gradient.add_color_stop(1.0, &base.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(&base.to_css()),
	}
	ctx.fill();

	ctx.set_fill_style_str(&theme.label.to_css());
	let _ = ctx.fill_text_with_max_width(&node.name, x, y, radius * 1.8);
}

fn draw_notice(ctx: &CanvasRenderingContext2d, viewport: &Viewport<'_>, theme: &Theme, text: &str) {
	let (height, pad) = (32.0, 12.0);
	ctx.set_fill_style_str(&theme.notice_background.to_css());
	ctx.fill_rect(0.0, viewport.height - height, viewport.width, height);

	ctx.set_font("13px sans-serif");
	ctx.set_text_align("left");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(&theme.notice_text.to_css());
	let _ = ctx.fill_text(text, pad, viewport.height - height / 2.0);
}
