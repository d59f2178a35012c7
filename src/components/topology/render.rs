//! Canvas rendering for the topology view.
//!
//! Draws the glyphs bound in [`CanvasView`] in z-order:
//! 1. Background (screen space)
//! 2. Link lines and arrowheads (world space)
//! 3. Interface labels near each link end
//! 4. Nodes with their labels on top

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::CanvasState;
use super::theme::{Color, Theme};
use super::view::{CanvasView, LinkGlyph, NodeGlyph};

/// Renders the complete topology to the canvas.
pub fn render(
	view: &CanvasView,
	state: &CanvasState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	for glyph in view.links().iter().filter(|g| g.visible) {
		draw_link(ctx, glyph, &scale, theme);
	}
	if scale.link_label_alpha > 0.01 {
		for glyph in view.links().iter().filter(|g| g.visible) {
			let (src_at, dst_at) = view.label_points(glyph);
			draw_interface_label(ctx, &glyph.src_label, src_at, &scale, theme);
			draw_interface_label(ctx, &glyph.dst_label, dst_at, &scale, theme);
		}
	}
	for glyph in view.nodes().iter().filter(|g| g.placed) {
		draw_node(ctx, glyph, &scale, theme);
	}

	ctx.restore();
}

fn draw_background(state: &CanvasState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gradient = theme
		.background
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				state.width.max(state.height) * 0.8,
			)
			.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_link(
	ctx: &CanvasRenderingContext2d,
	glyph: &LinkGlyph,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let ((x1, y1), (x2, y2)) = (glyph.from, glyph.to);
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < scale.node_radius * 2.0 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let color = theme.link.color.to_css();

	ctx.set_stroke_style_str(&color);
	ctx.set_line_width(scale.line_width);
	ctx.begin_path();
	ctx.move_to(x1 + ux * scale.node_radius, y1 + uy * scale.node_radius);
	ctx.line_to(
		x2 - ux * (scale.node_radius + scale.arrow_size),
		y2 - uy * (scale.node_radius + scale.arrow_size),
	);
	ctx.stroke();

	let (tip_x, tip_y) = (x2 - ux * scale.node_radius, y2 - uy * scale.node_radius);
	let (back_x, back_y) = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);
	let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);

	ctx.set_fill_style_str(&color);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_interface_label(
	ctx: &CanvasRenderingContext2d,
	text: &str,
	(x, y): (f64, f64),
	scale: &ScaledValues,
	theme: &Theme,
) {
	if text.is_empty() {
		return;
	}
	let alpha = scale.link_label_alpha;

	ctx.set_font(&scale.link_label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	ctx.set_line_width(3.0 / scale.k);
	ctx.set_stroke_style_str(&theme.link.label_halo.with_alpha(theme.link.label_halo.a * alpha).to_css());
	let _ = ctx.stroke_text(text, x, y);

	ctx.set_fill_style_str(&theme.link.label_color.with_alpha(theme.link.label_color.a * alpha).to_css());
	let _ = ctx.fill_text(text, x, y);
}

fn draw_node(ctx: &CanvasRenderingContext2d, glyph: &NodeGlyph, scale: &ScaledValues, theme: &Theme) {
	let (x, y, radius) = (glyph.x, glyph.y, scale.node_radius);
	let base = glyph
		.color
		.as_deref()
		.and_then(Color::from_hex)
		.unwrap_or(theme.node.fill);

	let gradient = ctx
		.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
		.ok();
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(1.0, &base.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&base.to_css()),
	}
	ctx.fill();

	if theme.node.border_width > 0.0 {
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width / scale.k);
		ctx.stroke();
	}

	if glyph.pinned {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 3.0 / scale.k, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.node.pinned_ring.to_css());
		ctx.set_line_width(1.5 / scale.k);
		ctx.stroke();
	}

	ctx.set_font(&scale.node_label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("alphabetic");
	ctx.set_fill_style_str(&theme.node.label_color.to_css());
	let _ = ctx.fill_text(&glyph.label, x, y - scale.node_label_offset);
}
