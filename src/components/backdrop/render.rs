//! Canvas drawing for the three backdrop layers.
//!
//! Every pass clears its own surface first; the canvases are transparent and
//! stacked, so each layer only ever touches its own pixels. Coordinates are
//! logical pixels (the surface transform handles the pixel ratio).

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::aurora::AuroraLayers;
use super::grid::ConnectivityGrid;
use super::particles::ParticleField;
use super::theme::{Palette, TRANSPARENT};

/// Gradient radius of a particle relative to its size.
const PARTICLE_GLOW: f64 = 9.0;
const DOT_GLOW_RADIUS: f64 = 6.0;
const DOT_RADIUS: f64 = 2.4;

pub fn draw_aurora(
	ctx: &CanvasRenderingContext2d,
	aurora: &AuroraLayers,
	t: f64,
	palette: &Palette,
	width: f64,
	height: f64,
) {
	ctx.clear_rect(0.0, 0.0, width, height);

	for (i, layer) in aurora.layers.iter().enumerate() {
		let crest = aurora.outline(i, t, width, height);
		if crest.is_empty() {
			continue;
		}
		let top = crest.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
		let bottom = crest.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max) + layer.thickness;

		let alpha = 0.06 + i as f64 * 0.02;
		let gradient = ctx.create_linear_gradient(0.0, top, 0.0, bottom);
		let _ = gradient.add_color_stop(0.0, &palette.primary.with_alpha(0.0).to_css());
		let _ = gradient.add_color_stop(0.3, &palette.primary.with_alpha(alpha).to_css());
		let _ = gradient.add_color_stop(0.7, &palette.secondary.with_alpha(alpha + 0.02).to_css());
		let _ = gradient.add_color_stop(1.0, &TRANSPARENT.to_css());

		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.begin_path();
		let mut points = crest.iter();
		if let Some(&(x, y)) = points.next() {
			ctx.move_to(x, y);
		}
		for &(x, y) in points {
			ctx.line_to(x, y);
		}
		for &(x, y) in crest.iter().rev() {
			ctx.line_to(x, y + layer.thickness);
		}
		ctx.close_path();
		ctx.fill();
	}
}

pub fn draw_particles(ctx: &CanvasRenderingContext2d, field: &ParticleField, palette: &Palette) {
	let (width, height) = field.bounds();
	ctx.clear_rect(0.0, 0.0, width, height);

	let color = palette.primary;
	for p in &field.particles {
		let Ok(gradient) = ctx.create_radial_gradient(p.x, p.y, 0.0, p.x, p.y, p.size * PARTICLE_GLOW)
		else {
			continue;
		};
		let _ = gradient.add_color_stop(0.0, &color.with_alpha(0.9 * p.life).to_css());
		let _ = gradient.add_color_stop(0.6, &color.with_alpha(0.08 * p.life).to_css());
		let _ = gradient.add_color_stop(1.0, &TRANSPARENT.to_css());

		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, p.size, 0.0, PI * 2.0);
		ctx.fill();
	}
}

pub fn draw_grid(
	ctx: &CanvasRenderingContext2d,
	grid: &ConnectivityGrid,
	palette: &Palette,
	width: f64,
	height: f64,
) {
	ctx.clear_rect(0.0, 0.0, width, height);

	ctx.set_line_width(1.0);
	for (i, j, alpha) in grid.visible_links() {
		let (p, q) = (&grid.points[i], &grid.points[j]);
		let gradient = ctx.create_linear_gradient(p.x, p.y, q.x, q.y);
		let _ = gradient.add_color_stop(0.0, &palette.secondary.with_alpha(alpha * 0.3).to_css());
		let _ = gradient.add_color_stop(1.0, &palette.tertiary.with_alpha(alpha * 0.02).to_css());

		#[allow(deprecated)]
		ctx.set_stroke_style(&gradient);
		ctx.begin_path();
		ctx.move_to(p.x, p.y);
		ctx.line_to(q.x, q.y);
		ctx.stroke();
	}

	let color = palette.primary;
	for p in &grid.points {
		let Ok(gradient) = ctx.create_radial_gradient(p.x, p.y, 0.0, p.x, p.y, DOT_GLOW_RADIUS)
		else {
			continue;
		};
		let _ = gradient.add_color_stop(0.0, &color.with_alpha(0.9).to_css());
		let _ = gradient.add_color_stop(1.0, &color.with_alpha(0.0).to_css());

		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, DOT_RADIUS, 0.0, PI * 2.0);
		ctx.fill();
	}
}
