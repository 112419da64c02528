//! Connectivity grid for the front layer.
//!
//! Points sit on a jittered lattice and wobble around their anchors. The
//! neighbor graph is a proximity graph computed once per layout; it is
//! quadratic in the number of points, so it is rebuilt only by
//! [`ConnectivityGrid::initialize`] and never per frame.

use std::f64::consts::TAU;

use super::random::Random;

/// Bounds on the column count accepted by [`ConnectivityGrid::initialize`].
pub const COLUMN_RANGE: (usize, usize) = (2, 80);
pub const MIN_ROWS: usize = 6;
/// Maximum per-axis distance between a point and its anchor.
pub const JITTER_AMPLITUDE: f64 = 4.0;
/// Random offset applied to every anchor at layout time.
const LAYOUT_JITTER: f64 = 18.0;
/// Neighbor threshold as a fraction of the larger surface dimension.
const NEIGHBOR_FRACTION: f64 = 1.0 / 6.0;
/// Links fade out completely at this fraction of the surface width.
const LINK_FADE_FRACTION: f64 = 1.0 / 3.0;
const LINK_MAX_ALPHA: f64 = 0.6;

/// One lattice point.
#[derive(Clone, Debug)]
pub struct GridPoint {
	/// Anchor (rest) position.
	pub ox: f64,
	pub oy: f64,
	/// Displayed position.
	pub x: f64,
	pub y: f64,
	pub phase: f64,
	/// Indices of connected points. Symmetric across the grid.
	pub neighbors: Vec<usize>,
}

/// Opacity of a link between two points `distance` apart.
pub fn link_alpha(distance: f64, width: f64) -> f64 {
	let fade = width * LINK_FADE_FRACTION;
	if fade <= 0.0 {
		return 0.0;
	}
	(1.0 - distance / fade).clamp(0.0, LINK_MAX_ALPHA)
}

/// Owns the lattice and its neighbor graph.
pub struct ConnectivityGrid {
	pub points: Vec<GridPoint>,
	columns: usize,
	rows: usize,
	width: f64,
	height: f64,
	rng: Random,
}

impl ConnectivityGrid {
	pub fn new(width: f64, height: f64, rng: Random) -> Self {
		Self {
			points: Vec::new(),
			columns: 0,
			rows: 0,
			width,
			height,
			rng,
		}
	}

	pub fn columns(&self) -> usize {
		self.columns
	}

	pub fn rows(&self) -> usize {
		self.rows
	}

	pub fn set_bounds(&mut self, width: f64, height: f64) {
		self.width = width.max(0.0);
		self.height = height.max(0.0);
	}

	/// Row count for a given column count and surface aspect ratio.
	pub fn rows_for(columns: usize, width: f64, height: f64) -> usize {
		if width <= 0.0 {
			return MIN_ROWS;
		}
		let rows = (columns as f64 * height / width).round() as usize;
		rows.max(MIN_ROWS)
	}

	/// Lay out a fresh lattice and rebuild the neighbor graph.
	pub fn initialize(&mut self, columns: usize) {
		let columns = columns.clamp(COLUMN_RANGE.0, COLUMN_RANGE.1);
		let rows = Self::rows_for(columns, self.width, self.height);
		let (w, h) = (self.width, self.height);

		self.points.clear();
		self.points.reserve(columns * rows);
		for r in 0..rows {
			for c in 0..columns {
				let x = c as f64 / (columns - 1) as f64 * w
					+ self.rng.range(-LAYOUT_JITTER, LAYOUT_JITTER);
				let y = r as f64 / (rows - 1) as f64 * h
					+ self.rng.range(-LAYOUT_JITTER, LAYOUT_JITTER);
				self.points.push(GridPoint {
					ox: x,
					oy: y,
					x,
					y,
					phase: self.rng.range(0.0, TAU),
					neighbors: Vec::new(),
				});
			}
		}
		self.columns = columns;
		self.rows = rows;
		self.connect();

		log::debug!(
			"auroraverse: grid {}x{} with {} links",
			columns,
			rows,
			self.link_count()
		);
	}

	fn connect(&mut self) {
		let threshold = self.width.max(self.height) * NEIGHBOR_FRACTION;
		let n = self.points.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (p, q) = (&self.points[i], &self.points[j]);
				if (p.x - q.x).hypot(p.y - q.y) < threshold {
					self.points[i].neighbors.push(j);
					self.points[j].neighbors.push(i);
				}
			}
		}
	}

	/// Number of undirected links.
	pub fn link_count(&self) -> usize {
		self.points.iter().map(|p| p.neighbors.len()).sum::<usize>() / 2
	}

	/// Wobble every point around its anchor.
	pub fn step(&mut self) {
		for (i, p) in self.points.iter_mut().enumerate() {
			let fi = i as f64;
			p.phase += 0.002 + (i % 3) as f64 * 0.0002;
			p.x = p.ox + (p.phase * 1.3 + fi).sin() * JITTER_AMPLITUDE;
			p.y = p.oy + (p.phase * 1.1 + fi).cos() * JITTER_AMPLITUDE;
		}
	}

	/// Visible links as `(i, j, alpha)` with `i < j`, using current positions.
	pub fn visible_links(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
		self.points.iter().enumerate().flat_map(move |(i, p)| {
			p.neighbors
				.iter()
				.copied()
				.filter(move |&j| j > i)
				.filter_map(move |j| {
					let q = &self.points[j];
					let alpha = link_alpha((p.x - q.x).hypot(p.y - q.y), self.width);
					(alpha > 0.0).then_some((i, j, alpha))
				})
		})
	}

	/// Nudge every anchor by up to `jitter` per axis. The neighbor graph is
	/// left as is until the next [`initialize`](Self::initialize).
	pub fn relocate_anchors(&mut self, jitter: f64) {
		let jitter = jitter.abs();
		for p in &mut self.points {
			p.ox += self.rng.range(-jitter, jitter);
			p.oy += self.rng.range(-jitter, jitter);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn grid(w: f64, h: f64, columns: usize) -> ConnectivityGrid {
		let mut g = ConnectivityGrid::new(w, h, Random::seeded(4));
		g.initialize(columns);
		g
	}

	#[test]
	fn full_hd_layout_dimensions() {
		let g = grid(1920.0, 1080.0, 22);
		assert_eq!(g.rows(), 12);
		assert_eq!(g.columns(), 22);
		assert_eq!(g.points.len(), 264);
	}

	#[test]
	fn short_surfaces_keep_min_rows() {
		let g = grid(1920.0, 200.0, 22);
		assert_eq!(g.rows(), MIN_ROWS);
		assert_eq!(g.points.len(), 22 * MIN_ROWS);
	}

	#[test]
	fn column_count_is_clamped() {
		let g = grid(800.0, 600.0, 0);
		assert_eq!(g.columns(), COLUMN_RANGE.0);
		let g = grid(800.0, 600.0, 1_000);
		assert_eq!(g.columns(), COLUMN_RANGE.1);
	}

	#[test]
	fn neighbor_graph_is_symmetric_and_irreflexive() {
		let g = grid(1280.0, 720.0, 18);
		assert!(g.link_count() > 0);
		for (i, p) in g.points.iter().enumerate() {
			assert!(!p.neighbors.contains(&i));
			for &j in &p.neighbors {
				assert!(g.points[j].neighbors.contains(&i), "{i} -> {j} not mirrored");
			}
		}
	}

	#[test]
	fn neighbors_respect_threshold() {
		let g = grid(1000.0, 800.0, 12);
		let threshold = 1000.0 / 6.0;
		for (i, p) in g.points.iter().enumerate() {
			for (j, q) in g.points.iter().enumerate() {
				if i == j {
					continue;
				}
				let d = (p.x - q.x).hypot(p.y - q.y);
				assert_eq!(p.neighbors.contains(&j), d < threshold);
			}
		}
	}

	#[test]
	fn step_keeps_points_near_anchor() {
		let mut g = grid(1920.0, 1080.0, 22);
		for _ in 0..5_000 {
			g.step();
			for p in &g.points {
				assert!((p.x - p.ox).abs() <= JITTER_AMPLITUDE + 1e-9);
				assert!((p.y - p.oy).abs() <= JITTER_AMPLITUDE + 1e-9);
			}
		}
	}

	#[test]
	fn relocation_moves_anchors_but_keeps_graph() {
		let mut g = grid(1280.0, 720.0, 16);
		let before: Vec<(f64, f64, Vec<usize>)> = g
			.points
			.iter()
			.map(|p| (p.ox, p.oy, p.neighbors.clone()))
			.collect();
		g.relocate_anchors(40.0);
		let mut moved = 0;
		for (p, (ox, oy, n)) in g.points.iter().zip(before) {
			assert!((p.ox - ox).abs() <= 40.0);
			assert!((p.oy - oy).abs() <= 40.0);
			assert_eq!(p.neighbors, n);
			if p.ox != ox || p.oy != oy {
				moved += 1;
			}
		}
		assert!(moved > 0);

		g.step();
		for p in &g.points {
			assert!((p.x - p.ox).abs() <= JITTER_AMPLITUDE + 1e-9);
		}
	}

	#[test]
	fn link_alpha_fades_and_caps() {
		assert_eq!(link_alpha(0.0, 900.0), LINK_MAX_ALPHA);
		assert!((link_alpha(150.0, 900.0) - 0.5).abs() < 1e-9);
		assert_eq!(link_alpha(300.0, 900.0), 0.0);
		assert_eq!(link_alpha(1_000.0, 900.0), 0.0);
		assert_eq!(link_alpha(10.0, 0.0), 0.0);
	}

	#[test]
	fn visible_links_are_unique_and_positive() {
		let mut g = grid(1280.0, 720.0, 20);
		g.step();
		let links: Vec<_> = g.visible_links().collect();
		assert!(!links.is_empty());
		for &(i, j, a) in &links {
			assert!(i < j);
			assert!(a > 0.0 && a <= LINK_MAX_ALPHA);
		}
		assert!(links.len() <= g.link_count());
	}
}
