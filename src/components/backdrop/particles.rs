//! Drifting particle field for the middle backdrop layer.

use super::random::Random;

/// Particles may drift this far past an edge before wrapping around.
pub const WRAP_MARGIN: f64 = 30.0;
/// Lower bound for [`ParticleField::initialize`].
pub const MIN_PARTICLES: usize = 150;
/// Bounds for [`ParticleField::resize_to_target`].
pub const TARGET_RANGE: (usize, usize) = (120, 4000);
/// Viewport area (logical px²) per particle.
const AREA_PER_PARTICLE: f64 = 14_000.0;
/// Time scale of the breathing drift, per millisecond.
const DRIFT_RATE: f64 = 0.001;
/// Half-width of the square around the burst center where particles appear.
const BURST_SPREAD: f64 = 160.0;
const BURST_SPEED: f64 = 3.0;

/// Housekeeping: never trim below this population.
const TRIM_FLOOR: usize = 3000;
/// Housekeeping: trimming starts above `base * TRIM_CAP_FACTOR`.
const TRIM_CAP_FACTOR: f64 = 2.0;
/// Housekeeping: a trim leaves `base * TRIM_KEEP_FACTOR` particles.
const TRIM_KEEP_FACTOR: f64 = 1.6;

/// A single floating particle.
#[derive(Clone, Debug)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub size: f64,
	/// Brightness in `[0, 1]`.
	pub life: f64,
}

/// Owns the particle population and its bounds.
pub struct ParticleField {
	pub particles: Vec<Particle>,
	width: f64,
	height: f64,
	base_count: usize,
	rng: Random,
}

impl ParticleField {
	pub fn new(width: f64, height: f64, rng: Random) -> Self {
		Self {
			particles: Vec::new(),
			width,
			height,
			base_count: 0,
			rng,
		}
	}

	/// Particle count suited to a viewport of the given logical size.
	pub fn count_for_viewport(width: f64, height: f64) -> usize {
		((width.max(0.0) * height.max(0.0) / AREA_PER_PARTICLE).floor() as usize)
			.max(MIN_PARTICLES)
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn bounds(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// The count chosen at the last [`initialize`](Self::initialize).
	pub fn base_count(&self) -> usize {
		self.base_count
	}

	pub fn set_bounds(&mut self, width: f64, height: f64) {
		self.width = width.max(0.0);
		self.height = height.max(0.0);
	}

	/// Discards everything and seeds `count` fresh particles (at least
	/// [`MIN_PARTICLES`]).
	pub fn initialize(&mut self, count: usize) {
		let count = count.max(MIN_PARTICLES);
		self.particles.clear();
		self.particles.reserve(count);
		for _ in 0..count {
			let life = self.rng.unit();
			let p = self.spawn_ambient(life);
			self.particles.push(p);
		}
		self.base_count = count;
	}

	fn spawn_ambient(&mut self, life: f64) -> Particle {
		let rng = &mut self.rng;
		Particle {
			x: rng.range(0.0, self.width),
			y: rng.range(0.0, self.height),
			vx: rng.range(-0.3, 0.3),
			vy: rng.range(-0.2, 0.2),
			size: rng.range(0.6, 3.0),
			life,
		}
	}

	/// Advance every particle by one frame.
	///
	/// Velocity is modulated by `1 + sin/cos(t + size)` so the drift breathes
	/// instead of moving at constant speed. Particles that leave the surface
	/// by more than [`WRAP_MARGIN`] reappear at the opposite edge.
	pub fn step(&mut self, timestamp: f64) {
		let t = timestamp * DRIFT_RATE;
		let (w, h) = (self.width, self.height);
		for p in &mut self.particles {
			p.x += p.vx * (1.0 + (t + p.size).sin());
			p.y += p.vy * (1.0 + (t + p.size).cos());

			if p.x < -WRAP_MARGIN {
				p.x = w + WRAP_MARGIN;
			} else if p.x > w + WRAP_MARGIN {
				p.x = -WRAP_MARGIN;
			}
			if p.y < -WRAP_MARGIN {
				p.y = h + WRAP_MARGIN;
			} else if p.y > h + WRAP_MARGIN {
				p.y = -WRAP_MARGIN;
			}
		}
	}

	/// Grow by appending fresh particles or shrink by dropping from the end
	/// until exactly `target` (clamped to [`TARGET_RANGE`]) remain.
	pub fn resize_to_target(&mut self, target: usize) -> usize {
		let target = target.clamp(TARGET_RANGE.0, TARGET_RANGE.1);
		if self.particles.len() > target {
			self.particles.truncate(target);
		}
		while self.particles.len() < target {
			let p = self.spawn_ambient(1.0);
			self.particles.push(p);
		}
		target
	}

	/// Append `count` fast particles scattered around `center`.
	pub fn burst(&mut self, center: (f64, f64), count: usize) {
		let rng = &mut self.rng;
		self.particles.extend((0..count).map(|_| Particle {
			x: center.0 + rng.range(-BURST_SPREAD, BURST_SPREAD),
			y: center.1 + rng.range(-BURST_SPREAD, BURST_SPREAD),
			vx: rng.range(-BURST_SPEED, BURST_SPEED),
			vy: rng.range(-BURST_SPEED, BURST_SPEED),
			size: rng.range(1.0, 3.0),
			life: 1.0,
		}));
	}

	/// Scale every particle's velocity.
	pub fn boost(&mut self, fx: f64, fy: f64) {
		for p in &mut self.particles {
			p.vx *= fx;
			p.vy *= fy;
		}
	}

	/// Periodic housekeeping.
	///
	/// Once the population exceeds `max(3000, base * 2)`, the oldest particles
	/// are dropped until `floor(base * 1.6)` remain. Returns how many were
	/// removed.
	pub fn trim(&mut self) -> usize {
		let cap = TRIM_FLOOR.max((self.base_count as f64 * TRIM_CAP_FACTOR) as usize);
		if self.particles.len() <= cap {
			return 0;
		}
		let keep = (self.base_count as f64 * TRIM_KEEP_FACTOR).floor() as usize;
		let excess = self.particles.len().saturating_sub(keep);
		self.particles.drain(..excess);
		excess
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn field(w: f64, h: f64) -> ParticleField {
		ParticleField::new(w, h, Random::seeded(11))
	}

	fn assert_in_bounds(f: &ParticleField) {
		let (w, h) = f.bounds();
		for p in &f.particles {
			assert!(p.x >= -WRAP_MARGIN && p.x <= w + WRAP_MARGIN, "x out of bounds: {}", p.x);
			assert!(p.y >= -WRAP_MARGIN && p.y <= h + WRAP_MARGIN, "y out of bounds: {}", p.y);
		}
	}

	#[test]
	fn initialize_seeds_inside_surface() {
		let mut f = field(800.0, 600.0);
		f.initialize(300);
		assert_eq!(f.len(), 300);
		assert_eq!(f.base_count(), 300);
		for p in &f.particles {
			assert!((0.0..800.0).contains(&p.x));
			assert!((0.0..600.0).contains(&p.y));
			assert!((0.6..3.0).contains(&p.size));
			assert!((0.0..=1.0).contains(&p.life));
		}
	}

	#[test]
	fn initialize_enforces_floor() {
		let mut f = field(800.0, 600.0);
		f.initialize(3);
		assert_eq!(f.len(), MIN_PARTICLES);
	}

	#[test]
	fn viewport_count() {
		assert_eq!(ParticleField::count_for_viewport(1920.0, 1080.0), 150);
		assert_eq!(ParticleField::count_for_viewport(3840.0, 2160.0), 592);
		assert_eq!(ParticleField::count_for_viewport(0.0, 0.0), MIN_PARTICLES);
	}

	#[test]
	fn stepping_keeps_particles_wrapped() {
		let mut f = field(320.0, 240.0);
		f.initialize(200);
		f.burst((160.0, 120.0), 60);
		f.boost(4.0, 4.0);
		for frame in 0..2_000 {
			f.step(frame as f64 * 16.7);
			assert_in_bounds(&f);
		}
	}

	#[test]
	fn escaped_particle_wraps_to_opposite_edge() {
		let mut f = field(100.0, 100.0);
		f.particles.push(Particle {
			x: 129.0,
			y: 50.0,
			vx: 5.0,
			vy: 0.0,
			size: 1.0,
			life: 1.0,
		});
		// sin(0 + 1) > 0, so the particle moves right past the margin.
		f.step(0.0);
		assert_eq!(f.particles[0].x, -WRAP_MARGIN);
	}

	#[test]
	fn resize_to_target_is_exact_and_idempotent() {
		let mut f = field(1920.0, 1080.0);
		f.initialize(150);
		f.resize_to_target(4000);
		assert_eq!(f.len(), 4000);
		f.resize_to_target(4000);
		assert_eq!(f.len(), 4000);
		f.resize_to_target(120);
		assert_eq!(f.len(), 120);
		f.resize_to_target(120);
		assert_eq!(f.len(), 120);
	}

	#[test]
	fn resize_to_target_clamps() {
		let mut f = field(640.0, 480.0);
		f.initialize(150);
		assert_eq!(f.resize_to_target(10), 120);
		assert_eq!(f.len(), 120);
		assert_eq!(f.resize_to_target(100_000), 4000);
		assert_eq!(f.len(), 4000);
	}

	#[test]
	fn shrinking_drops_from_the_end() {
		let mut f = field(640.0, 480.0);
		f.initialize(200);
		let head: Vec<f64> = f.particles[..120].iter().map(|p| p.x).collect();
		f.resize_to_target(120);
		let kept: Vec<f64> = f.particles.iter().map(|p| p.x).collect();
		assert_eq!(head, kept);
	}

	#[test]
	fn burst_appends_around_center() {
		let mut f = field(1000.0, 800.0);
		f.initialize(150);
		f.burst((500.0, 400.0), 60);
		assert_eq!(f.len(), 210);
		for p in &f.particles[150..] {
			assert!((p.x - 500.0).abs() <= BURST_SPREAD);
			assert!((p.y - 400.0).abs() <= BURST_SPREAD);
			assert_eq!(p.life, 1.0);
		}
	}

	#[test]
	fn boost_scales_velocity() {
		let mut f = field(100.0, 100.0);
		f.initialize(150);
		let before: Vec<(f64, f64)> = f.particles.iter().map(|p| (p.vx, p.vy)).collect();
		f.boost(1.3, 1.2);
		for (p, (vx, vy)) in f.particles.iter().zip(before) {
			assert!((p.vx - vx * 1.3).abs() < 1e-12);
			assert!((p.vy - vy * 1.2).abs() < 1e-12);
		}
	}

	#[test]
	fn trim_below_cap_is_noop() {
		let mut f = field(1920.0, 1080.0);
		f.initialize(150);
		f.resize_to_target(3000);
		assert_eq!(f.trim(), 0);
		assert_eq!(f.len(), 3000);
	}

	#[test]
	fn trim_drops_oldest_down_to_keep_factor() {
		let mut f = field(1920.0, 1080.0);
		f.initialize(150);
		f.burst((960.0, 540.0), 4850);
		assert_eq!(f.len(), 5000);
		let newest_x = f.particles.last().map(|p| p.x);

		let removed = f.trim();

		assert_eq!(f.len(), 240);
		assert_eq!(removed, 4760);
		assert_eq!(f.particles.last().map(|p| p.x), newest_x);
	}

	#[test]
	fn trim_uses_scaled_cap_for_large_bases() {
		let mut f = field(4000.0, 4000.0);
		f.initialize(2000);
		f.burst((0.0, 0.0), 2100);
		assert_eq!(f.len(), 4100);
		f.trim();
		assert_eq!(f.len(), 3200);
	}
}
