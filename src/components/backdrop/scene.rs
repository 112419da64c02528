//! Backdrop scene state and frame sequencing.
//!
//! [`Scene`] owns the three simulations, the palette store and the three
//! drawing surfaces. It is created once when the component mounts and then
//! driven by the animation callback through [`Scene::frame`]. The
//! [`RenderLoop`] itself only tracks whether frames should still be produced.

use super::aurora::AuroraLayers;
use super::config::DashboardConfig;
use super::grid::ConnectivityGrid;
use super::particles::ParticleField;
use super::random::Random;
use super::render;
use super::surface::{DrawingSurface, Viewport};
use super::theme::{Palette, PaletteStore};

/// Particles added by a burst.
pub const BURST_COUNT: usize = 60;
/// Per-axis anchor displacement of a shuffle.
pub const SHUFFLE_JITTER: f64 = 40.0;
/// Velocity boost applied when the palette is randomized.
pub const INSPIRE_BOOST: (f64, f64) = (1.3, 1.2);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
	Running,
	Stopped,
}

/// Timing information for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
	/// Monotonic timestamp in milliseconds.
	pub now: f64,
	/// Milliseconds since the previous frame (0 for the first).
	pub delta: f64,
	pub index: u64,
}

/// Two-state frame driver.
#[derive(Clone, Debug)]
pub struct RenderLoop {
	state: LoopState,
	last: Option<f64>,
	frames: u64,
}

impl RenderLoop {
	pub fn new() -> Self {
		Self {
			state: LoopState::Running,
			last: None,
			frames: 0,
		}
	}

	pub fn state(&self) -> LoopState {
		self.state
	}

	pub fn is_running(&self) -> bool {
		self.state == LoopState::Running
	}

	/// Start a frame at `now`; `None` once stopped.
	pub fn begin_frame(&mut self, now: f64) -> Option<FrameTime> {
		if self.state == LoopState::Stopped {
			return None;
		}
		let delta = self.last.map_or(0.0, |last| (now - last).max(0.0));
		let frame = FrameTime {
			now,
			delta,
			index: self.frames,
		};
		self.last = Some(now);
		self.frames += 1;
		Some(frame)
	}

	pub fn stop(&mut self) {
		self.state = LoopState::Stopped;
	}
}

impl Default for RenderLoop {
	fn default() -> Self {
		Self::new()
	}
}

/// Fires at most once per `period` of frame time.
#[derive(Clone, Debug)]
pub struct Cadence {
	period: f64,
	next_due: Option<f64>,
}

impl Cadence {
	pub fn new(period: f64) -> Self {
		Self {
			period,
			next_due: None,
		}
	}

	/// Returns true when a period has elapsed. The first call only arms it.
	pub fn due(&mut self, now: f64) -> bool {
		match self.next_due {
			None => {
				self.next_due = Some(now + self.period);
				false
			}
			Some(due) if now >= due => {
				self.next_due = Some(now + self.period);
				true
			}
			Some(_) => false,
		}
	}
}

/// Which stages ran in a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageReport {
	pub aurora: bool,
	pub particles: bool,
	pub grid: bool,
}

/// The three surfaces, back to front.
pub struct Surfaces {
	pub aurora: DrawingSurface,
	pub particles: DrawingSurface,
	pub grid: DrawingSurface,
}

impl Surfaces {
	pub fn detached() -> Self {
		Self {
			aurora: DrawingSurface::detached("aurora"),
			particles: DrawingSurface::detached("particles"),
			grid: DrawingSurface::detached("grid"),
		}
	}

	fn iter(&self) -> [&DrawingSurface; 3] {
		[&self.aurora, &self.particles, &self.grid]
	}
}

pub struct Scene {
	pub aurora: AuroraLayers,
	pub particles: ParticleField,
	pub grid: ConnectivityGrid,
	pub palette: PaletteStore,
	pub surfaces: Surfaces,
	pub render_loop: RenderLoop,
	viewport: Viewport,
	grid_columns: usize,
	particle_target: Option<usize>,
	housekeeping: Cadence,
	rng: Random,
	last_now: f64,
}

impl Scene {
	pub fn new(
		config: &DashboardConfig,
		viewport: Viewport,
		surfaces: Surfaces,
		mut rng: Random,
	) -> Self {
		let config = config.clone().sanitized();
		let (w, h) = (viewport.width, viewport.height);
		let mut scene = Self {
			aurora: AuroraLayers::new(&mut rng),
			particles: ParticleField::new(w, h, rng.fork()),
			grid: ConnectivityGrid::new(w, h, rng.fork()),
			palette: PaletteStore::new(Palette::presets(), config.initial_palette),
			surfaces,
			render_loop: RenderLoop::new(),
			viewport,
			grid_columns: config.grid_columns,
			particle_target: config.particle_target,
			housekeeping: Cadence::new(config.housekeeping_ms),
			rng,
			last_now: 0.0,
		};
		scene.resize(viewport);
		scene
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// Apply a new viewport: resize every surface, then rebuild the grid and
	/// reseed the particles for the new bounds.
	pub fn resize(&mut self, viewport: Viewport) {
		self.viewport = viewport;
		for surface in self.surfaces.iter() {
			surface.resize(&viewport);
		}
		let (w, h) = (viewport.width, viewport.height);
		self.grid.set_bounds(w, h);
		self.grid.initialize(self.grid_columns);
		self.particles.set_bounds(w, h);
		self.particles.initialize(ParticleField::count_for_viewport(w, h));
		if let Some(target) = self.particle_target {
			self.particles.resize_to_target(target);
		}
		log::info!(
			"auroraverse: viewport {}x{} @{}x, {} particles, {} grid points",
			w,
			h,
			viewport.pixel_ratio,
			self.particles.len(),
			self.grid.points.len()
		);
	}

	/// Produce one frame. Stages whose surface is unavailable are skipped,
	/// simulation included.
	pub fn frame(&mut self, now: f64) -> Option<StageReport> {
		let frame = self.render_loop.begin_frame(now)?;
		self.last_now = frame.now;
		let palette = self.palette.active();
		let (w, h) = (self.viewport.width, self.viewport.height);
		let mut report = StageReport::default();

		self.aurora.update(frame.now);
		if let Some(ctx) = self.surfaces.aurora.context() {
			render::draw_aurora(ctx, &self.aurora, frame.now, &palette, w, h);
			report.aurora = true;
		}

		if self.surfaces.particles.is_available() {
			self.particles.step(frame.now);
			if let Some(ctx) = self.surfaces.particles.context() {
				render::draw_particles(ctx, &self.particles, &palette);
			}
			report.particles = true;
		}

		if self.surfaces.grid.is_available() {
			self.grid.step();
			if let Some(ctx) = self.surfaces.grid.context() {
				render::draw_grid(ctx, &self.grid, &palette, w, h);
			}
			report.grid = true;
		}

		if self.housekeeping.due(frame.now) {
			let removed = self.particles.trim();
			if removed > 0 {
				log::debug!("auroraverse: housekeeping trimmed {removed} particles");
			}
		}

		Some(report)
	}

	/// Stop producing frames and revert any transient effect.
	pub fn stop(&mut self) {
		self.render_loop.stop();
		self.aurora.cancel_pulse();
	}

	/// Random palette, aurora swell and a particle speed-up.
	pub fn inspire(&mut self) -> Palette {
		let palette = self.palette.randomize(&mut self.rng);
		self.aurora.pulse(self.last_now);
		self.particles.boost(INSPIRE_BOOST.0, INSPIRE_BOOST.1);
		palette
	}

	/// Burst of particles at the viewport center.
	pub fn burst(&mut self) {
		self.particles.burst(self.viewport.center(), BURST_COUNT);
	}

	pub fn shuffle(&mut self) {
		self.grid.relocate_anchors(SHUFFLE_JITTER);
	}

	/// Set the particle population; returns the clamped target.
	pub fn set_particle_target(&mut self, target: usize) -> usize {
		let target = self.particles.resize_to_target(target);
		self.particle_target = Some(target);
		target
	}

	pub fn set_grid_columns(&mut self, columns: usize) {
		self.grid.initialize(columns);
		self.grid_columns = self.grid.columns();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::backdrop::aurora::PULSE_DURATION_MS;
	use crate::components::backdrop::particles::{MIN_PARTICLES, WRAP_MARGIN};

	fn scene(config: &DashboardConfig) -> Scene {
		Scene::new(
			config,
			Viewport::new(1920.0, 1080.0, 2.0),
			Surfaces::detached(),
			Random::seeded(8),
		)
	}

	#[test]
	fn loop_reports_deltas_until_stopped() {
		let mut l = RenderLoop::new();
		assert_eq!(l.begin_frame(100.0).map(|f| f.delta), Some(0.0));
		let f = l.begin_frame(116.5).unwrap();
		assert_eq!(f.delta, 16.5);
		assert_eq!(f.index, 1);
		l.stop();
		assert_eq!(l.state(), LoopState::Stopped);
		assert!(l.begin_frame(133.0).is_none());
	}

	#[test]
	fn cadence_fires_once_per_period() {
		let mut c = Cadence::new(3_500.0);
		assert!(!c.due(0.0));
		assert!(!c.due(3_499.0));
		assert!(c.due(3_500.0));
		assert!(!c.due(3_600.0));
		assert!(c.due(7_100.0));
	}

	#[test]
	fn construction_seeds_everything() {
		let s = scene(&DashboardConfig::default());
		assert_eq!(s.grid.points.len(), 264);
		assert_eq!(s.particles.len(), MIN_PARTICLES);
		assert_eq!(s.aurora.layers.len(), 4);
		assert_eq!(s.palette.active(), Palette::neon());
	}

	#[test]
	fn configured_target_survives_resize() {
		let config = DashboardConfig {
			particle_target: Some(900),
			..DashboardConfig::default()
		};
		let mut s = scene(&config);
		assert_eq!(s.particles.len(), 900);
		s.resize(Viewport::new(800.0, 600.0, 1.0));
		assert_eq!(s.particles.len(), 900);
		assert_eq!(s.particles.bounds(), (800.0, 600.0));
	}

	#[test]
	fn missing_surfaces_skip_their_stages() {
		let mut s = scene(&DashboardConfig::default());
		let before: Vec<f64> = s.particles.particles.iter().map(|p| p.x).collect();
		let report = s.frame(16.0).unwrap();
		assert_eq!(report, StageReport::default());
		let after: Vec<f64> = s.particles.particles.iter().map(|p| p.x).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn stopped_scene_produces_no_frames() {
		let mut s = scene(&DashboardConfig::default());
		s.stop();
		assert!(s.frame(16.0).is_none());
	}

	#[test]
	fn inspire_pulses_and_reverts_on_frame_clock() {
		let mut s = scene(&DashboardConfig::default());
		s.frame(1_000.0);
		let base: Vec<f64> = s.aurora.layers.iter().map(|l| l.amplitude).collect();
		s.inspire();
		assert!(s.aurora.is_pulsing());
		s.frame(1_000.0 + PULSE_DURATION_MS);
		assert!(!s.aurora.is_pulsing());
		for (l, b) in s.aurora.layers.iter().zip(base) {
			assert!((l.amplitude - b).abs() < 1e-9);
		}
	}

	#[test]
	fn housekeeping_runs_on_its_cadence() {
		let mut s = scene(&DashboardConfig::default());
		for _ in 0..80 {
			s.burst();
		}
		assert_eq!(s.particles.len(), MIN_PARTICLES + 80 * BURST_COUNT);
		s.frame(0.0);
		assert_eq!(s.particles.len(), MIN_PARTICLES + 80 * BURST_COUNT);
		s.frame(3_500.0);
		assert_eq!(s.particles.len(), 240);
	}

	#[test]
	fn burst_lands_around_center() {
		let mut s = scene(&DashboardConfig::default());
		s.burst();
		let tail = &s.particles.particles[MIN_PARTICLES..];
		assert_eq!(tail.len(), BURST_COUNT);
		for p in tail {
			assert!((p.x - 960.0).abs() <= 160.0 + WRAP_MARGIN);
		}
	}

	#[test]
	fn grid_columns_are_clamped_and_remembered() {
		let mut s = scene(&DashboardConfig::default());
		s.set_grid_columns(0);
		assert_eq!(s.grid.columns(), 2);
		s.resize(Viewport::new(1920.0, 1080.0, 1.0));
		assert_eq!(s.grid.columns(), 2);
		s.set_grid_columns(22);
		assert_eq!(s.grid.points.len(), 264);
	}

	#[test]
	fn shuffle_moves_anchors() {
		let mut s = scene(&DashboardConfig::default());
		let before: Vec<f64> = s.grid.points.iter().map(|p| p.ox).collect();
		s.shuffle();
		assert!(s.grid.points.iter().zip(before).any(|(p, ox)| p.ox != ox));
	}
}
