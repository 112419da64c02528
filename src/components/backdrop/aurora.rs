//! Aurora wave bands for the back layer.
//!
//! Each layer is a sine wave whose phase advances with time; the render pass
//! fills a band of the layer's thickness under the wave. Layers stack downward
//! with decreasing thickness.

use std::f64::consts::TAU;

use super::random::Random;

pub const LAYER_COUNT: usize = 4;
/// Amplitude multiplier applied by [`AuroraLayers::pulse`].
pub const PULSE_FACTOR: f64 = 1.12;
/// How long a pulse lasts, in milliseconds.
pub const PULSE_DURATION_MS: f64 = 700.0;
/// Horizontal sampling step of the wave outline, in logical pixels.
pub const SAMPLE_STEP: f64 = 6.0;
/// Horizontal wavelength divisor.
const WAVE_STRETCH: f64 = 220.0;

/// A single sinusoidal band.
#[derive(Clone, Debug)]
pub struct AuroraLayer {
	pub amplitude: f64,
	/// Amplitude outside of a pulse.
	pub base_amplitude: f64,
	/// Phase advance, radians per millisecond.
	pub speed: f64,
	pub phase: f64,
	pub thickness: f64,
}

impl AuroraLayer {
	/// Vertical position of the wave crest at `x` for the layer at `index`.
	pub fn wave_y(&self, index: usize, x: f64, t: f64, height: f64) -> f64 {
		let i = index as f64;
		let base_y = height * 0.35 + i * 38.0;
		let swing = (t * self.speed + x / WAVE_STRETCH + self.phase).sin();
		base_y + swing * self.amplitude * (1.0 + i * 0.06) - i * 6.0
	}
}

/// The fixed set of aurora layers plus pending pulse state.
pub struct AuroraLayers {
	pub layers: Vec<AuroraLayer>,
	/// Frame timestamp at which an active pulse reverts.
	pulse_until: Option<f64>,
}

impl AuroraLayers {
	pub fn new(rng: &mut Random) -> Self {
		let layers = (0..LAYER_COUNT)
			.map(|i| {
				let amplitude = rng.range(40.0, 120.0);
				AuroraLayer {
					amplitude,
					base_amplitude: amplitude,
					speed: rng.range(0.002, 0.01),
					phase: rng.range(0.0, TAU),
					thickness: 120.0 - i as f64 * 18.0,
				}
			})
			.collect();
		Self {
			layers,
			pulse_until: None,
		}
	}

	pub fn is_pulsing(&self) -> bool {
		self.pulse_until.is_some()
	}

	/// Swell every layer by [`PULSE_FACTOR`] until `now + PULSE_DURATION_MS`.
	///
	/// The factor is applied to the baseline, so overlapping pulses extend the
	/// deadline instead of compounding.
	pub fn pulse(&mut self, now: f64) {
		for layer in &mut self.layers {
			layer.amplitude = layer.base_amplitude * PULSE_FACTOR;
		}
		self.pulse_until = Some(now + PULSE_DURATION_MS);
	}

	/// Reverts an expired pulse. Called once per frame.
	pub fn update(&mut self, now: f64) {
		if self.pulse_until.is_some_and(|deadline| now >= deadline) {
			self.cancel_pulse();
		}
	}

	/// Restore baseline amplitudes immediately.
	pub fn cancel_pulse(&mut self) {
		for layer in &mut self.layers {
			layer.amplitude = layer.base_amplitude;
		}
		self.pulse_until = None;
	}

	/// Sample the crest of the layer at `index` across `width`, including both edges.
	pub fn outline(&self, index: usize, t: f64, width: f64, height: f64) -> Vec<(f64, f64)> {
		let Some(layer) = self.layers.get(index) else {
			return Vec::new();
		};
		let steps = (width.max(0.0) / SAMPLE_STEP).ceil() as usize;
		(0..=steps)
			.map(|s| {
				let x = (s as f64 * SAMPLE_STEP).min(width.max(0.0));
				(x, layer.wave_y(index, x, t, height))
			})
			.collect()
	}
}
