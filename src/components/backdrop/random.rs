//! Random number helpers shared by the simulations.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform random source owned by each simulation.
///
/// Wraps a small, fast PRNG. In the browser it is seeded from
/// `Math.random()`; tests use [`Random::seeded`] for reproducible layouts.
#[derive(Clone, Debug)]
pub struct Random {
	rng: SmallRng,
}

impl Random {
	pub fn seeded(seed: u64) -> Self {
		Self {
			rng: SmallRng::seed_from_u64(seed),
		}
	}

	/// Seed from the host environment.
	pub fn from_host() -> Self {
		Self::seeded(host_seed())
	}

	/// Derive an independent generator, e.g. one per simulation.
	pub fn fork(&mut self) -> Self {
		Self::seeded(self.rng.r#gen())
	}

	/// Uniform value in `[min, max)`. Degenerate or inverted ranges yield `min`.
	pub fn range(&mut self, min: f64, max: f64) -> f64 {
		if max > min {
			self.rng.gen_range(min..max)
		} else {
			min
		}
	}

	/// Uniform value in `[0, 1)`.
	pub fn unit(&mut self) -> f64 {
		self.rng.r#gen()
	}

	/// Uniform index in `[0, len)`; `None` for an empty collection.
	pub fn index(&mut self, len: usize) -> Option<usize> {
		(len > 0).then(|| self.rng.gen_range(0..len))
	}

	pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
		self.index(items.len()).map(|i| &items[i])
	}
}

#[cfg(target_arch = "wasm32")]
fn host_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn host_seed() -> u64 {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_nanos() as u64)
		.unwrap_or(42)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn range_stays_within_bounds() {
		let mut rng = Random::seeded(7);
		for _ in 0..1000 {
			let v = rng.range(-18.0, 18.0);
			assert!((-18.0..18.0).contains(&v));
		}
	}

	#[test]
	fn degenerate_range_returns_min() {
		let mut rng = Random::seeded(1);
		assert_eq!(rng.range(5.0, 5.0), 5.0);
		assert_eq!(rng.range(5.0, 1.0), 5.0);
	}

	#[test]
	fn pick_from_empty_is_none() {
		let mut rng = Random::seeded(3);
		let empty: [u8; 0] = [];
		assert!(rng.pick(&empty).is_none());
		assert_eq!(rng.pick(&[9]), Some(&9));
	}

	#[test]
	fn same_seed_same_sequence() {
		let (mut a, mut b) = (Random::seeded(99), Random::seeded(99));
		for _ in 0..16 {
			assert_eq!(a.unit(), b.unit());
		}
	}
}
