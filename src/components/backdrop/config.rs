//! Dashboard configuration, read once at startup.

use serde::Deserialize;

use super::grid::COLUMN_RANGE;
use super::particles::TARGET_RANGE;

/// Tunables injected through a JSON script element.
///
/// Every field is optional; out-of-range values are clamped by
/// [`DashboardConfig::sanitized`] rather than rejected.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
	/// Initial grid column count.
	pub grid_columns: usize,
	/// Initial particle count. Derived from the viewport when absent.
	pub particle_target: Option<usize>,
	/// Period of particle housekeeping, in milliseconds.
	pub housekeeping_ms: f64,
	/// Number of simulated server load bars.
	pub server_bar_count: usize,
	pub server_refresh_ms: u64,
	pub feed_refresh_ms: u64,
	/// Index into the palette presets.
	pub initial_palette: usize,
}

impl Default for DashboardConfig {
	fn default() -> Self {
		Self {
			grid_columns: 22,
			particle_target: None,
			housekeeping_ms: 3_500.0,
			server_bar_count: 4,
			server_refresh_ms: 6_000,
			feed_refresh_ms: 12_000,
			initial_palette: 0,
		}
	}
}

impl DashboardConfig {
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str::<Self>(json).map(Self::sanitized)
	}

	/// Clamp every field into its working range.
	pub fn sanitized(self) -> Self {
		Self {
			grid_columns: self.grid_columns.clamp(COLUMN_RANGE.0, COLUMN_RANGE.1),
			particle_target: self
				.particle_target
				.map(|t| t.clamp(TARGET_RANGE.0, TARGET_RANGE.1)),
			housekeeping_ms: if self.housekeeping_ms.is_finite() {
				self.housekeeping_ms.max(500.0)
			} else {
				3_500.0
			},
			server_bar_count: self.server_bar_count.clamp(1, 12),
			server_refresh_ms: self.server_refresh_ms.max(500),
			feed_refresh_ms: self.feed_refresh_ms.max(1_000),
			initial_palette: self.initial_palette,
		}
	}
}
