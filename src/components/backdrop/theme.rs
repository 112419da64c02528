//! Color palettes for the backdrop layers.
//!
//! A [`Palette`] is three colors swapped wholesale; [`PaletteStore`] holds the
//! active one and tells subscribers (CSS variables, widgets) when it changes.

use std::fmt;

use super::random::Random;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self {
			a: a.clamp(0.0, 1.0),
			..self
		}
	}

	/// Parses `#RRGGBB` (the leading `#` is optional).
	pub fn from_hex(hex: &str) -> Option<Self> {
		let digits = hex.trim().trim_start_matches('#');
		if digits.len() != 6 || !digits.is_ascii() {
			return None;
		}
		let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
		Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			self.to_hex()
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	pub fn to_hex(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_css())
	}
}

/// Fully transparent white, used as the fade-out stop of gradients.
pub const TRANSPARENT: Color = Color {
	r: 255,
	g: 255,
	b: 255,
	a: 0.0,
};

/// The three-color theme every layer is tinted with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
	pub primary: Color,
	pub secondary: Color,
	pub tertiary: Color,
}

impl Palette {
	/// Builds a palette from hex strings, falling back to mid-gray per color.
	pub fn from_hex(primary: &str, secondary: &str, tertiary: &str) -> Self {
		let parse = |s: &str| Color::from_hex(s).unwrap_or(Color::rgb(128, 128, 128));
		Self {
			primary: parse(primary),
			secondary: parse(secondary),
			tertiary: parse(tertiary),
		}
	}

	/// Neon pink, violet and sky blue (default)
	pub fn neon() -> Self {
		Self::from_hex("#ff6ec7", "#7c5cff", "#38bdf8")
	}

	/// Softer rose, lilac and aqua
	pub fn blossom() -> Self {
		Self::from_hex("#ff9bb8", "#8e6bff", "#74ecf0")
	}

	/// Pastel pink, lavender and ice
	pub fn haze() -> Self {
		Self::from_hex("#ffb3d6", "#c08eff", "#9be7ff")
	}

	pub fn presets() -> Vec<Palette> {
		vec![Self::neon(), Self::blossom(), Self::haze()]
	}

	/// CSS custom properties mirroring this palette.
	pub fn css_variables(&self) -> [(&'static str, String); 3] {
		[
			("--accentA", self.primary.to_hex()),
			("--accentB", self.secondary.to_hex()),
			("--accentC", self.tertiary.to_hex()),
		]
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::neon()
	}
}

type Subscriber = Box<dyn FnMut(&Palette)>;

/// Holds the active palette and notifies subscribers whenever it is replaced.
pub struct PaletteStore {
	presets: Vec<Palette>,
	active: Palette,
	subscribers: Vec<Subscriber>,
}

impl PaletteStore {
	/// Creates a store over `presets`, starting at `initial` (clamped).
	pub fn new(presets: Vec<Palette>, initial: usize) -> Self {
		let presets = if presets.is_empty() {
			vec![Palette::default()]
		} else {
			presets
		};
		let active = presets[initial.min(presets.len() - 1)];
		Self {
			presets,
			active,
			subscribers: Vec::new(),
		}
	}

	pub fn active(&self) -> Palette {
		self.active
	}

	pub fn presets(&self) -> &[Palette] {
		&self.presets
	}

	/// Registers a callback; it is invoked immediately with the active palette.
	pub fn subscribe(&mut self, mut subscriber: impl FnMut(&Palette) + 'static) {
		subscriber(&self.active);
		self.subscribers.push(Box::new(subscriber));
	}

	pub fn set(&mut self, palette: Palette) {
		self.active = palette;
		for subscriber in &mut self.subscribers {
			subscriber(&palette);
		}
	}

	/// Picks a preset uniformly at random (possibly the current one).
	pub fn randomize(&mut self, rng: &mut Random) -> Palette {
		let palette = rng
			.pick(&self.presets)
			.copied()
			.unwrap_or(self.active);
		self.set(palette);
		palette
	}
}

impl Default for PaletteStore {
	fn default() -> Self {
		Self::new(Palette::presets(), 0)
	}
}
