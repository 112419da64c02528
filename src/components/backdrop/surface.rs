//! Canvas-backed drawing surfaces.
//!
//! Each backdrop layer draws into its own canvas. A surface whose 2-D context
//! cannot be obtained stays in the scene but is skipped for the session.

use std::fmt;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Logical viewport size plus device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	pub pixel_ratio: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
		let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
			pixel_ratio
		} else {
			1.0
		};
		Self {
			width: width.max(0.0),
			height: height.max(0.0),
			pixel_ratio,
		}
	}

	/// Reads the browser window, if there is one.
	pub fn from_window() -> Option<Self> {
		let window = web_sys::window()?;
		Some(Self::new(
			window.inner_width().ok()?.as_f64()?,
			window.inner_height().ok()?.as_f64()?,
			window.device_pixel_ratio(),
		))
	}

	/// Backing-store size in device pixels.
	pub fn device_size(&self) -> (u32, u32) {
		(
			(self.width * self.pixel_ratio).round() as u32,
			(self.height * self.pixel_ratio).round() as u32,
		)
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}

impl Default for Viewport {
	fn default() -> Self {
		Self::new(800.0, 600.0, 1.0)
	}
}

/// Why a surface has no usable rendering context.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceError {
	/// The canvas element was never mounted.
	NotMounted,
	/// `getContext("2d")` threw.
	ContextFailed(String),
	/// `getContext("2d")` returned null or a different context type.
	ContextUnavailable,
}

impl fmt::Display for SurfaceError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SurfaceError::NotMounted => f.write_str("canvas element is not mounted"),
			SurfaceError::ContextFailed(e) => write!(f, "getContext(\"2d\") failed: {e}"),
			SurfaceError::ContextUnavailable => f.write_str("2d context unavailable"),
		}
	}
}

/// One layer's canvas and its 2-D context, if any.
pub struct DrawingSurface {
	pub name: &'static str,
	canvas: Option<HtmlCanvasElement>,
	ctx: Option<CanvasRenderingContext2d>,
}

impl DrawingSurface {
	/// Acquire the 2-D context of `canvas`. On failure the error is logged
	/// once and the surface is returned disabled.
	pub fn attach(name: &'static str, canvas: Option<HtmlCanvasElement>) -> Self {
		let ctx = match canvas.as_ref().ok_or(SurfaceError::NotMounted).and_then(context_2d) {
			Ok(ctx) => Some(ctx),
			Err(e) => {
				log::warn!("auroraverse: {name} layer disabled: {e}");
				None
			}
		};
		Self { name, canvas, ctx }
	}

	/// A surface with nothing behind it; its stage is always skipped.
	pub fn detached(name: &'static str) -> Self {
		Self {
			name,
			canvas: None,
			ctx: None,
		}
	}

	pub fn context(&self) -> Option<&CanvasRenderingContext2d> {
		self.ctx.as_ref()
	}

	pub fn is_available(&self) -> bool {
		self.ctx.is_some()
	}

	/// Match the viewport in device pixels and draw in logical pixels.
	pub fn resize(&self, viewport: &Viewport) {
		let (Some(canvas), Some(ctx)) = (&self.canvas, &self.ctx) else {
			return;
		};
		let (dw, dh) = viewport.device_size();
		canvas.set_width(dw);
		canvas.set_height(dh);
		let style = canvas.style();
		let _ = style.set_property("width", &format!("{}px", viewport.width));
		let _ = style.set_property("height", &format!("{}px", viewport.height));
		let dpr = viewport.pixel_ratio;
		let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, SurfaceError> {
	canvas
		.get_context("2d")
		.map_err(|e| SurfaceError::ContextFailed(format!("{e:?}")))?
		.ok_or(SurfaceError::ContextUnavailable)?
		.dyn_into()
		.map_err(|_| SurfaceError::ContextUnavailable)
}
