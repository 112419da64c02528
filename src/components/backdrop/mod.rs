//! Animated dashboard backdrop.
//!
//! Three transparent canvases are stacked behind the page content:
//! - aurora: translucent sine-wave bands tinted by the active palette
//! - particles: a drifting, wrapping particle field with bursts
//! - grid: a jittering lattice whose nearby points are linked by fading lines
//!
//! All simulation state lives in a [`Scene`]; the component only mounts the
//! canvases, forwards user actions and drives frames.
//!
//! # Example
//!
//! ```ignore
//! use auroraverse::{AuroraBackdrop, DashboardConfig};
//!
//! let config = DashboardConfig { grid_columns: 30, ..Default::default() };
//! view! { <AuroraBackdrop config=config /> }
//! ```

pub mod aurora;
mod component;
pub mod config;
pub mod grid;
pub mod particles;
pub mod random;
mod render;
pub mod scene;
pub mod surface;
pub mod theme;

pub use component::AuroraBackdrop;
pub use config::DashboardConfig;
pub use scene::Scene;
pub use theme::{Palette, PaletteStore};
