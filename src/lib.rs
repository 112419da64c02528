//! auroraverse: animated dashboard backdrop for the web.
//!
//! This crate provides a WASM dashboard whose background is a layered canvas
//! animation (aurora waves, particles, a connectivity grid), surrounded by a
//! few small mock-data widgets.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::backdrop::{AuroraBackdrop, DashboardConfig, Palette, Scene};
use components::widgets::{EventFeed, ServerBars, Uptime};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("auroraverse: logging initialized");
}

/// Load configuration from a script element with id="dashboard-config".
/// Expected format: JSON object, every field optional.
fn load_config() -> Option<DashboardConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("dashboard-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match DashboardConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"auroraverse: config loaded ({} grid columns)",
				config.grid_columns
			);
			Some(config)
		}
		Err(e) => {
			warn!("auroraverse: failed to parse config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Reads configuration from the DOM and lays out the backdrop and widgets.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config().unwrap_or_default();
	let inspired = RwSignal::new(0u32);
	let feed_refresh = RwSignal::new(0u32);
	let on_inspire = Callback::new(move |_: ()| inspired.update(|n| *n += 1));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="AuroraVerse" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<AuroraBackdrop config=config.clone() on_inspire=on_inspire />
		<main class="dashboard">
			<section class="section" id="status">
				<h1>"AuroraVerse"</h1>
				<p class="subtitle">"Uptime " <Uptime /></p>
				<ServerBars
					refresh=inspired
					count=config.server_bar_count
					period_ms=config.server_refresh_ms
				/>
			</section>
			<section class="section" id="feed">
				<h2>"Live feed"</h2>
				<button
					id="btnRefreshData"
					on:click=move |_| feed_refresh.update(|n| *n += 1)
				>
					"Refresh"
				</button>
				<EventFeed refresh=feed_refresh period_ms=config.feed_refresh_ms />
			</section>
		</main>
	}
}
