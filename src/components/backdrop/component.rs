//! Leptos component mounting the layered backdrop and its control panel.
//!
//! The component creates three stacked canvases (aurora at the back, particles,
//! grid in front), builds the [`Scene`] once they are mounted, and runs the
//! animation loop via `requestAnimationFrame`. A window resize listener
//! re-lays out the scene. Both stop when the component is cleaned up.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement, Window};

use super::config::DashboardConfig;
use super::grid::COLUMN_RANGE;
use super::particles::TARGET_RANGE;
use super::random::Random;
use super::scene::{Scene, Surfaces};
use super::surface::{DrawingSurface, Viewport};
use super::theme::Palette;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
type ResizeCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Mirror the palette into the `--accentA/B/C` CSS custom properties.
fn apply_css_palette(palette: &Palette) {
	let Some(root) = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.document_element())
		.and_then(|e| e.dyn_into::<HtmlElement>().ok())
	else {
		return;
	};
	let style = root.style();
	for (name, value) in palette.css_variables() {
		let _ = style.set_property(name, &value);
	}
}

/// Renders the animated backdrop plus its controls.
///
/// `on_inspire` fires after the palette has been randomized, so sibling
/// widgets can refresh alongside the backdrop.
#[component]
pub fn AuroraBackdrop(
	#[prop(default = DashboardConfig::default())] config: DashboardConfig,
	#[prop(optional, into)] on_inspire: Option<Callback<()>>,
) -> impl IntoView {
	let config = config.sanitized();
	let aurora_ref = NodeRef::<leptos::html::Canvas>::new();
	let particles_ref = NodeRef::<leptos::html::Canvas>::new();
	let grid_ref = NodeRef::<leptos::html::Canvas>::new();

	let scene: Rc<RefCell<Option<Scene>>> = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: ResizeCallback = Rc::new(RefCell::new(None));
	let alive = Arc::new(AtomicBool::new(true));

	let particle_count = RwSignal::new(0usize);
	let grid_columns = RwSignal::new(config.grid_columns);

	{
		let alive = alive.clone();
		on_cleanup(move || alive.store(false, Ordering::Relaxed));
	}

	let (scene_init, animate_init, resize_init, config_init) =
		(scene.clone(), animate.clone(), resize_cb.clone(), config.clone());
	Effect::new(move |_| {
		if scene_init.borrow().is_some() {
			return;
		}
		let (Some(aurora), Some(particles), Some(grid)) =
			(aurora_ref.get(), particles_ref.get(), grid_ref.get())
		else {
			return;
		};
		let Some(window) = web_sys::window() else {
			log::warn!("auroraverse: no window, backdrop disabled");
			return;
		};

		let (aurora, particles, grid): (HtmlCanvasElement, HtmlCanvasElement, HtmlCanvasElement) =
			(aurora.into(), particles.into(), grid.into());
		let surfaces = Surfaces {
			aurora: DrawingSurface::attach("aurora", Some(aurora)),
			particles: DrawingSurface::attach("particles", Some(particles)),
			grid: DrawingSurface::attach("grid", Some(grid)),
		};
		let viewport = Viewport::from_window().unwrap_or_default();
		let mut new_scene = Scene::new(&config_init, viewport, surfaces, Random::from_host());
		new_scene.palette.subscribe(apply_css_palette);
		particle_count.set(new_scene.particles.len());
		*scene_init.borrow_mut() = Some(new_scene);

		let scene_resize = scene_init.clone();
		*resize_init.borrow_mut() = Some(Closure::new(move || {
			let Some(viewport) = Viewport::from_window() else {
				return;
			};
			if let Some(ref mut s) = *scene_resize.borrow_mut() {
				s.resize(viewport);
				particle_count.set(s.particles.len());
			}
		}));
		if let Some(ref cb) = *resize_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (scene_anim, animate_inner, resize_inner, alive) = (
			scene_init.clone(),
			animate_init.clone(),
			resize_init.clone(),
			alive.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			let window: Option<Window> = web_sys::window();
			if !alive.load(Ordering::Relaxed) {
				if let Some(ref mut s) = *scene_anim.borrow_mut() {
					s.stop();
				}
				if let (Some(w), Some(cb)) = (&window, resize_inner.borrow_mut().take()) {
					let _ = w.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				log::info!("auroraverse: render loop stopped");
				return;
			}
			if let Some(ref mut s) = *scene_anim.borrow_mut() {
				s.frame(now);
			}
			if let (Some(w), Some(cb)) = (&window, animate_inner.borrow().as_ref()) {
				let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let scene_inspire = scene.clone();
	let on_inspire_click = move |_| {
		if let Some(ref mut s) = *scene_inspire.borrow_mut() {
			let palette = s.inspire();
			log::debug!("auroraverse: palette -> {}", palette.primary);
		}
		if let Some(cb) = on_inspire {
			cb.run(());
		}
	};

	let scene_burst = scene.clone();
	let on_burst = move |_| {
		if let Some(ref mut s) = *scene_burst.borrow_mut() {
			s.burst();
			particle_count.set(s.particles.len());
		}
	};

	let scene_shuffle = scene.clone();
	let on_shuffle = move |_| {
		if let Some(ref mut s) = *scene_shuffle.borrow_mut() {
			s.shuffle();
		}
	};

	let scene_particles = scene.clone();
	let on_particles = move |ev| {
		let Ok(target) = event_target_value(&ev).parse::<usize>() else {
			return;
		};
		if let Some(ref mut s) = *scene_particles.borrow_mut() {
			particle_count.set(s.set_particle_target(target));
		}
	};

	let scene_grid = scene.clone();
	let on_grid = move |ev| {
		let Ok(columns) = event_target_value(&ev).parse::<usize>() else {
			return;
		};
		if let Some(ref mut s) = *scene_grid.borrow_mut() {
			s.set_grid_columns(columns);
			grid_columns.set(s.grid.columns());
		}
	};

	let layer_style = "position: fixed; inset: 0; pointer-events: none;";

	view! {
		<div class="backdrop">
			<canvas node_ref=aurora_ref id="aurora" style=layer_style />
			<canvas node_ref=particles_ref id="particles" style=layer_style />
			<canvas node_ref=grid_ref id="grid" style=layer_style />
		</div>
		<div class="controls">
			<button id="btnInspire" on:click=on_inspire_click>"Inspire"</button>
			<button id="btnPulse" on:click=on_burst>"Pulse"</button>
			<button id="btnShuffle" on:click=on_shuffle>"Shuffle"</button>
			<label>
				"Particles " {move || particle_count.get()}
				<input
					id="rngParticles"
					type="range"
					min=TARGET_RANGE.0.to_string()
					max=TARGET_RANGE.1.to_string()
					prop:value=move || particle_count.get().to_string()
					on:input=on_particles
				/>
			</label>
			<label>
				"Grid " {move || grid_columns.get()}
				<input
					id="rngGrid"
					type="range"
					min=COLUMN_RANGE.0.max(6).to_string()
					max="60"
					prop:value=move || grid_columns.get().to_string()
					on:change=on_grid
				/>
			</label>
		</div>
	}
}
