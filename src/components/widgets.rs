//! Small text widgets around the backdrop: server load bars, session uptime
//! and a simulated geo-located event feed.
//!
//! All data here is mock data; nothing is fetched.

use std::time::Duration;

use leptos::prelude::*;

use crate::components::backdrop::random::Random;

/// Simulated load of one server, in percent.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerLoad {
	pub name: String,
	pub load: u8,
}

/// Fresh random loads in `[18, 86)` percent.
pub fn sample_server_loads(count: usize, rng: &mut Random) -> Vec<ServerLoad> {
	(0..count)
		.map(|i| ServerLoad {
			name: format!("node-{:02}", i + 1),
			load: rng.range(18.0, 86.0).floor() as u8,
		})
		.collect()
}

/// `HH:MM:SS`; hours keep counting past 99.
pub fn format_uptime(elapsed: Duration) -> String {
	let secs = elapsed.as_secs();
	format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// A simulated event pinned to a location.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedEvent {
	pub title: String,
	pub city: &'static str,
	pub lat: f64,
	pub lon: f64,
	pub value: u32,
}

const CITIES: [(&str, f64, f64); 7] = [
	("London", 51.5074, -0.1278),
	("New York", 40.7128, -74.0060),
	("Mumbai", 19.0760, 72.8777),
	("Tokyo", 35.6762, 139.6503),
	("Sydney", -33.8688, 151.2093),
	("Berlin", 52.5200, 13.4050),
	("São Paulo", -23.5505, -46.6333),
];
const KINDS: [&str; 4] = ["Insight", "Trend", "Note", "Alert"];
const TOPICS: [&str; 4] = ["AI", "Design", "Web", "Cloud"];
/// Max coordinate offset from the city center, in degrees.
const SCATTER_DEG: f64 = 0.3;

/// One event per city, scattered slightly around it.
pub fn generate_feed(rng: &mut Random) -> Vec<FeedEvent> {
	CITIES
		.iter()
		.map(|&(city, lat, lon)| {
			let kind = rng.pick(&KINDS).copied().unwrap_or("Note");
			let topic = rng.pick(&TOPICS).copied().unwrap_or("Web");
			FeedEvent {
				title: format!("{kind} · {topic}"),
				city,
				lat: lat + rng.range(-SCATTER_DEG, SCATTER_DEG),
				lon: lon + rng.range(-SCATTER_DEG, SCATTER_DEG),
				value: rng.range(10.0, 900.0).floor() as u32,
			}
		})
		.collect()
}

fn now_ms() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or(0.0)
}

/// Runs `tick` every `period` until the owning component is cleaned up.
fn every(period: Duration, tick: impl Fn() + 'static) {
	match set_interval_with_handle(tick, period) {
		Ok(handle) => on_cleanup(move || handle.clear()),
		Err(e) => log::warn!("auroraverse: failed to schedule widget refresh: {e:?}"),
	}
}

/// Server load bars. Refreshes on its own timer and whenever `refresh` changes.
#[component]
pub fn ServerBars(
	#[prop(into)] refresh: Signal<u32>,
	count: usize,
	period_ms: u64,
) -> impl IntoView {
	let mut seed = Random::from_host();
	let loads = RwSignal::new(sample_server_loads(count, &mut seed));
	let rng = StoredValue::new(seed);
	let resample = move || {
		if let Some(fresh) = rng.try_update_value(|r| sample_server_loads(count, r)) {
			loads.set(fresh);
		}
	};

	Effect::new(move |prev: Option<u32>| {
		let n = refresh.get();
		if prev.is_some() {
			resample();
		}
		n
	});
	every(Duration::from_millis(period_ms), resample);

	view! {
		<ul class="server-bars">
			<For each=move || loads.get() key=|s| s.name.clone() let:server>
				<li class="bar">
					<span class="bar-label">{server.name.clone()}</span>
					<span class="bar-fill" style:width=format!("{}%", server.load) data-load=server.load.to_string()></span>
				</li>
			</For>
		</ul>
	}
}

/// Session uptime, ticking once per second.
#[component]
pub fn Uptime() -> impl IntoView {
	let started = now_ms();
	let label = RwSignal::new(format_uptime(Duration::ZERO));
	every(Duration::from_secs(1), move || {
		let elapsed = Duration::from_millis((now_ms() - started).max(0.0) as u64);
		label.set(format_uptime(elapsed));
	});

	view! { <span class="uptime">{move || label.get()}</span> }
}

/// Simulated feed list. Regenerates on its own timer and on demand.
#[component]
pub fn EventFeed(#[prop(into)] refresh: Signal<u32>, period_ms: u64) -> impl IntoView {
	let mut seed = Random::from_host();
	let feed = RwSignal::new(generate_feed(&mut seed));
	let rng = StoredValue::new(seed);
	let regenerate = move || {
		if let Some(fresh) = rng.try_update_value(generate_feed) {
			feed.set(fresh);
		}
	};

	Effect::new(move |prev: Option<u32>| {
		let n = refresh.get();
		if prev.is_some() {
			regenerate();
		}
		n
	});
	every(Duration::from_millis(period_ms), regenerate);

	view! {
		<div class="feed">
			<p class="feed-status">
				"Displaying simulated live feeds: " {move || feed.with(|f| f.len())}
			</p>
			<ul class="feed-list">
				<For each=move || feed.get() key=|e| (e.city, e.value) let:event>
					<li>
						<strong>{event.title.clone()}</strong>
						" " {event.city} " (" {format!("{:.2}, {:.2}", event.lat, event.lon)} ") "
						"value: " {event.value}
					</li>
				</For>
			</ul>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn uptime_formatting() {
		assert_eq!(format_uptime(Duration::ZERO), "00:00:00");
		assert_eq!(format_uptime(Duration::from_secs(3_723)), "01:02:03");
		assert_eq!(format_uptime(Duration::from_millis(59_999)), "00:00:59");
		assert_eq!(format_uptime(Duration::from_secs(100 * 3600)), "100:00:00");
	}

	#[test]
	fn server_loads_in_range() {
		let mut rng = Random::seeded(2);
		let loads = sample_server_loads(4, &mut rng);
		assert_eq!(loads.len(), 4);
		assert_eq!(loads[0].name, "node-01");
		for s in loads {
			assert!((18..86).contains(&s.load));
		}
	}

	#[test]
	fn feed_has_one_event_per_city_near_it() {
		let mut rng = Random::seeded(6);
		let feed = generate_feed(&mut rng);
		assert_eq!(feed.len(), CITIES.len());
		for (event, &(city, lat, lon)) in feed.iter().zip(CITIES.iter()) {
			assert_eq!(event.city, city);
			assert!((event.lat - lat).abs() <= SCATTER_DEG + 1e-9);
			assert!((event.lon - lon).abs() <= SCATTER_DEG + 1e-9);
			assert!((10..900).contains(&event.value));
			assert!(event.title.contains(" · "));
		}
	}
}
