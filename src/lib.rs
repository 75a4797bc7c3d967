//! Mesh topology map for a smart-home coordinator bridge.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod components;
mod pages;

use crate::pages::map::MapPage;
use crate::pages::not_found::NotFound;

/// Route `log` output to the browser console and report panics there.
/// Layout and zoom tracing is at debug level.
pub fn init_logging() {
	console_error_panic_hook::set_once();
	if console_log::init_with_level(Level::Debug).is_err() {
		return;
	}
	info!("mesh-map {} logging to the console", env!("CARGO_PKG_VERSION"));
}

/// Root of the dashboard: the map lives at `/`, anything else is a 404.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Network map" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=MapPage />
			</Routes>
		</Router>
	}
}
