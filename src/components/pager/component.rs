use leptos::prelude::*;

use super::state::{Direction, PageSet};

/// Previous/next buttons and the page number indicator.
#[component]
pub fn PageSwitcher(
	/// Pages being switched between.
	pages: RwSignal<PageSet>,
) -> impl IntoView {
	let on_click = move |ev: leptos::ev::MouseEvent| {
		let value = event_target_value(&ev);
		match value.parse::<Direction>() {
			Ok(direction) => pages.update(|p| {
				let position = p.advance(direction);
				log::debug!("switched to dashboard page {position}");
			}),
			Err(err) => log::warn!("{err}"),
		}
	};

	view! {
		<nav class="page-switcher" aria-label="Dashboard pages">
			<button type="button" class="btn" value="down" on:click=on_click>
				"‹"
			</button>
			<span id="pageSwitcherField" class="page-switcher__field">
				{move || pages.with(|p| p.current())}
			</span>
			<button type="button" class="btn" value="up" on:click=on_click>
				"›"
			</button>
		</nav>
	}
}

/// One dashboard page; hidden unless it is the visible one.
#[component]
pub fn DashboardPage(
	/// Shared page state.
	pages: RwSignal<PageSet>,
	/// 1-based position of this page.
	position: u32,
	children: Children,
) -> impl IntoView {
	let class = move || {
		if pages.with(|p| p.is_visible(position)) {
			"dashboardPage"
		} else {
			"dashboardPage d-none"
		}
	};

	view! {
		<section class=class data-page-number=position.to_string()>
			{children()}
		</section>
	}
}
