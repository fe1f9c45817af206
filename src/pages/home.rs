use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};

use crate::api::ApiClient;
use crate::components::filters::{
	DashboardState, EntityKind, FilterPanelView, FormSnapshot, Purpose,
};
use crate::components::graph::{
	BrowserSurface, GraphCall, GraphMethod, GraphRequester, GraphSurface,
};
use crate::components::pager::{DashboardPage, PageSet, PageSwitcher};
use crate::components::{DashboardRequester, RequesterHandle, dispatch};
use crate::config::DashboardConfig;

/// Surface holding the per-infrastructure dataset totals table.
pub const TOTALS_TARGET: &str = "infrastructureDatasetsTableGraph";
const PAGE_COUNT: u32 = 4;

/// Fetch one entity list and feed it to every panel's dropdowns.
fn load_entities(
	requester: Rc<DashboardRequester>,
	dashboard: RwSignal<DashboardState>,
	kind: EntityKind,
) {
	leptos::task::spawn_local(async move {
		let client = requester.backend();
		let fetched = match kind {
			EntityKind::Country => client.fetch_countries().await,
			EntityKind::Organisation => client.fetch_organisations().await,
		};
		match fetched {
			Ok(entities) => {
				info!("loaded {} {} filters", entities.len(), kind.as_str());
				dashboard.update(|d| d.populate(&entities, kind));
			}
			Err(err) => warn!("could not load {} filters: {err}", kind.as_str()),
		}
	});
}

/// The dashboard: four filter pages plus the infrastructure totals.
#[component]
pub fn Home() -> impl IntoView {
	let config = DashboardConfig::from_window().unwrap_or_else(|err| {
		warn!("{err}; using defaults");
		DashboardConfig::default()
	});
	let requester: RequesterHandle = StoredValue::new_local(Rc::new(GraphRequester::new(
		ApiClient::new(config),
		BrowserSurface,
	)));
	let dashboard = RwSignal::new(DashboardState::new());
	let pages = RwSignal::new(PageSet::sequential(PAGE_COUNT));

	// Runs once the page is mounted so every graph surface exists.
	Effect::new(move |_| {
		let requester = requester.get_value();
		load_entities(Rc::clone(&requester), dashboard, EntityKind::Country);
		load_entities(Rc::clone(&requester), dashboard, EntityKind::Organisation);
		dispatch(
			&requester,
			vec![GraphCall::new(
				FormSnapshot::NoFormContext,
				GraphMethod::DrawInfrastructuresTotal,
				TOTALS_TARGET,
			)],
		);
	});

	view! {
		<div class="dashboard">
			<header class="dashboard__header">
				<h1>"Natural science collections dashboard"</h1>
				<PageSwitcher pages=pages />
			</header>

			<DashboardPage pages=pages position=1>
				<section class="dashboard__totals">
					<h2>"Datasets per infrastructure"</h2>
					<GraphSurface target=TOTALS_TARGET />
				</section>
				<FilterPanelView
					dashboard=dashboard
					purpose=Purpose::Datasets
					requester=requester
				/>
			</DashboardPage>
			<DashboardPage pages=pages position=2>
				<FilterPanelView
					dashboard=dashboard
					purpose=Purpose::SpecimenCounter
					requester=requester
				/>
			</DashboardPage>
			<DashboardPage pages=pages position=3>
				<FilterPanelView
					dashboard=dashboard
					purpose=Purpose::SpecimenComparison
					requester=requester
				/>
			</DashboardPage>
			<DashboardPage pages=pages position=4>
				<FilterPanelView
					dashboard=dashboard
					purpose=Purpose::IssueFlagCounter
					requester=requester
				/>
			</DashboardPage>
		</div>
	}
}
