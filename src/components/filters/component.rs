use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

use super::form::{LIST_MARKER, OPTIONS_FIELD};
use super::state::DashboardState;
use super::types::{EntityKind, Mode, Purpose, VariantVisibility};
use crate::components::graph::{GraphSurface, SUMMARY_TABLE_ID};
use crate::components::{RequesterHandle, dispatch};

#[derive(Clone, Debug, PartialEq, Eq)]
struct OptionRow {
	id: String,
	value: String,
	label: String,
}

/// Checkbox list for one entity kind. Rows carry no handlers of their own;
/// the enclosing `.dropdownList` handles changes for all of them.
#[component]
fn OptionList(
	dashboard: RwSignal<DashboardState>,
	purpose: Purpose,
	kind: EntityKind,
) -> impl IntoView {
	let rows = move || {
		dashboard.with(|d| {
			d.panel(purpose)
				.options(kind)
				.map(|o| OptionRow {
					id: o.id.clone(),
					value: o.value.clone(),
					label: o.label.clone(),
				})
				.collect::<Vec<_>>()
		})
	};
	let visible = move || {
		dashboard.with(|d| VariantVisibility::for_mode(d.panel(purpose).mode).shows(kind))
	};
	let field_name = format!("{OPTIONS_FIELD}{LIST_MARKER}");

	view! {
		<div
			id=format!("{}_{}", purpose.slug(), kind.as_str())
			class=move || if visible() { "dropdown-variant" } else { "dropdown-variant d-none" }
		>
			<div id=purpose.dropdown_id(kind) class="dropdown-menu">
				<For
					each=rows
					key=|row| (row.id.clone(), row.label.clone())
					children=move |row| {
						let (checked_id, disabled_id) = (row.id.clone(), row.id.clone());
						let checked = move || dashboard.with(|d| d.is_checked(&checked_id));
						view! {
							<label class="dropdown-item">
								<input
									type="checkbox"
									name=field_name.clone()
									id=row.id
									value=row.value
									class=purpose.group_name()
									prop:checked=checked
									prop:disabled=move || {
										dashboard
											.with(|d| {
												d.panel(purpose)
													.group
													.member(&disabled_id)
													.is_some_and(|m| m.disabled)
											})
									}
								/>
								" "
								{row.label}
							</label>
						}
					}
				/>
			</div>
		</div>
	}
}

/// Summary table of the issue/flag panel. Sub rows are appended after the
/// chart row by the chart surface.
#[component]
fn IssueFlagTable() -> impl IntoView {
	view! {
		<table id=SUMMARY_TABLE_ID class="table d-none">
			<tbody>
				<tr>
					<td>
						<GraphSurface target="issueFlagsCounterGraph" />
					</td>
				</tr>
			</tbody>
		</table>
	}
}

/// A filter form (mode selector, both entity dropdowns) with the graphs it drives.
#[component]
pub fn FilterPanelView(
	/// Selection state shared by all panels.
	dashboard: RwSignal<DashboardState>,
	/// Which graphs this panel drives.
	purpose: Purpose,
	/// Sends the graph calls a change produces.
	requester: RequesterHandle,
) -> impl IntoView {
	let on_mode_change = move |ev: leptos::ev::Event| {
		let mode = Mode::from_selector(&event_target_value(&ev));
		dashboard.update(|d| d.set_mode(purpose, mode));
	};

	let on_option_change = move |ev: leptos::ev::Event| {
		let Some(input) = ev
			.target()
			.and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
		else {
			return;
		};
		let (id, checked) = (input.id(), input.checked());
		let mut outcome = None;
		dashboard.update(|d| outcome = d.change(&id, checked));
		let Some(outcome) = outcome else {
			return;
		};
		if outcome.reverted {
			input.set_checked(false);
		}
		requester.with_value(|r| dispatch(r, outcome.calls));
	};

	let graphs = match purpose {
		Purpose::IssueFlagCounter => view! { <IssueFlagTable /> }.into_any(),
		other => other
			.targets()
			.iter()
			.map(|target| view! { <GraphSurface target=*target /> })
			.collect_view()
			.into_any(),
	};

	view! {
		<article class="filter-panel">
			<h2>{purpose.title()}</h2>
			<form id=format!("{}_form", purpose.slug()) class="filter-panel__form">
				<select
					name="mode"
					class="form-select"
					prop:value=move || dashboard.with(|d| d.panel(purpose).mode.as_str())
					on:change=on_mode_change
				>
					<option value=Mode::PublishingCountry.as_str()>"Publishing country"</option>
					<option value=Mode::Publisher.as_str()>"Publisher"</option>
				</select>
				<div class="dropdownList" on:change=on_option_change>
					<OptionList dashboard=dashboard purpose=purpose kind=EntityKind::Country />
					<OptionList dashboard=dashboard purpose=purpose kind=EntityKind::Organisation />
				</div>
			</form>
			<div class="filter-panel__graphs">{graphs}</div>
		</article>
	}
}
