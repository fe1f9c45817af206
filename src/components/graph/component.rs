use leptos::prelude::*;

use super::render::status_id;

/// A chart target plus the inline status line used for request failures.
#[component]
pub fn GraphSurface(
	/// Element id the chart is drawn into.
	#[prop(into)]
	target: String,
) -> impl IntoView {
	let status = status_id(&target);

	view! {
		<div class="graph-surface">
			<div id=target class="graph" />
			<p id=status class="graph-status d-none" role="status" />
		</div>
	}
}
