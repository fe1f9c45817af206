use std::cell::RefCell;
use std::future::Future;

use log::{debug, warn};

use super::tracker::RequestTracker;
use super::types::{
	ChartSpec, GraphCall, GraphMethod, GraphRequestDescriptor, GraphResponse, RenderConfig,
	sub_target_id,
};
use crate::components::filters::Mode;
use crate::error::DashboardError;

/// Backend side of a graph request.
pub trait GraphBackend {
	/// Send the descriptor and resolve to the raw response body.
	fn fetch_graph(
		&self,
		descriptor: &GraphRequestDescriptor,
	) -> impl Future<Output = Result<String, DashboardError>>;
}

/// Where charts end up. The browser implementation drives Plotly; tests record calls.
pub trait ChartSurface {
	/// Empty the chart at `target`.
	fn clear(&self, target: &str) -> Result<(), DashboardError>;
	/// Draw `chart` into `target`, replacing what was there.
	fn render(
		&self,
		target: &str,
		chart: &ChartSpec,
		config: RenderConfig,
	) -> Result<(), DashboardError>;
	/// Show or hide the issue/flag summary table.
	fn set_summary_visible(&self, visible: bool) -> Result<(), DashboardError>;
	/// Remove every sub row from the summary table.
	fn clear_sub_rows(&self) -> Result<(), DashboardError>;
	/// Append a summary table row holding an element with id `sub_target`.
	fn append_sub_row(&self, sub_target: &str) -> Result<(), DashboardError>;
	/// Show (`Some`) or hide (`None`) the inline status message next to `target`.
	fn set_status(&self, target: &str, message: Option<&str>) -> Result<(), DashboardError>;
}

/// What happened to a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
	/// No target to draw into.
	Skipped,
	/// Nothing selected; the target was emptied without calling the backend.
	Cleared,
	/// The response was drawn.
	Rendered,
	/// A newer request for the same target was issued while this one was pending.
	Stale,
}

/// Decision taken before anything goes over the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestPlan {
	/// No target.
	Skip,
	/// Nothing selected: empty the target.
	Clear {
		/// Also hide the issue/flag summary table.
		hide_summary: bool,
	},
	/// Ask the backend.
	Send(GraphRequestDescriptor),
}

/// Decide what a call needs: nothing, a cleared target or a backend request.
pub fn plan(call: &GraphCall) -> RequestPlan {
	if call.target.is_empty() {
		return RequestPlan::Skip;
	}
	let data = call.form.data().filter(|data| data.has_options());
	match data {
		Some(data) => {
			let mode = data.mode().map(Mode::from_selector);
			RequestPlan::Send(GraphRequestDescriptor {
				method: call.method,
				mode,
				request: Some(data.request_fields()),
				chart_variant: call.chart_variant,
				result_limit: call.result_limit,
			})
		}
		None if !call.method.needs_options() => {
			RequestPlan::Send(GraphRequestDescriptor::bare(call.method))
		}
		None => RequestPlan::Clear {
			hide_summary: call.method == GraphMethod::DrawIssuesAndFlags,
		},
	}
}

/// Turns graph calls into backend requests and renders whatever comes back,
/// provided it is still the newest answer for its target.
pub struct GraphRequester<B, S> {
	backend: B,
	surface: S,
	tracker: RefCell<RequestTracker>,
}

impl<B: GraphBackend, S: ChartSurface> GraphRequester<B, S> {
	/// Requester with no requests issued yet.
	pub fn new(backend: B, surface: S) -> Self {
		Self {
			backend,
			surface,
			tracker: RefCell::new(RequestTracker::default()),
		}
	}

	/// The backend collaborator.
	pub fn backend(&self) -> &B {
		&self.backend
	}

	/// The chart surface collaborator.
	pub fn surface(&self) -> &S {
		&self.surface
	}

	/// Carry out one graph call. Transport failures are also shown next to
	/// the target; stale answers are dropped whether they succeeded or not.
	pub async fn request(&self, call: GraphCall) -> Result<RequestOutcome, DashboardError> {
		let target = call.target.as_str();
		let descriptor = match plan(&call) {
			RequestPlan::Skip => return Ok(RequestOutcome::Skipped),
			RequestPlan::Clear { hide_summary } => {
				self.tracker.borrow_mut().invalidate(target);
				self.surface.clear(target)?;
				self.surface.set_status(target, None)?;
				if hide_summary {
					self.surface.set_summary_visible(false)?;
					self.surface.clear_sub_rows()?;
				}
				return Ok(RequestOutcome::Cleared);
			}
			RequestPlan::Send(descriptor) => descriptor,
		};

		let ticket = self.tracker.borrow_mut().begin(target);
		debug!(
			"requesting {} for #{target} (generation {})",
			descriptor.method.as_str(),
			ticket.generation
		);
		let fetched = self.backend.fetch_graph(&descriptor).await;

		if !self.tracker.borrow().is_current(&ticket) {
			debug!("discarding stale {} response for #{target}", descriptor.method.as_str());
			return Ok(RequestOutcome::Stale);
		}

		let payload = match fetched {
			Ok(payload) => payload,
			Err(err) => {
				warn!("{} for #{target} failed: {err}", descriptor.method.as_str());
				self.surface.set_status(target, Some(&err.to_string()))?;
				return Err(err);
			}
		};

		let response = match GraphResponse::parse(&payload) {
			Ok(response) => response,
			Err(err) => {
				warn!("ignoring {} response for #{target}: {err}", descriptor.method.as_str());
				return Err(err);
			}
		};

		self.surface.set_status(target, None)?;
		self.surface
			.render(target, &response.chart, RenderConfig::for_method(call.method))?;

		if call.method == GraphMethod::DrawIssuesAndFlags {
			self.render_issue_flags(&response)?;
		}
		Ok(RequestOutcome::Rendered)
	}

	fn render_issue_flags(&self, response: &GraphResponse) -> Result<(), DashboardError> {
		self.surface.set_summary_visible(true)?;
		self.surface.clear_sub_rows()?;
		for (key, chart) in &response.sub_charts {
			let sub_target = sub_target_id(key);
			self.surface.append_sub_row(&sub_target)?;
			self.surface.render(&sub_target, chart, RenderConfig::INTERACTIVE)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::filters::{FilterForm, FormSnapshot, serialize_form};
	use crate::components::graph::ChartVariant;

	fn call_with(fields: &[(&str, &str)], method: GraphMethod) -> GraphCall {
		let mut form = FilterForm::default();
		for (name, value) in fields {
			form.push(*name, *value);
		}
		GraphCall::new(serialize_form(Some(&form)), method, "target")
	}

	#[test]
	fn empty_selection_clears_instead_of_sending() {
		let call = call_with(&[("mode", "publisher")], GraphMethod::DrawDatasets);
		assert_eq!(plan(&call), RequestPlan::Clear { hide_summary: false });

		let call = call_with(&[("mode", "publisher")], GraphMethod::DrawIssuesAndFlags);
		assert_eq!(plan(&call), RequestPlan::Clear { hide_summary: true });
	}

	#[test]
	fn totals_are_sent_without_a_form() {
		let call = GraphCall::new(
			FormSnapshot::NoFormContext,
			GraphMethod::DrawInfrastructuresTotal,
			"infrastructureDatasetsTableGraph",
		);
		assert_eq!(
			plan(&call),
			RequestPlan::Send(GraphRequestDescriptor::bare(GraphMethod::DrawInfrastructuresTotal))
		);
	}

	#[test]
	fn missing_target_is_skipped() {
		let mut call = call_with(&[("options[]", "NL")], GraphMethod::DrawDatasets);
		call.target.clear();
		assert_eq!(plan(&call), RequestPlan::Skip);
	}

	#[test]
	fn selection_becomes_descriptor() {
		let call = call_with(
			&[("mode", "publishing_country"), ("options[]", "NL")],
			GraphMethod::DrawSpecimens,
		)
		.with_variant(Some(ChartVariant::Bar));
		let RequestPlan::Send(descriptor) = plan(&call) else {
			panic!("expected a request");
		};
		assert_eq!(descriptor.mode, Some(Mode::PublishingCountry));
		let body: serde_json::Value = serde_json::from_str(&descriptor.to_json().unwrap()).unwrap();
		assert_eq!(
			body,
			serde_json::json!({
				"method": "draw_specimens",
				"mode": "publishing_country",
				"request": {"options": ["NL"]},
				"type": "bar"
			})
		);
	}
}
