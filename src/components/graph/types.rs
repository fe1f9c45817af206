use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::components::filters::{FieldValue, FormSnapshot, Mode};
use crate::error::DashboardError;

/// Prefix of the ids given to issue/flag sub-chart cells.
pub const SUB_GRAPH_PREFIX: &str = "issueFlagSubGraph";

/// The graph kinds the backend knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphMethod {
	/// Datasets per selected entity.
	DrawDatasets,
	/// Specimen counts, as a pie or bar chart.
	DrawSpecimens,
	/// Digitisation progress of the selected entity.
	DrawSpecimensProgress,
	/// Issue and flag counters plus per-item sub-charts.
	DrawIssuesAndFlags,
	/// Dataset totals per infrastructure; takes no selection.
	DrawInfrastructuresTotal,
}

impl GraphMethod {
	/// Wire name of the method.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::DrawDatasets => "draw_datasets",
			Self::DrawSpecimens => "draw_specimens",
			Self::DrawSpecimensProgress => "draw_specimens_progress",
			Self::DrawIssuesAndFlags => "draw_issues_and_flags",
			Self::DrawInfrastructuresTotal => "draw_infrastructures_total",
		}
	}

	/// The totals table is the only graph drawn without any selection.
	pub fn needs_options(self) -> bool {
		self != Self::DrawInfrastructuresTotal
	}
}

/// Chart style requested from the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartVariant {
	/// Share of the whole.
	Pie,
	/// Side-by-side comparison.
	Bar,
}

/// Body sent to the graph endpoint. Built fresh for every request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphRequestDescriptor {
	/// Graph to draw.
	pub method: GraphMethod,
	/// Aggregation dimension from the panel's mode selector.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mode: Option<Mode>,
	/// Selected options, e.g. `{"options": ["NL"]}`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub request: Option<BTreeMap<String, FieldValue>>,
	/// Sent as `type`.
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub chart_variant: Option<ChartVariant>,
	/// Sent as `return_length`.
	#[serde(rename = "return_length", skip_serializing_if = "Option::is_none")]
	pub result_limit: Option<u32>,
}

impl GraphRequestDescriptor {
	/// Descriptor for a graph that takes no selection at all.
	pub fn bare(method: GraphMethod) -> Self {
		Self {
			method,
			mode: None,
			request: None,
			chart_variant: None,
			result_limit: None,
		}
	}

	/// JSON body as the graph endpoint expects it.
	pub fn to_json(&self) -> Result<String, DashboardError> {
		Ok(serde_json::to_string(self)?)
	}
}

/// One graph a user interaction asks for: the form state at click time plus
/// where and how to draw the result.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphCall {
	/// Serialized panel form, or its absence.
	pub form: FormSnapshot,
	/// Graph to draw.
	pub method: GraphMethod,
	/// Element id to draw into; empty means there is nowhere to draw.
	pub target: String,
	/// Optional chart style.
	pub chart_variant: Option<ChartVariant>,
	/// Optional cap on returned items.
	pub result_limit: Option<u32>,
}

impl GraphCall {
	/// Call without a chart style or limit.
	pub fn new(form: FormSnapshot, method: GraphMethod, target: impl Into<String>) -> Self {
		Self {
			form,
			method,
			target: target.into(),
			chart_variant: None,
			result_limit: None,
		}
	}

	/// Set the chart style.
	pub fn with_variant(mut self, variant: Option<ChartVariant>) -> Self {
		self.chart_variant = variant;
		self
	}

	/// Set the result limit.
	pub fn with_limit(mut self, limit: Option<u32>) -> Self {
		self.result_limit = limit;
		self
	}
}

/// Plotly traces and layout, forwarded untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
	/// Trace list.
	pub data: Value,
	/// Layout object.
	pub layout: Value,
}

impl ChartSpec {
	fn from_pair(value: &Value, context: &str) -> Result<Self, DashboardError> {
		match value.as_array().map(Vec::as_slice) {
			Some([data, layout, ..]) => Ok(Self {
				data: data.clone(),
				layout: layout.clone(),
			}),
			_ => Err(DashboardError::MalformedResponse(format!(
				"{context} is not a [data, layout] pair"
			))),
		}
	}
}

/// A parsed graph endpoint answer.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphResponse {
	/// Chart for the request's own target.
	pub chart: ChartSpec,
	/// Issue/flag sub-charts in payload order.
	pub sub_charts: Vec<(String, ChartSpec)>,
}

impl GraphResponse {
	/// Parse `[data, layout]` or `[data, layout, subCharts]`.
	///
	/// The backend serializes the figure to a string and then JSON-encodes that
	/// string again, so a top-level string is unwrapped once.
	pub fn parse(payload: &str) -> Result<Self, DashboardError> {
		let mut value: Value = serde_json::from_str(payload)?;
		if let Value::String(inner) = &value {
			value = serde_json::from_str(inner)?;
		}
		Self::from_value(&value)
	}

	/// Like [`GraphResponse::parse`] for an already decoded value.
	pub fn from_value(value: &Value) -> Result<Self, DashboardError> {
		let Some(items) = value.as_array() else {
			return Err(DashboardError::MalformedResponse(
				"payload is not an array".into(),
			));
		};
		let chart = ChartSpec::from_pair(value, "payload")?;

		let sub_charts = match items.get(2) {
			None | Some(Value::Null) => Vec::new(),
			Some(Value::Object(map)) => map
				.iter()
				.map(|(key, pair)| Ok((key.clone(), ChartSpec::from_pair(pair, key)?)))
				.collect::<Result<_, DashboardError>>()?,
			Some(Value::Array(list)) => list
				.iter()
				.enumerate()
				.map(|(idx, pair)| {
					let key = idx.to_string();
					let spec = ChartSpec::from_pair(pair, &key)?;
					Ok((key, spec))
				})
				.collect::<Result<_, DashboardError>>()?,
			Some(_) => {
				return Err(DashboardError::MalformedResponse(
					"sub-charts are neither a mapping nor a list".into(),
				));
			}
		};

		Ok(Self { chart, sub_charts })
	}
}

/// Element id of the cell a sub-chart is drawn into.
pub fn sub_target_id(key: &str) -> String {
	format!("{SUB_GRAPH_PREFIX}{key}")
}

/// How the chart library should treat a drawn chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
	/// Resize with the container.
	pub responsive: bool,
	/// Show the chart toolbar.
	pub show_controls: bool,
	/// Disable all interaction.
	pub static_only: bool,
}

impl RenderConfig {
	/// Responsive, no toolbar, interactive.
	pub const INTERACTIVE: Self = Self {
		responsive: true,
		show_controls: false,
		static_only: false,
	};

	/// Issue/flag summaries are drawn static; everything else is interactive.
	pub fn for_method(method: GraphMethod) -> Self {
		Self {
			static_only: method == GraphMethod::DrawIssuesAndFlags,
			..Self::INTERACTIVE
		}
	}
}
