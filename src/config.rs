//! Runtime configuration read from the host page.
//!
//! The page may define `window.DASHBOARD_CONFIG = { api_base, graph_verb, timeout_ms }`
//! before loading the bundle. Missing keys fall back to the local sandbox defaults.

use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::DashboardError;

const CONFIG_GLOBAL: &str = "DASHBOARD_CONFIG";

/// How graph descriptors travel to the graph endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GraphVerb {
	/// JSON body on a `POST`.
	#[default]
	Post,
	/// JSON string in the `data` query parameter of a `GET`.
	Get,
}

/// Dashboard settings; every field has a default.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
	/// Base URL the endpoint paths are appended to.
	pub api_base: String,
	/// Verb used for the graph endpoint.
	pub graph_verb: GraphVerb,
	/// Upper bound for a single backend call.
	pub timeout_ms: u32,
}

impl Default for DashboardConfig {
	fn default() -> Self {
		Self {
			api_base: "http://127.0.0.1:5000".into(),
			graph_verb: GraphVerb::Post,
			timeout_ms: 15_000,
		}
	}
}

impl DashboardConfig {
	/// Read `window.DASHBOARD_CONFIG`, falling back to defaults when absent.
	pub fn from_window() -> Result<Self, DashboardError> {
		let Some(window) = web_sys::window() else {
			return Ok(Self::default());
		};
		let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
			.map_err(|e| DashboardError::Config(format!("{e:?}")))?;
		if value.is_undefined() || value.is_null() {
			return Ok(Self::default());
		}
		serde_wasm_bindgen::from_value(value)
			.map(Self::normalized)
			.map_err(|e| DashboardError::Config(e.to_string()))
	}

	fn normalized(mut self) -> Self {
		while self.api_base.ends_with('/') {
			self.api_base.pop();
		}
		self
	}

	/// Absolute URL of an endpoint path such as `get_graph`.
	pub fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.api_base, path.trim_start_matches('/'))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_config_keeps_defaults() {
		let config: DashboardConfig =
			serde_json::from_str(r#"{"graph_verb": "GET"}"#).expect("valid config");
		assert_eq!(config.graph_verb, GraphVerb::Get);
		assert_eq!(config.api_base, "http://127.0.0.1:5000");
		assert_eq!(config.timeout_ms, 15_000);
	}

	#[test]
	fn endpoint_joins_without_double_slashes() {
		let config = DashboardConfig {
			api_base: "https://api.example.org/v1/".into(),
			..DashboardConfig::default()
		}
		.normalized();
		assert_eq!(config.endpoint("/get_graph"), "https://api.example.org/v1/get_graph");
		assert_eq!(config.endpoint("get_countries"), "https://api.example.org/v1/get_countries");
	}
}
