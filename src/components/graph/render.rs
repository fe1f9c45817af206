use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use super::requester::ChartSurface;
use super::types::{ChartSpec, RenderConfig};
use crate::error::DashboardError;

/// Table holding the issue/flag chart and its per-item sub rows.
pub const SUMMARY_TABLE_ID: &str = "issueFlagsCounterTable";
const SUB_ROW_CLASS: &str = "issueFlagSubRow";
const HIDDEN_CLASS: &str = "d-none";

#[wasm_bindgen]
extern "C" {
	#[wasm_bindgen(js_namespace = Plotly, js_name = newPlot, catch)]
	fn new_plot(
		target: &str,
		data: &JsValue,
		layout: &JsValue,
		config: &JsValue,
	) -> Result<js_sys::Promise, JsValue>;
}

/// Plotly's spelling of [`RenderConfig`].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlotConfig {
	responsive: bool,
	display_mode_bar: bool,
	static_plot: bool,
}

impl From<RenderConfig> for PlotConfig {
	fn from(config: RenderConfig) -> Self {
		Self {
			responsive: config.responsive,
			display_mode_bar: config.show_controls,
			static_plot: config.static_only,
		}
	}
}

/// Id of the inline status line rendered under a graph surface.
pub fn status_id(target: &str) -> String {
	format!("{target}Status")
}

/// Draws into the live page through Plotly.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSurface;

impl BrowserSurface {
	fn document(&self) -> Result<Document, DashboardError> {
		web_sys::window()
			.and_then(|w| w.document())
			.ok_or_else(|| DashboardError::MissingElement("document".into()))
	}

	fn element(&self, id: &str) -> Result<Element, DashboardError> {
		self.document()?
			.get_element_by_id(id)
			.ok_or_else(|| DashboardError::MissingElement(id.into()))
	}

	fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, DashboardError> {
		value
			.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
			.map_err(|e| DashboardError::Render(e.to_string()))
	}

	fn set_hidden(element: &Element, hidden: bool) -> Result<(), DashboardError> {
		let classes = element.class_list();
		let result = if hidden {
			classes.add_1(HIDDEN_CLASS)
		} else {
			classes.remove_1(HIDDEN_CLASS)
		};
		result.map_err(|e| DashboardError::Render(format!("{e:?}")))
	}
}

impl ChartSurface for BrowserSurface {
	fn clear(&self, target: &str) -> Result<(), DashboardError> {
		self.element(target)?.set_inner_html("");
		Ok(())
	}

	fn render(
		&self,
		target: &str,
		chart: &ChartSpec,
		config: RenderConfig,
	) -> Result<(), DashboardError> {
		self.element(target)?;
		let data = Self::to_js(&chart.data)?;
		let layout = Self::to_js(&chart.layout)?;
		let config = Self::to_js(&PlotConfig::from(config))?;
		new_plot(target, &data, &layout, &config)
			.map(drop)
			.map_err(|e| DashboardError::Render(format!("{e:?}")))
	}

	fn set_summary_visible(&self, visible: bool) -> Result<(), DashboardError> {
		Self::set_hidden(&self.element(SUMMARY_TABLE_ID)?, !visible)
	}

	fn clear_sub_rows(&self) -> Result<(), DashboardError> {
		let rows = self
			.element(SUMMARY_TABLE_ID)?
			.query_selector_all(&format!("tr.{SUB_ROW_CLASS}"))
			.map_err(|e| DashboardError::Render(format!("{e:?}")))?;
		for idx in 0..rows.length() {
			if let Some(row) = rows.item(idx).and_then(|n| n.dyn_into::<Element>().ok()) {
				row.remove();
			}
		}
		Ok(())
	}

	fn append_sub_row(&self, sub_target: &str) -> Result<(), DashboardError> {
		let document = self.document()?;
		let table = self.element(SUMMARY_TABLE_ID)?;
		let js_err = |e: JsValue| DashboardError::Render(format!("{e:?}"));

		let row = document.create_element("tr").map_err(js_err)?;
		row.set_class_name(SUB_ROW_CLASS);
		let cell = document.create_element("td").map_err(js_err)?;
		cell.set_id(sub_target);
		row.append_child(&cell).map_err(js_err)?;

		let rows = table.query_selector_all("tr").map_err(js_err)?;
		let last = rows
			.length()
			.checked_sub(1)
			.and_then(|idx| rows.item(idx))
			.and_then(|n| n.dyn_into::<Element>().ok());
		match last {
			Some(last) => last.after_with_node_1(&row).map_err(js_err),
			None => table.append_child(&row).map(drop).map_err(js_err),
		}
	}

	fn set_status(&self, target: &str, message: Option<&str>) -> Result<(), DashboardError> {
		let status = self.element(&status_id(target))?;
		status.set_text_content(message);
		Self::set_hidden(&status, message.is_none())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn plot_config_uses_plotly_keys() {
		let json = serde_json::to_value(PlotConfig::from(RenderConfig {
			responsive: true,
			show_controls: false,
			static_only: true,
		}))
		.unwrap();
		assert_eq!(
			json,
			serde_json::json!({"responsive": true, "displayModeBar": false, "staticPlot": true})
		);
	}

	#[test]
	fn status_line_sits_next_to_its_target() {
		assert_eq!(status_id("datasetsGraph"), "datasetsGraphStatus");
	}
}
