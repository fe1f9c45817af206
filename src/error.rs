//! Error taxonomy shared by the API client, the requester and the chart surface.

use thiserror::Error;

/// Everything that can go wrong between a filter click and a drawn chart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
	/// The request never produced an HTTP response.
	#[error("network request failed: {0}")]
	Transport(String),

	/// The backend answered with a non-success status.
	#[error("backend answered with HTTP {status}")]
	Http {
		/// Response status code.
		status: u16,
	},

	/// The backend did not answer within the configured window.
	#[error("backend did not answer within {millis} ms")]
	Timeout {
		/// Configured timeout.
		millis: u32,
	},

	/// The payload did not have the expected `[data, layout, subCharts?]` shape.
	#[error("malformed graph response: {0}")]
	MalformedResponse(String),

	/// A DOM element the dashboard relies on is absent from the page.
	#[error("element #{0} is missing from the page")]
	MissingElement(String),

	/// The charting library rejected the call.
	#[error("chart rendering failed: {0}")]
	Render(String),

	/// `window.DASHBOARD_CONFIG` could not be read.
	#[error("invalid dashboard configuration: {0}")]
	Config(String),
}

impl DashboardError {
	/// Transport-level failures are reported inline next to the chart; the
	/// other kinds only reach the log.
	pub fn is_user_visible(&self) -> bool {
		matches!(
			self,
			Self::Transport(_) | Self::Http { .. } | Self::Timeout { .. }
		)
	}
}

impl From<gloo_net::Error> for DashboardError {
	fn from(err: gloo_net::Error) -> Self {
		match err {
			gloo_net::Error::SerdeError(e) => Self::MalformedResponse(e.to_string()),
			other => Self::Transport(other.to_string()),
		}
	}
}

impl From<serde_json::Error> for DashboardError {
	fn from(err: serde_json::Error) -> Self {
		Self::MalformedResponse(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_network_failures_are_user_visible() {
		assert!(DashboardError::Timeout { millis: 10 }.is_user_visible());
		assert!(DashboardError::Http { status: 502 }.is_user_visible());
		assert!(DashboardError::Transport("offline".into()).is_user_visible());
		assert!(!DashboardError::MalformedResponse("[]".into()).is_user_visible());
		assert!(!DashboardError::MissingElement("datasetsGraph".into()).is_user_visible());
	}

	#[test]
	fn messages_name_the_failure() {
		let msg = DashboardError::Timeout { millis: 15000 }.to_string();
		assert_eq!(msg, "backend did not answer within 15000 ms");
	}
}
