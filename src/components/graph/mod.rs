//! Graph requests, stale-response tracking and chart rendering.

mod component;
mod render;
mod requester;
mod tracker;
mod types;

pub use component::GraphSurface;
pub use render::{BrowserSurface, SUMMARY_TABLE_ID, status_id};
pub use requester::{ChartSurface, GraphBackend, GraphRequester, RequestOutcome, RequestPlan, plan};
pub use tracker::{RequestTracker, Ticket};
pub use types::{
	ChartSpec, ChartVariant, GraphCall, GraphMethod, GraphRequestDescriptor, GraphResponse,
	RenderConfig, SUB_GRAPH_PREFIX, sub_target_id,
};
