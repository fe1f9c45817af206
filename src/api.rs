//! HTTP client for the graph, countries and organisations endpoints.

use std::future::Future;
use std::pin::pin;

use futures::future::{Either, select};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use log::debug;
use serde_json::{Map, Value};

use crate::components::filters::{FilterEntity, OrganisationRecord};
use crate::components::graph::{GraphBackend, GraphRequestDescriptor};
use crate::config::{DashboardConfig, GraphVerb};
use crate::error::DashboardError;

const GRAPH_PATH: &str = "get_graph";
const COUNTRIES_PATH: &str = "get_countries";
const ORGANISATIONS_PATH: &str = "get_organisations";

/// Talks to the dashboard backend described by a [`DashboardConfig`].
#[derive(Clone, Debug)]
pub struct ApiClient {
	config: DashboardConfig,
}

impl ApiClient {
	/// Client for the endpoints under `config.api_base`.
	pub fn new(config: DashboardConfig) -> Self {
		Self { config }
	}

	/// Race `fut` against the configured timeout.
	async fn bounded<T>(
		&self,
		fut: impl Future<Output = Result<T, DashboardError>>,
	) -> Result<T, DashboardError> {
		let millis = self.config.timeout_ms;
		match select(pin!(fut), pin!(TimeoutFuture::new(millis))).await {
			Either::Left((result, _)) => result,
			Either::Right(_) => Err(DashboardError::Timeout { millis }),
		}
	}

	async fn get(&self, path: &str) -> Result<Response, DashboardError> {
		let url = self.config.endpoint(path);
		self.bounded(async { checked(Request::get(&url).send().await?) })
			.await
	}

	/// Publishing countries keyed by country code, in endpoint order.
	pub async fn fetch_countries(&self) -> Result<Vec<FilterEntity>, DashboardError> {
		let response = self.get(COUNTRIES_PATH).await?;
		let countries: Map<String, Value> = response.json().await?;
		Ok(countries_from_map(countries))
	}

	/// Publishing organisations with their identifiers already normalized.
	pub async fn fetch_organisations(&self) -> Result<Vec<FilterEntity>, DashboardError> {
		let response = self.get(ORGANISATIONS_PATH).await?;
		let records: Vec<OrganisationRecord> = response.json().await?;
		Ok(records.into_iter().map(FilterEntity::from).collect())
	}
}

impl GraphBackend for ApiClient {
	async fn fetch_graph(
		&self,
		descriptor: &GraphRequestDescriptor,
	) -> Result<String, DashboardError> {
		let url = self.config.endpoint(GRAPH_PATH);
		let body = descriptor.to_json()?;
		debug!("{:?} {url} {body}", self.config.graph_verb);

		self.bounded(async {
			let response = match self.config.graph_verb {
				GraphVerb::Post => {
					Request::post(&url)
						.header("Content-Type", "application/json")
						.body(body.as_str())?
						.send()
						.await?
				}
				GraphVerb::Get => {
					Request::get(&url)
						.query([("data", body.as_str())])
						.send()
						.await?
				}
			};
			Ok(checked(response)?.text().await?)
		})
		.await
	}
}

fn checked(response: Response) -> Result<Response, DashboardError> {
	if response.ok() {
		Ok(response)
	} else {
		Err(DashboardError::Http {
			status: response.status(),
		})
	}
}

/// `{code: name}` as served by the countries endpoint. Non-string names are skipped.
pub fn countries_from_map(map: Map<String, Value>) -> Vec<FilterEntity> {
	map.into_iter()
		.filter_map(|(code, name)| match name {
			Value::String(name) => Some(FilterEntity::country(code, name)),
			_ => None,
		})
		.collect()
}
