use std::cell::RefCell;
use std::collections::VecDeque;
use std::pin::pin;

use futures::channel::oneshot;
use futures::executor::block_on;
use serde_json::{Value, json};

use specimen_dashboard::api::countries_from_map;
use specimen_dashboard::components::filters::{
	DashboardState, EntityKind, FilterEntity, FormSnapshot,
};
use specimen_dashboard::components::graph::{
	ChartSpec, ChartSurface, GraphBackend, GraphCall, GraphMethod, GraphRequestDescriptor,
	GraphRequester, RenderConfig, RequestOutcome,
};
use specimen_dashboard::error::DashboardError;

type Reply = Result<String, DashboardError>;

enum Queued {
	Ready(Reply),
	Pending(oneshot::Receiver<Reply>),
}

#[derive(Default)]
struct FakeBackend {
	sent: RefCell<Vec<GraphRequestDescriptor>>,
	replies: RefCell<VecDeque<Queued>>,
}

impl FakeBackend {
	fn replying(replies: impl IntoIterator<Item = Reply>) -> Self {
		let backend = Self::default();
		backend
			.replies
			.borrow_mut()
			.extend(replies.into_iter().map(Queued::Ready));
		backend
	}

	fn pending(&self) -> oneshot::Sender<Reply> {
		let (tx, rx) = oneshot::channel();
		self.replies.borrow_mut().push_back(Queued::Pending(rx));
		tx
	}

	fn sent(&self) -> Vec<Value> {
		self.sent
			.borrow()
			.iter()
			.map(|d| serde_json::to_value(d).unwrap())
			.collect()
	}
}

impl GraphBackend for FakeBackend {
	async fn fetch_graph(
		&self,
		descriptor: &GraphRequestDescriptor,
	) -> Result<String, DashboardError> {
		self.sent.borrow_mut().push(descriptor.clone());
		let queued = self.replies.borrow_mut().pop_front();
		match queued {
			Some(Queued::Ready(reply)) => reply,
			Some(Queued::Pending(rx)) => rx
				.await
				.unwrap_or_else(|_| Err(DashboardError::Transport("reply dropped".into()))),
			None => Err(DashboardError::Transport("no reply queued".into())),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
enum Drawn {
	Cleared(String),
	Chart { target: String, data: Value, static_only: bool },
	Summary(bool),
	SubRowsCleared,
	SubRow(String),
	Status(String, Option<String>),
}

#[derive(Default)]
struct FakeSurface {
	log: RefCell<Vec<Drawn>>,
}

impl FakeSurface {
	fn log(&self) -> Vec<Drawn> {
		self.log.borrow().clone()
	}

	fn charts(&self) -> Vec<String> {
		self.log
			.borrow()
			.iter()
			.filter_map(|d| match d {
				Drawn::Chart { target, .. } => Some(target.clone()),
				_ => None,
			})
			.collect()
	}

	fn push(&self, drawn: Drawn) -> Result<(), DashboardError> {
		self.log.borrow_mut().push(drawn);
		Ok(())
	}
}

impl ChartSurface for FakeSurface {
	fn clear(&self, target: &str) -> Result<(), DashboardError> {
		self.push(Drawn::Cleared(target.into()))
	}

	fn render(
		&self,
		target: &str,
		chart: &ChartSpec,
		config: RenderConfig,
	) -> Result<(), DashboardError> {
		self.push(Drawn::Chart {
			target: target.into(),
			data: chart.data.clone(),
			static_only: config.static_only,
		})
	}

	fn set_summary_visible(&self, visible: bool) -> Result<(), DashboardError> {
		self.push(Drawn::Summary(visible))
	}

	fn clear_sub_rows(&self) -> Result<(), DashboardError> {
		self.push(Drawn::SubRowsCleared)
	}

	fn append_sub_row(&self, sub_target: &str) -> Result<(), DashboardError> {
		self.push(Drawn::SubRow(sub_target.into()))
	}

	fn set_status(&self, target: &str, message: Option<&str>) -> Result<(), DashboardError> {
		self.push(Drawn::Status(target.into(), message.map(str::to_string)))
	}
}

fn dashboard_with_netherlands() -> DashboardState {
	let countries = countries_from_map(
		serde_json::from_str(r#"{"NL": "Netherlands"}"#).expect("valid countries payload"),
	);
	let mut state = DashboardState::new();
	state.populate(&countries, EntityKind::Country);
	state
}

fn chart_payload(marker: &str) -> String {
	json!([[{"type": "bar", "name": marker}], {"title": marker}]).to_string()
}

#[test]
fn dataset_click_requests_and_renders_one_graph() {
	let mut state = dashboard_with_netherlands();
	let requester = GraphRequester::new(
		FakeBackend::replying([Ok(chart_payload("nl"))]),
		FakeSurface::default(),
	);

	let outcome = state.change("datasetsNL", true).expect("option is registered");
	assert!(!outcome.reverted);
	assert_eq!(outcome.calls.len(), 1);

	for call in outcome.calls {
		assert_eq!(block_on(requester.request(call)), Ok(RequestOutcome::Rendered));
	}

	let sent = requester.backend().sent();
	assert_eq!(sent.len(), 1);
	assert_eq!(sent[0]["method"], "draw_datasets");
	assert_eq!(sent[0]["request"], json!({"options": ["NL"]}));
	assert_eq!(requester.surface().charts(), ["datasetsGraph"]);
	assert!(requester.surface().log().contains(&Drawn::Chart {
		target: "datasetsGraph".into(),
		data: json!([{"type": "bar", "name": "nl"}]),
		static_only: false,
	}));
}

#[test]
fn empty_selection_clears_without_network() {
	let mut state = dashboard_with_netherlands();
	let requester = GraphRequester::new(FakeBackend::default(), FakeSurface::default());

	state.change("datasetsNL", true);
	let outcome = state.change("datasetsNL", false).unwrap();
	for call in outcome.calls {
		assert_eq!(block_on(requester.request(call)), Ok(RequestOutcome::Cleared));
	}

	assert!(requester.backend().sent().is_empty());
	assert!(requester.surface().log().contains(&Drawn::Cleared("datasetsGraph".into())));
}

#[test]
fn clearing_issue_flags_hides_the_summary_table() {
	let mut state = dashboard_with_netherlands();
	let requester = GraphRequester::new(FakeBackend::default(), FakeSurface::default());

	state.change("issueFlagsCounterOptionNL", true);
	let outcome = state.change("issueFlagsCounterOptionNL", false).unwrap();
	for call in outcome.calls {
		block_on(requester.request(call)).unwrap();
	}

	let log = requester.surface().log();
	assert!(log.contains(&Drawn::Cleared("issueFlagsCounterGraph".into())));
	assert!(log.contains(&Drawn::Summary(false)));
	assert!(requester.backend().sent().is_empty());
}

#[test]
fn specimen_counter_click_fires_two_independent_requests() {
	let mut state = dashboard_with_netherlands();
	let requester = GraphRequester::new(
		FakeBackend::replying([Ok(chart_payload("pie")), Ok(chart_payload("progress"))]),
		FakeSurface::default(),
	);

	let outcome = state.change("speciesCounterOptionNL", true).unwrap();
	for call in outcome.calls {
		block_on(requester.request(call)).unwrap();
	}

	let sent = requester.backend().sent();
	assert_eq!(sent.len(), 2);
	assert_eq!(sent[0]["method"], "draw_specimens");
	assert_eq!(sent[0]["type"], "pie");
	assert_eq!(sent[1]["method"], "draw_specimens_progress");
	assert!(sent[1].get("type").is_none());
	assert_eq!(
		requester.surface().charts(),
		["speciesCounterGraph", "speciesProgressGraph"]
	);
}

#[test]
fn issue_flags_response_fills_the_summary_table() {
	let mut state = dashboard_with_netherlands();
	let payload = json!([
		[{"type": "table"}],
		{"height": 200},
		{"a": [[{"type": "scatter"}], {"height": 60}]}
	])
	.to_string();
	let requester =
		GraphRequester::new(FakeBackend::replying([Ok(payload)]), FakeSurface::default());

	let outcome = state.change("issueFlagsCounterOptionNL", true).unwrap();
	let [call] = <[GraphCall; 1]>::try_from(outcome.calls).expect("one request");
	assert_eq!(block_on(requester.request(call)), Ok(RequestOutcome::Rendered));

	assert_eq!(requester.backend().sent()[0]["return_length"], 10);
	let log = requester.surface().log();
	assert!(log.contains(&Drawn::Summary(true)));
	let rows: Vec<_> = log
		.iter()
		.filter_map(|d| match d {
			Drawn::SubRow(id) => Some(id.as_str()),
			_ => None,
		})
		.collect();
	assert_eq!(rows, ["issueFlagSubGrapha"]);
	assert!(log.contains(&Drawn::Chart {
		target: "issueFlagsCounterGraph".into(),
		data: json!([{"type": "table"}]),
		static_only: true,
	}));
	assert!(log.contains(&Drawn::Chart {
		target: "issueFlagSubGrapha".into(),
		data: json!([{"type": "scatter"}]),
		static_only: false,
	}));
}

#[test]
fn totals_are_drawn_without_a_selection() {
	let requester = GraphRequester::new(
		FakeBackend::replying([Ok(serde_json::to_string(&chart_payload("totals")).unwrap())]),
		FakeSurface::default(),
	);
	let call = GraphCall::new(
		FormSnapshot::NoFormContext,
		GraphMethod::DrawInfrastructuresTotal,
		"infrastructureDatasetsTableGraph",
	);

	assert_eq!(block_on(requester.request(call)), Ok(RequestOutcome::Rendered));
	assert_eq!(
		requester.backend().sent(),
		[json!({"method": "draw_infrastructures_total"})]
	);
	assert_eq!(requester.surface().charts(), ["infrastructureDatasetsTableGraph"]);
}

#[test]
fn out_of_order_response_is_discarded() {
	let mut state = dashboard_with_netherlands();
	state.populate(&[FilterEntity::country("DE", "Germany")], EntityKind::Country);
	let backend = FakeBackend::default();
	let first_reply = backend.pending();
	let second_reply = backend.pending();
	let requester = GraphRequester::new(backend, FakeSurface::default());

	let first = state.change("datasetsNL", true).unwrap().calls.remove(0);
	let second = state.change("datasetsDE", true).unwrap().calls.remove(0);

	block_on(async {
		let mut first = pin!(requester.request(first));
		let mut second = pin!(requester.request(second));
		assert!(futures::poll!(first.as_mut()).is_pending());
		assert!(futures::poll!(second.as_mut()).is_pending());

		second_reply.send(Ok(chart_payload("newest"))).unwrap();
		assert_eq!(second.await, Ok(RequestOutcome::Rendered));

		first_reply.send(Ok(chart_payload("oldest"))).unwrap();
		assert_eq!(first.await, Ok(RequestOutcome::Stale));
	});

	let drawn: Vec<_> = requester
		.surface()
		.log()
		.into_iter()
		.filter_map(|d| match d {
			Drawn::Chart { data, .. } => Some(data),
			_ => None,
		})
		.collect();
	assert_eq!(drawn, [json!([{"type": "bar", "name": "newest"}])]);
}

#[test]
fn clearing_a_target_discards_its_in_flight_response() {
	let mut state = dashboard_with_netherlands();
	let backend = FakeBackend::default();
	let late_reply = backend.pending();
	let requester = GraphRequester::new(backend, FakeSurface::default());

	let in_flight = state.change("datasetsNL", true).unwrap().calls.remove(0);
	let cleared = state.change("datasetsNL", false).unwrap().calls.remove(0);

	block_on(async {
		let mut in_flight = pin!(requester.request(in_flight));
		assert!(futures::poll!(in_flight.as_mut()).is_pending());
		assert_eq!(requester.request(cleared).await, Ok(RequestOutcome::Cleared));

		late_reply.send(Ok(chart_payload("late"))).unwrap();
		assert_eq!(in_flight.await, Ok(RequestOutcome::Stale));
	});

	assert_eq!(requester.backend().sent().len(), 1);
	assert!(requester.surface().charts().is_empty());
	assert!(requester.surface().log().contains(&Drawn::Cleared("datasetsGraph".into())));
}

#[test]
fn superseded_failure_shows_no_status() {
	let mut state = dashboard_with_netherlands();
	state.populate(&[FilterEntity::country("DE", "Germany")], EntityKind::Country);
	let backend = FakeBackend::default();
	let first_reply = backend.pending();
	let second_reply = backend.pending();
	let requester = GraphRequester::new(backend, FakeSurface::default());

	let first = state.change("datasetsNL", true).unwrap().calls.remove(0);
	let second = state.change("datasetsDE", true).unwrap().calls.remove(0);

	block_on(async {
		let mut first = pin!(requester.request(first));
		let mut second = pin!(requester.request(second));
		assert!(futures::poll!(first.as_mut()).is_pending());
		assert!(futures::poll!(second.as_mut()).is_pending());

		first_reply
			.send(Err(DashboardError::Transport("connection reset".into())))
			.unwrap();
		assert_eq!(first.await, Ok(RequestOutcome::Stale));

		second_reply.send(Ok(chart_payload("newest"))).unwrap();
		assert_eq!(second.await, Ok(RequestOutcome::Rendered));
	});

	let log = requester.surface().log();
	assert!(!log.iter().any(|d| matches!(d, Drawn::Status(_, Some(_)))));
	assert_eq!(requester.surface().charts(), ["datasetsGraph"]);
}

#[test]
fn transport_failure_is_reported_next_to_the_graph() {
	let mut state = dashboard_with_netherlands();
	let requester = GraphRequester::new(
		FakeBackend::replying([Err(DashboardError::Timeout { millis: 15_000 })]),
		FakeSurface::default(),
	);

	let call = state.change("speciesCompareOptionNL", true).unwrap().calls.remove(0);
	let result = block_on(requester.request(call));

	assert_eq!(result, Err(DashboardError::Timeout { millis: 15_000 }));
	assert!(requester.surface().charts().is_empty());
	assert!(requester.surface().log().contains(&Drawn::Status(
		"speciesCompareGraph".into(),
		Some("backend did not answer within 15000 ms".into()),
	)));
}

#[test]
fn malformed_response_leaves_the_chart_alone() {
	let mut state = dashboard_with_netherlands();
	let requester = GraphRequester::new(
		FakeBackend::replying([Ok("[]".into())]),
		FakeSurface::default(),
	);

	let call = state.change("datasetsNL", true).unwrap().calls.remove(0);
	let result = block_on(requester.request(call));

	assert!(matches!(result, Err(DashboardError::MalformedResponse(_))));
	assert!(requester.surface().log().is_empty());
}

#[test]
fn fifth_comparison_pick_is_rejected_but_graph_still_refreshes() {
	let mut state = DashboardState::new();
	let countries: Vec<_> = ["AT", "BE", "DE", "NL", "PL"]
		.into_iter()
		.map(|code| FilterEntity::country(code, code))
		.collect();
	state.populate(&countries, EntityKind::Country);
	for code in ["AT", "BE", "DE", "NL"] {
		state.change(&format!("speciesCompareOption{code}"), true);
	}

	let requester = GraphRequester::new(
		FakeBackend::replying([Ok(chart_payload("compare"))]),
		FakeSurface::default(),
	);
	let outcome = state.change("speciesCompareOptionPL", true).unwrap();
	assert!(outcome.reverted);
	for call in outcome.calls {
		block_on(requester.request(call)).unwrap();
	}

	let sent = requester.backend().sent();
	assert_eq!(sent[0]["request"], json!({"options": ["AT", "BE", "DE", "NL"]}));
	assert_eq!(sent[0]["type"], "bar");
}
