//! Dashboard building blocks: filter panels, graph requests and page switching.

pub mod filters;
pub mod graph;
pub mod pager;

use std::rc::Rc;

use leptos::prelude::{LocalStorage, StoredValue};
use log::{debug, error};

use crate::api::ApiClient;
use graph::{BrowserSurface, GraphCall, GraphRequester};

/// The requester wired to the real backend and the live page.
pub type DashboardRequester = GraphRequester<ApiClient, BrowserSurface>;

/// `Copy` handle to the requester that views and children closures can capture.
pub type RequesterHandle = StoredValue<Rc<DashboardRequester>, LocalStorage>;

/// Fire each call without waiting; responses render whenever they arrive.
pub fn dispatch(requester: &Rc<DashboardRequester>, calls: Vec<GraphCall>) {
	for call in calls {
		let requester = Rc::clone(requester);
		leptos::task::spawn_local(async move {
			let target = call.target.clone();
			match requester.request(call).await {
				Ok(outcome) => debug!("#{target}: {outcome:?}"),
				Err(err) => error!("#{target}: {err}"),
			}
		});
	}
}
