use super::form::{FilterForm, FormSnapshot, LIST_MARKER, MODE_FIELD, OPTIONS_FIELD, serialize_form};
use super::types::{EntityKind, FilterEntity, Mode, Purpose};
use crate::components::graph::GraphCall;

/// One checkbox in a dropdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionControl {
	/// Element id: purpose prefix plus entity key.
	pub id: String,
	/// Submitted value, the entity key.
	pub value: String,
	/// Visible label.
	pub label: String,
	/// Which dropdown variant the checkbox lives in.
	pub kind: EntityKind,
	/// Checked by the user.
	pub checked: bool,
	/// Belongs to the hidden variant; never counted or submitted.
	pub disabled: bool,
	checked_seq: u64,
}

impl OptionControl {
	fn counts(&self) -> bool {
		self.checked && !self.disabled
	}
}

/// Checkboxes sharing a maximum-selection limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionGroup {
	/// Shared class name of the checkboxes.
	pub name: String,
	/// Selection cap.
	pub max: usize,
	members: Vec<OptionControl>,
	next_seq: u64,
}

impl SelectionGroup {
	/// Empty group capped at `max`.
	pub fn new(name: impl Into<String>, max: usize) -> Self {
		Self {
			name: name.into(),
			max,
			members: Vec::new(),
			next_seq: 0,
		}
	}

	/// Every checkbox, in registration order.
	pub fn members(&self) -> &[OptionControl] {
		&self.members
	}

	/// Checkbox with element id `id`.
	pub fn member(&self, id: &str) -> Option<&OptionControl> {
		self.members.iter().find(|m| m.id == id)
	}

	/// Whether `id` belongs to this group.
	pub fn contains(&self, id: &str) -> bool {
		self.member(id).is_some()
	}

	/// Add a checkbox, or relabel it when the id is already known.
	pub fn insert(
		&mut self,
		id: String,
		value: String,
		label: String,
		kind: EntityKind,
		disabled: bool,
	) {
		if let Some(existing) = self.members.iter_mut().find(|m| m.id == id) {
			existing.label = label;
			existing.value = value;
			return;
		}
		self.members.push(OptionControl {
			id,
			value,
			label,
			kind,
			checked: false,
			disabled,
			checked_seq: 0,
		});
	}

	/// Record a user toggle. Returns false for unknown ids.
	pub fn set_checked(&mut self, id: &str, checked: bool) -> bool {
		let Some(member) = self.members.iter_mut().find(|m| m.id == id) else {
			return false;
		};
		if checked && !member.checked {
			self.next_seq += 1;
			member.checked_seq = self.next_seq;
		}
		member.checked = checked;
		true
	}

	/// Number of checked, enabled members.
	pub fn checked_count(&self) -> usize {
		self.members.iter().filter(|m| m.counts()).count()
	}

	/// Uncheck `changed_id` when the group is over `max`. The control that
	/// caused the overflow is the one rejected, never an older selection.
	pub fn enforce_limit(&mut self, changed_id: &str, max: usize) -> bool {
		if self.checked_count() <= max {
			return false;
		}
		match self.members.iter_mut().find(|m| m.id == changed_id) {
			Some(member) => {
				member.checked = false;
				true
			}
			None => false,
		}
	}

	/// Disable every member whose kind is hidden.
	pub fn enable_only(&mut self, kind: EntityKind) {
		for member in &mut self.members {
			member.disabled = member.kind != kind;
		}
	}

	/// Submitted values in the order they were checked.
	pub fn submitted_values(&self) -> Vec<&str> {
		let mut checked: Vec<&OptionControl> = self.members.iter().filter(|m| m.counts()).collect();
		checked.sort_by_key(|m| m.checked_seq);
		checked.into_iter().map(|m| m.value.as_str()).collect()
	}
}

/// A filter panel: mode selector plus one selection group over both entity lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterPanel {
	/// Graphs this panel drives.
	pub purpose: Purpose,
	/// Current mode selector value.
	pub mode: Mode,
	/// Checkboxes of both variants.
	pub group: SelectionGroup,
}

impl FilterPanel {
	/// Panel in the default mode with no options yet.
	pub fn new(purpose: Purpose) -> Self {
		Self {
			purpose,
			mode: Mode::default(),
			group: SelectionGroup::new(purpose.group_name(), purpose.max_selected()),
		}
	}

	/// Successful controls of the panel form.
	pub fn form(&self) -> FilterForm {
		let mut form = FilterForm::default();
		form.push(MODE_FIELD, self.mode.as_str());
		let name = format!("{OPTIONS_FIELD}{LIST_MARKER}");
		for value in self.group.submitted_values() {
			form.push(name.as_str(), value);
		}
		form
	}

	/// Switch variants; inputs of the hidden one are disabled.
	pub fn set_mode(&mut self, mode: Mode) {
		self.mode = mode;
		self.group.enable_only(mode.entity_kind());
	}

	/// Checkboxes of one variant.
	pub fn options(&self, kind: EntityKind) -> impl Iterator<Item = &OptionControl> {
		self.group.members().iter().filter(move |m| m.kind == kind)
	}
}

/// What a checkbox change produced.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeOutcome {
	/// The change pushed the group over its limit and was undone.
	pub reverted: bool,
	/// Graph requests to fire, built from the form after the change.
	pub calls: Vec<GraphCall>,
}

/// Selection state of every filter panel on the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardState {
	panels: Vec<FilterPanel>,
}

impl Default for DashboardState {
	fn default() -> Self {
		Self::new()
	}
}

impl DashboardState {
	/// One empty panel per purpose.
	pub fn new() -> Self {
		Self {
			panels: Purpose::ALL.into_iter().map(FilterPanel::new).collect(),
		}
	}

	/// State of the panel serving `purpose`.
	pub fn panel(&self, purpose: Purpose) -> &FilterPanel {
		let idx = Self::index(purpose);
		&self.panels[idx]
	}

	fn panel_mut(&mut self, purpose: Purpose) -> &mut FilterPanel {
		let idx = Self::index(purpose);
		&mut self.panels[idx]
	}

	fn index(purpose: Purpose) -> usize {
		match purpose {
			Purpose::Datasets => 0,
			Purpose::SpecimenCounter => 1,
			Purpose::SpecimenComparison => 2,
			Purpose::IssueFlagCounter => 3,
		}
	}

	/// Register one option per entity in every panel. Safe to call again with
	/// a refreshed list: known ids are relabelled, not duplicated.
	pub fn populate(&mut self, entities: &[FilterEntity], kind: EntityKind) {
		for panel in &mut self.panels {
			let disabled = panel.mode.entity_kind() != kind;
			for entity in entities.iter().filter(|e| e.kind == kind) {
				panel.group.insert(
					panel.purpose.option_id(&entity.key),
					entity.key.clone(),
					entity.name.clone(),
					kind,
					disabled,
				);
			}
		}
	}

	/// Change one panel's mode.
	pub fn set_mode(&mut self, purpose: Purpose, mode: Mode) {
		self.panel_mut(purpose).set_mode(mode);
	}

	/// Whether the option with element id `option_id` is checked.
	pub fn is_checked(&self, option_id: &str) -> bool {
		self.panels
			.iter()
			.find_map(|p| p.group.member(option_id))
			.is_some_and(|m| m.checked)
	}

	/// Apply a checkbox change: record it, cap the group and build the graph
	/// calls the panel's purpose asks for. `None` for ids no panel owns.
	pub fn change(&mut self, option_id: &str, checked: bool) -> Option<ChangeOutcome> {
		let panel = self.panels.iter_mut().find(|p| p.group.contains(option_id))?;
		panel.group.set_checked(option_id, checked);
		let max = panel.purpose.max_selected();
		let reverted = checked && panel.group.enforce_limit(option_id, max);
		let snapshot = serialize_form(Some(&panel.form()));
		Some(ChangeOutcome {
			reverted,
			calls: panel.purpose.graph_calls(snapshot),
		})
	}

	/// Serialized form of a panel as it stands now.
	pub fn snapshot(&self, purpose: Purpose) -> FormSnapshot {
		serialize_form(Some(&self.panel(purpose).form()))
	}
}
