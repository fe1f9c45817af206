//! Filter panels: form serialization, selection limits and the dropdown views.

mod component;
mod form;
mod state;
mod types;

pub use component::FilterPanelView;
pub use form::{
	FieldValue, FilterForm, FormData, FormField, FormSnapshot, LIST_MARKER, OPTIONS_FIELD,
	serialize_form,
};
pub use state::{ChangeOutcome, DashboardState, FilterPanel, OptionControl, SelectionGroup};
pub use types::{
	EntityKind, FilterEntity, Mode, OrganisationRecord, Purpose, VariantVisibility,
	normalize_identifier,
};
