//! Turns the successful controls of a filter form into a request payload.

use std::collections::BTreeMap;

use serde::Serialize;

/// Suffix marking a control name as part of a repeated group.
pub const LIST_MARKER: &str = "[]";
/// Field carrying the checked entity keys once the marker is stripped.
pub const OPTIONS_FIELD: &str = "options";
/// Field carrying the view mode selector.
pub const MODE_FIELD: &str = "mode";

/// A single successful control: a checked, enabled checkbox or a selector value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
	/// Control name, possibly ending in [`LIST_MARKER`].
	pub name: String,
	/// Submitted value.
	pub value: String,
}

impl FormField {
	/// Build a field from a name/value pair.
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}
}

/// Successful controls of one form, in submission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterForm {
	/// Fields in document order.
	pub fields: Vec<FormField>,
}

impl FilterForm {
	/// Append a successful control.
	pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.fields.push(FormField::new(name, value));
	}
}

/// Value of one serialized control name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
	/// A plain control; the last occurrence wins.
	Single(String),
	/// A `[]` group, in the order its members were checked.
	List(Vec<String>),
}

impl FieldValue {
	/// The value of a plain control, `None` for lists.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Single(value) => Some(value),
			Self::List(_) => None,
		}
	}
}

/// Serialized form contents keyed by control name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, FieldValue>);

impl FormData {
	/// Value stored under `name` (without any list marker).
	pub fn get(&self, name: &str) -> Option<&FieldValue> {
		self.0.get(name)
	}

	/// No successful controls at all.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// True when at least one option of a repeated group was submitted.
	pub fn has_options(&self) -> bool {
		matches!(self.0.get(OPTIONS_FIELD), Some(FieldValue::List(values)) if !values.is_empty())
	}

	/// Raw value of the mode selector, if the form had one.
	pub fn mode(&self) -> Option<&str> {
		self.0.get(MODE_FIELD).and_then(FieldValue::as_str)
	}

	/// Everything except the mode selector: the request mapping sent to the backend.
	pub fn request_fields(&self) -> BTreeMap<String, FieldValue> {
		self.0
			.iter()
			.filter(|(name, _)| name.as_str() != MODE_FIELD)
			.map(|(name, value)| (name.clone(), value.clone()))
			.collect()
	}
}

/// Result of serializing a possibly absent form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormSnapshot {
	/// There was no form to read from.
	NoFormContext,
	/// The serialized controls of the form.
	FormContext(FormData),
}

impl FormSnapshot {
	/// Serialized controls, `None` without a form.
	pub fn data(&self) -> Option<&FormData> {
		match self {
			Self::NoFormContext => None,
			Self::FormContext(data) => Some(data),
		}
	}

	/// A form was present and it carried at least one option.
	pub fn has_options(&self) -> bool {
		self.data().is_some_and(FormData::has_options)
	}
}

/// Serialize a form. Names ending in `[]` collect into a list under the bare
/// name; other names keep their last value. A list always replaces a plain
/// value of the same name, wherever that value appears.
pub fn serialize_form(form: Option<&FilterForm>) -> FormSnapshot {
	let Some(form) = form else {
		return FormSnapshot::NoFormContext;
	};

	let mut data = BTreeMap::new();
	let mut lists: BTreeMap<String, Vec<String>> = BTreeMap::new();
	for field in &form.fields {
		match field.name.strip_suffix(LIST_MARKER) {
			Some(base) => lists
				.entry(base.to_string())
				.or_default()
				.push(field.value.clone()),
			None => {
				data.insert(field.name.clone(), FieldValue::Single(field.value.clone()));
			}
		}
	}
	for (name, values) in lists {
		data.insert(name, FieldValue::List(values));
	}
	FormSnapshot::FormContext(FormData(data))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn form(fields: &[(&str, &str)]) -> FilterForm {
		FilterForm {
			fields: fields.iter().map(|(n, v)| FormField::new(*n, *v)).collect(),
		}
	}

	#[test]
	fn absent_form_is_not_an_empty_mapping() {
		assert_eq!(serialize_form(None), FormSnapshot::NoFormContext);
		let empty = serialize_form(Some(&FilterForm::default()));
		assert_eq!(empty, FormSnapshot::FormContext(FormData::default()));
		assert!(!empty.has_options());
	}

	#[test]
	fn repeated_group_collapses_into_list_in_order() {
		let snapshot = serialize_form(Some(&form(&[
			("mode", "publisher"),
			("options[]", "DE"),
			("options[]", "NL"),
			("options[]", "AT"),
		])));
		let data = snapshot.data().unwrap();
		assert_eq!(
			data.get("options"),
			Some(&FieldValue::List(vec!["DE".into(), "NL".into(), "AT".into()]))
		);
		assert!(data.get("options[]").is_none());
		assert_eq!(data.mode(), Some("publisher"));
		assert!(data.has_options());
	}

	#[test]
	fn request_fields_drop_the_mode() {
		let snapshot = serialize_form(Some(&form(&[
			("mode", "publishing_country"),
			("options[]", "NL"),
		])));
		let request = snapshot.data().unwrap().request_fields();
		assert_eq!(request.len(), 1);
		assert_eq!(
			serde_json::to_string(&request).unwrap(),
			r#"{"options":["NL"]}"#
		);
	}

	#[test]
	fn list_beats_plain_field_of_the_same_name() {
		for fields in [
			[("options[]", "NL"), ("options", "X")],
			[("options", "X"), ("options[]", "NL")],
		] {
			let snapshot = serialize_form(Some(&form(&fields)));
			let data = snapshot.data().unwrap();
			assert_eq!(data.get("options"), Some(&FieldValue::List(vec!["NL".into()])));
			assert!(snapshot.has_options());
		}
	}

	#[test]
	fn mode_alone_has_no_options() {
		let snapshot = serialize_form(Some(&form(&[("mode", "publisher")])));
		assert!(!snapshot.has_options());
	}
}
