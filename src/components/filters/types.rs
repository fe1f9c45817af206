use serde::{Deserialize, Serialize};

use crate::components::graph::{ChartVariant, GraphCall, GraphMethod};

use super::form::FormSnapshot;

/// Host prefix stripped from ROR organisation identifiers.
pub const ROR_PREFIX: &str = "https://ror.org/";

/// Aggregation dimension of a panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
	/// Group by publishing organisation.
	Publisher,
	/// Group by publishing country.
	#[default]
	PublishingCountry,
}

impl Mode {
	/// Selector and wire value.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Publisher => "publisher",
			Self::PublishingCountry => "publishing_country",
		}
	}

	/// Read a mode selector value. Anything but `publishing_country` means publisher.
	pub fn from_selector(value: &str) -> Self {
		if value == Self::PublishingCountry.as_str() {
			Self::PublishingCountry
		} else {
			Self::Publisher
		}
	}

	/// The entity list a panel offers in this mode.
	pub fn entity_kind(self) -> EntityKind {
		match self {
			Self::Publisher => EntityKind::Organisation,
			Self::PublishingCountry => EntityKind::Country,
		}
	}
}

/// Which endpoint an entity came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
	/// A publishing country, keyed by its code.
	Country,
	/// A publishing organisation, keyed by its normalized identifier.
	Organisation,
}

impl EntityKind {
	/// Lowercase name used in element ids and log lines.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Country => "country",
			Self::Organisation => "organisation",
		}
	}
}

/// Something a graph can be filtered on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterEntity {
	/// Option value and id suffix.
	pub key: String,
	/// Label shown next to the checkbox.
	pub name: String,
	/// Endpoint the entity was listed by.
	pub kind: EntityKind,
}

impl FilterEntity {
	/// A country keyed by `code`.
	pub fn country(code: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			key: code.into(),
			name: name.into(),
			kind: EntityKind::Country,
		}
	}

	/// Build an organisation entity, reducing its URL identifier to the bare id.
	pub fn organisation(identifier: &str, name: impl Into<String>) -> Self {
		Self {
			key: normalize_identifier(identifier),
			name: name.into(),
			kind: EntityKind::Organisation,
		}
	}
}

/// An organisation as listed by the organisations endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OrganisationRecord {
	/// ROR URL or bare id; older backends call it `ror`.
	#[serde(alias = "ror")]
	pub identifier: String,
	/// Display name.
	pub name: String,
}

impl From<OrganisationRecord> for FilterEntity {
	fn from(record: OrganisationRecord) -> Self {
		FilterEntity::organisation(&record.identifier, record.name)
	}
}

/// `https://ror.org/0abcd1234` becomes `0abcd1234`; other URLs keep their last
/// path segment and plain ids pass through.
pub fn normalize_identifier(identifier: &str) -> String {
	let trimmed = identifier.trim();
	if let Some(id) = trimmed.strip_prefix(ROR_PREFIX) {
		return id.trim_end_matches('/').to_string();
	}
	if trimmed.contains("://") {
		if let Some(last) = trimmed.trim_end_matches('/').rsplit('/').next() {
			return last.to_string();
		}
	}
	trimmed.to_string()
}

/// The four fixed visualization purposes a filter panel can serve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Purpose {
	/// Dataset listing, up to four entities.
	Datasets,
	/// Specimen count pie plus progress chart for one entity.
	SpecimenCounter,
	/// Specimen comparison bar chart, up to four entities.
	SpecimenComparison,
	/// Issue and flag counters for one entity.
	IssueFlagCounter,
}

impl Purpose {
	/// Every purpose, in page order.
	pub const ALL: [Purpose; 4] = [
		Self::Datasets,
		Self::SpecimenCounter,
		Self::SpecimenComparison,
		Self::IssueFlagCounter,
	];

	/// Prefix of every option id in this panel; the entity key follows it.
	pub fn id_prefix(self) -> &'static str {
		match self {
			Self::Datasets => "datasets",
			Self::SpecimenCounter => "speciesCounterOption",
			Self::SpecimenComparison => "speciesCompareOption",
			Self::IssueFlagCounter => "issueFlagsCounterOption",
		}
	}

	/// Name of the selection group shared by the panel's checkboxes.
	pub fn group_name(self) -> &'static str {
		match self {
			Self::Datasets => "datasetsOption",
			other => other.id_prefix(),
		}
	}

	/// Most options that may be checked at once.
	pub fn max_selected(self) -> usize {
		match self {
			Self::Datasets | Self::SpecimenComparison => 4,
			Self::SpecimenCounter | Self::IssueFlagCounter => 1,
		}
	}

	/// Element id of the option for entity `key`.
	pub fn option_id(self, key: &str) -> String {
		format!("{}{}", self.id_prefix(), key)
	}

	/// Short slug used in element ids.
	pub fn slug(self) -> &'static str {
		match self {
			Self::Datasets => "datasets",
			Self::SpecimenCounter => "specimens_counter",
			Self::SpecimenComparison => "specimens_compare",
			Self::IssueFlagCounter => "issues_flags",
		}
	}

	/// Panel heading.
	pub fn title(self) -> &'static str {
		match self {
			Self::Datasets => "Datasets",
			Self::SpecimenCounter => "Specimen count",
			Self::SpecimenComparison => "Specimen comparison",
			Self::IssueFlagCounter => "Issues and flags",
		}
	}

	/// Id of the dropdown listing entities of `kind`.
	pub fn dropdown_id(self, kind: EntityKind) -> String {
		format!("{}_{}_dropdown", self.slug(), kind.as_str())
	}

	/// Graph surfaces this panel draws into.
	pub fn targets(self) -> &'static [&'static str] {
		match self {
			Self::Datasets => &["datasetsGraph"],
			Self::SpecimenCounter => &["speciesCounterGraph", "speciesProgressGraph"],
			Self::SpecimenComparison => &["speciesCompareGraph"],
			Self::IssueFlagCounter => &["issueFlagsCounterGraph"],
		}
	}

	/// Requests one change in this panel triggers, all reading the same form state.
	pub fn graph_calls(self, form: FormSnapshot) -> Vec<GraphCall> {
		match self {
			Self::Datasets => {
				vec![GraphCall::new(form, GraphMethod::DrawDatasets, "datasetsGraph")]
			}
			Self::SpecimenCounter => vec![
				GraphCall::new(form.clone(), GraphMethod::DrawSpecimens, "speciesCounterGraph")
					.with_variant(Some(ChartVariant::Pie)),
				GraphCall::new(form, GraphMethod::DrawSpecimensProgress, "speciesProgressGraph"),
			],
			Self::SpecimenComparison => vec![
				GraphCall::new(form, GraphMethod::DrawSpecimens, "speciesCompareGraph")
					.with_variant(Some(ChartVariant::Bar)),
			],
			Self::IssueFlagCounter => vec![
				GraphCall::new(form, GraphMethod::DrawIssuesAndFlags, "issueFlagsCounterGraph")
					.with_limit(Some(10)),
			],
		}
	}
}

/// Which variant of a panel family is on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariantVisibility {
	/// Organisation dropdown shown.
	pub publisher: bool,
	/// Country dropdown shown.
	pub publishing_country: bool,
}

impl VariantVisibility {
	/// Exactly one variant visible: the one matching `mode`.
	pub fn for_mode(mode: Mode) -> Self {
		Self {
			publisher: mode == Mode::Publisher,
			publishing_country: mode == Mode::PublishingCountry,
		}
	}

	/// Visibility for a raw mode selector value.
	pub fn from_selector(value: &str) -> Self {
		Self::for_mode(Mode::from_selector(value))
	}

	/// Whether the dropdown for `kind` is on screen.
	pub fn shows(self, kind: EntityKind) -> bool {
		match kind {
			EntityKind::Country => self.publishing_country,
			EntityKind::Organisation => self.publisher,
		}
	}
}
