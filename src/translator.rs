//! Translation of DSpace key-value metadata into OSTI dataset records.
//!
//! The mapping is driven by [`FIELD_MAP`], a table from qualified Dublin Core
//! key to the effect it has on the [`TranslatedRecord`]. Keys absent from the
//! table are ignored.
//!
//! | DSpace key | target |
//! |---|---|
//! | `dc.title` | `title` (last occurrence wins) |
//! | `dc.contributor.author`, `dc.creator` | `creators`, joined with `"; "` in encounter order |
//! | `dc.identifier.uri` | `site_url` |
//! | `dc.publisher` | `research_org` |
//! | `dc.subject` | `keywords` |
//! | `dc.contributor.funder` | `sponsor_org` |
//! | `dc.description.abstract` | `description` |
//! | `dc.date.issued` | `publication_date`, normalized by [`strtodate`] |
//! | `dc.relation.*` | one [`RelatedIdentifier`] each, see [`RelationType`] |
//!
//! Translation is pure: no I/O, no shared state, and the same input always
//! yields the same record. It fails only when `dc.date.issued` cannot be
//! parsed, and that failure is never swallowed.
//!
//! # Examples
//!
//! ```
//! use dataspace_osti::{translate, RawMetadataField};
//!
//! let fields = vec![
//!     RawMetadataField::new("dc.title", "Stellarator coil data"),
//!     RawMetadataField::new("dc.creator", "Smith, Jane"),
//!     RawMetadataField::new("dc.creator", "Doe, John"),
//!     RawMetadataField::new("dc.date.issued", "2019-06"),
//! ];
//!
//! let record = translate("88435", &fields, Some("AC02-09CH11466"), "SM")?;
//! assert_eq!(record.creators, "Smith, Jane; Doe, John");
//! assert_eq!(record.publication_date.as_deref(), Some("06/01/2019"));
//! assert!(record.related_identifiers.is_empty());
//! # Ok::<(), dataspace_osti::ImportError>(())
//! ```

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::SourceConfig;
use crate::error::{ImportError, Result};
use crate::metadata::RawMetadataField;

/// Separator placed between consolidated creator names.
pub const CREATOR_SEPARATOR: &str = "; ";

/// OSTI relation kinds produced from `dc.relation.*` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RelationType {
    /// From `dc.relation.ispartof`
    IsPartOf,
    /// From `dc.relation.isversionof`
    IsNewerVersionOf,
    /// From `dc.relation.hasversion`
    IsPreviousVersionOf,
    /// From `dc.relation.isreferencedby`
    IsReferencedBy,
    /// From `dc.relation.isbasedon`
    References,
    /// From `dc.relation.requires`
    Requires,
}

impl RelationType {
    /// Name as written in OSTI records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IsPartOf => "IsPartOf",
            Self::IsNewerVersionOf => "IsNewerVersionOf",
            Self::IsPreviousVersionOf => "IsPreviousVersionOf",
            Self::IsReferencedBy => "IsReferencedBy",
            Self::References => "References",
            Self::Requires => "Requires",
        }
    }
}

/// Scheme of a related identifier.
///
/// Every relation is labelled `DOI`; the value itself is not inspected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum IdentifierType {
    /// Digital Object Identifier
    #[default]
    #[serde(rename = "DOI")]
    Doi,
}

impl IdentifierType {
    /// Name as written in OSTI records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Doi => "DOI",
        }
    }
}

/// A link from the translated record to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedIdentifier {
    /// The related resource, verbatim from the source
    pub related_identifier: String,
    /// How the record relates to it
    pub relation_type: RelationType,
    /// Always [`IdentifierType::Doi`]
    pub related_identifier_type: IdentifierType,
}

/// A record in OSTI's dataset schema.
///
/// `accession_num`, `contract_nos`, `dataset_type` and `creators` are always
/// present. Optional fields serialize only when set, and
/// `related_identifiers` only when non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedRecord {
    /// Source identifier
    pub accession_num: String,
    /// DOE contract number
    pub contract_nos: Option<String>,
    /// OSTI dataset type
    pub dataset_type: String,
    /// From `dc.title`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Authors and creators joined with `"; "`, possibly empty
    pub creators: String,
    /// From `dc.identifier.uri`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// From `dc.publisher`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_org: Option<String>,
    /// From `dc.subject`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// From `dc.contributor.funder`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsor_org: Option<String>,
    /// From `dc.description.abstract`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `dc.date.issued` as `MM/DD/YYYY`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    /// Relations in encounter order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_identifiers: Vec<RelatedIdentifier>,
}

impl TranslatedRecord {
    fn new(accession_num: &str, contract_no: Option<&str>, dataset_type: &str) -> Self {
        Self {
            accession_num: accession_num.to_string(),
            contract_nos: contract_no.map(str::to_string),
            dataset_type: dataset_type.to_string(),
            title: None,
            creators: String::new(),
            site_url: None,
            research_org: None,
            keywords: None,
            sponsor_org: None,
            description: None,
            publication_date: None,
            related_identifiers: Vec::new(),
        }
    }

    /// Field name to value, in schema order, as consumed by submission.
    ///
    /// Unset optional fields are left out; `related_identifiers` is present
    /// only when at least one relation was translated. `contract_nos` is
    /// always present and is `null` when no contract number was configured.
    #[must_use]
    pub fn to_field_map(&self) -> IndexMap<&'static str, Value> {
        let mut map = IndexMap::new();
        map.insert("accession_num", Value::from(self.accession_num.as_str()));
        map.insert(
            "contract_nos",
            self.contract_nos.as_deref().map_or(Value::Null, Value::from),
        );
        map.insert("dataset_type", Value::from(self.dataset_type.as_str()));

        insert_set(&mut map, "title", self.title.as_deref());
        map.insert("creators", Value::from(self.creators.as_str()));
        insert_set(&mut map, "site_url", self.site_url.as_deref());
        insert_set(&mut map, "research_org", self.research_org.as_deref());
        insert_set(&mut map, "keywords", self.keywords.as_deref());
        insert_set(&mut map, "sponsor_org", self.sponsor_org.as_deref());
        insert_set(&mut map, "description", self.description.as_deref());
        insert_set(&mut map, "publication_date", self.publication_date.as_deref());

        if !self.related_identifiers.is_empty() {
            let relations = self
                .related_identifiers
                .iter()
                .map(|r| {
                    json!({
                        "related_identifier": r.related_identifier,
                        "relation_type": r.relation_type.as_str(),
                        "related_identifier_type": r.related_identifier_type.as_str(),
                    })
                })
                .collect();
            map.insert("related_identifiers", Value::Array(relations));
        }
        map
    }
}

fn insert_set(map: &mut IndexMap<&'static str, Value>, name: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        map.insert(name, Value::from(value));
    }
}

/// Single-valued text fields a key can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    /// `title`
    Title,
    /// `site_url`
    SiteUrl,
    /// `research_org`
    ResearchOrg,
    /// `keywords`
    Keywords,
    /// `sponsor_org`
    SponsorOrg,
    /// `description`
    Description,
}

/// What a mapped key does to the record being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEffect {
    /// Overwrite a text field.
    Set(TextField),
    /// Append to the creators list.
    Creator,
    /// Normalize and store as the publication date.
    IssueDate,
    /// Append a related identifier.
    Relation(RelationType),
}

/// Every DSpace key the translator understands.
pub const FIELD_MAP: &[(&str, FieldEffect)] = &[
    ("dc.title", FieldEffect::Set(TextField::Title)),
    ("dc.contributor.author", FieldEffect::Creator),
    ("dc.creator", FieldEffect::Creator),
    ("dc.identifier.uri", FieldEffect::Set(TextField::SiteUrl)),
    ("dc.publisher", FieldEffect::Set(TextField::ResearchOrg)),
    ("dc.subject", FieldEffect::Set(TextField::Keywords)),
    ("dc.contributor.funder", FieldEffect::Set(TextField::SponsorOrg)),
    ("dc.description.abstract", FieldEffect::Set(TextField::Description)),
    ("dc.date.issued", FieldEffect::IssueDate),
    ("dc.relation.ispartof", FieldEffect::Relation(RelationType::IsPartOf)),
    ("dc.relation.isversionof", FieldEffect::Relation(RelationType::IsNewerVersionOf)),
    ("dc.relation.hasversion", FieldEffect::Relation(RelationType::IsPreviousVersionOf)),
    ("dc.relation.isreferencedby", FieldEffect::Relation(RelationType::IsReferencedBy)),
    ("dc.relation.isbasedon", FieldEffect::Relation(RelationType::References)),
    ("dc.relation.requires", FieldEffect::Relation(RelationType::Requires)),
];

/// Effect of `key`, or `None` if the key is not mapped.
#[must_use]
pub fn effect_for(key: &str) -> Option<FieldEffect> {
    FIELD_MAP
        .iter()
        .find(|(mapped, _)| *mapped == key)
        .map(|(_, effect)| *effect)
}

/// Accepted `dc.date.issued` layouts, in the order they are tried.
///
/// Each entry is `(layout, padding, padding_layout)`: partial dates get the
/// padding appended so they parse as a full date with month/day `01`.
const DATE_LAYOUTS: [(&str, &str, &str); 3] = [
    ("%Y-%m", "-01", "-%d"),
    ("%Y-%m-%d", "", ""),
    ("%Y", "-01-01", "-%m-%d"),
];

const TIMESTAMP_LAYOUT: &str = "%Y-%m-%dT%H:%M:%SZ";

const OUTPUT_LAYOUT: &str = "%m/%d/%Y";

/// Normalize an issue date to `MM/DD/YYYY`.
///
/// Layouts are tried strictly in this order and the first that consumes the
/// whole input wins:
///
/// 1. `YYYY-MM-DDTHH:MM:SSZ`
/// 2. `YYYY-MM`
/// 3. `YYYY-MM-DD`
/// 4. `YYYY`
///
/// ```
/// use dataspace_osti::strtodate;
///
/// assert_eq!(strtodate("2020-01-01T00:00:00Z")?, "01/01/2020");
/// assert_eq!(strtodate("2020-05")?, "05/01/2020");
/// assert_eq!(strtodate("2020")?, "01/01/2020");
/// assert!(strtodate("not-a-date").is_err());
/// # Ok::<(), dataspace_osti::ImportError>(())
/// ```
///
/// # Errors
///
/// Returns [`ImportError::InvalidDateFormat`] if no layout matches.
pub fn strtodate(value: &str) -> Result<String> {
    if !has_four_digit_year(value) || value.contains(char::is_whitespace) {
        return Err(ImportError::InvalidDateFormat(value.to_string()));
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, TIMESTAMP_LAYOUT) {
        // chrono represents second 60 as an overflowing nanosecond count
        if timestamp.nanosecond() >= 1_000_000_000 {
            return Err(ImportError::InvalidDateFormat(value.to_string()));
        }
        return Ok(timestamp.date().format(OUTPUT_LAYOUT).to_string());
    }

    DATE_LAYOUTS
        .iter()
        .find_map(|(layout, padding, padding_layout)| {
            NaiveDate::parse_from_str(
                &format!("{value}{padding}"),
                &format!("{layout}{padding_layout}"),
            )
            .ok()
        })
        .map(|date| date.format(OUTPUT_LAYOUT).to_string())
        .ok_or_else(|| ImportError::InvalidDateFormat(value.to_string()))
}

/// chrono's `%Y` also takes signed and five-digit years; every layout here
/// starts with exactly four digits. chrono also skips spaces before numbers,
/// so whitespace is rejected separately.
fn has_four_digit_year(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 4
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes.get(4).map_or(true, |b| !b.is_ascii_digit())
}

/// Translate one record's raw metadata.
///
/// `id` becomes `accession_num`; `contract_no` and `dataset_type` are stamped
/// on unchanged.
///
/// # Errors
///
/// Returns [`ImportError::InvalidDateFormat`] if a `dc.date.issued` value
/// cannot be normalized.
pub fn translate(
    id: &str,
    fields: &[RawMetadataField],
    contract_no: Option<&str>,
    dataset_type: &str,
) -> Result<TranslatedRecord> {
    let mut record = TranslatedRecord::new(id, contract_no, dataset_type);
    let mut creators: Vec<&str> = Vec::new();

    for field in fields {
        let Some(effect) = effect_for(&field.key) else {
            continue;
        };
        match effect {
            FieldEffect::Set(target) => {
                let slot = match target {
                    TextField::Title => &mut record.title,
                    TextField::SiteUrl => &mut record.site_url,
                    TextField::ResearchOrg => &mut record.research_org,
                    TextField::Keywords => &mut record.keywords,
                    TextField::SponsorOrg => &mut record.sponsor_org,
                    TextField::Description => &mut record.description,
                };
                *slot = Some(field.value.clone());
            },
            FieldEffect::Creator => creators.push(&field.value),
            FieldEffect::IssueDate => record.publication_date = Some(strtodate(&field.value)?),
            FieldEffect::Relation(relation_type) => {
                record.related_identifiers.push(RelatedIdentifier {
                    related_identifier: field.value.clone(),
                    relation_type,
                    related_identifier_type: IdentifierType::Doi,
                });
            },
        }
    }

    record.creators = creators.join(CREATOR_SEPARATOR);
    Ok(record)
}

/// [`translate`] with the contract number and dataset type fixed up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTranslator {
    contract_no: Option<String>,
    dataset_type: String,
}

impl RecordTranslator {
    /// Translator stamping `contract_no` and `dataset_type` on every record.
    pub fn new(contract_no: Option<String>, dataset_type: impl Into<String>) -> Self {
        Self {
            contract_no,
            dataset_type: dataset_type.into(),
        }
    }

    /// Translator using the defaults carried by `config`.
    #[must_use]
    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(config.contract_no.clone(), config.dataset_type.clone())
    }

    /// Translate one record.
    ///
    /// # Errors
    ///
    /// See [`translate`].
    pub fn translate(&self, id: &str, fields: &[RawMetadataField]) -> Result<TranslatedRecord> {
        translate(id, fields, self.contract_no.as_deref(), &self.dataset_type)
    }
}
