//! OSTI E-Link XML rendering of translated records.
//!
//! A batch is written as one `<records>` document with a `<record>` element per
//! [`TranslatedRecord`]. Child elements are named after the record's fields,
//! absent optional fields are left out, and relations are grouped:
//!
//! ```xml
//! <records>
//!   <record>
//!     <accession_num>88435</accession_num>
//!     <contract_nos>AC02-09CH11466</contract_nos>
//!     <dataset_type>SM</dataset_type>
//!     <title>Stellarator coil data</title>
//!     <creators>Smith, Jane; Doe, John</creators>
//!     <related_identifiers>
//!       <related_identifier>
//!         <related_identifier>10.11578/1367288</related_identifier>
//!         <relation_type>IsPartOf</relation_type>
//!         <related_identifier_type>DOI</related_identifier_type>
//!       </related_identifier>
//!     </related_identifiers>
//!   </record>
//! </records>
//! ```
//!
//! The view structs below borrow from the records, so rendering does not
//! copy field values.

use quick_xml::se::Serializer;
use serde::Serialize;

use crate::error::{ImportError, Result};
use crate::translator::TranslatedRecord;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

#[derive(Debug, Serialize)]
#[serde(rename = "records")]
struct ElinkRecords<'a> {
    record: Vec<ElinkRecord<'a>>,
}

#[derive(Debug, Serialize)]
struct ElinkRecord<'a> {
    accession_num: &'a str,
    contract_nos: &'a str,
    dataset_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    creators: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    site_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    research_org: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keywords: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sponsor_org: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publication_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    related_identifiers: Option<ElinkRelations<'a>>,
}

#[derive(Debug, Serialize)]
struct ElinkRelations<'a> {
    related_identifier: Vec<ElinkRelation<'a>>,
}

#[derive(Debug, Serialize)]
struct ElinkRelation<'a> {
    related_identifier: &'a str,
    relation_type: &'static str,
    related_identifier_type: &'static str,
}

impl<'a> From<&'a TranslatedRecord> for ElinkRecord<'a> {
    fn from(record: &'a TranslatedRecord) -> Self {
        let related_identifiers = if record.related_identifiers.is_empty() {
            None
        } else {
            Some(ElinkRelations {
                related_identifier: record
                    .related_identifiers
                    .iter()
                    .map(|r| ElinkRelation {
                        related_identifier: &r.related_identifier,
                        relation_type: r.relation_type.as_str(),
                        related_identifier_type: r.related_identifier_type.as_str(),
                    })
                    .collect(),
            })
        };

        ElinkRecord {
            accession_num: &record.accession_num,
            contract_nos: record.contract_nos.as_deref().unwrap_or_default(),
            dataset_type: &record.dataset_type,
            title: record.title.as_deref(),
            creators: &record.creators,
            site_url: record.site_url.as_deref(),
            research_org: record.research_org.as_deref(),
            keywords: record.keywords.as_deref(),
            sponsor_org: record.sponsor_org.as_deref(),
            description: record.description.as_deref(),
            publication_date: record.publication_date.as_deref(),
            related_identifiers,
        }
    }
}

/// Render `records` as an E-Link `<records>` document.
///
/// # Examples
///
/// ```
/// use dataspace_osti::{elink, translate, RawMetadataField};
///
/// let fields = vec![RawMetadataField::new("dc.title", "Coil data & more")];
/// let record = translate("88435", &fields, None, "SM")?;
///
/// let xml = elink::records_to_xml(&[record])?;
/// assert!(xml.contains("<title>Coil data &amp; more</title>"));
/// # Ok::<(), dataspace_osti::ImportError>(())
/// ```
///
/// # Errors
///
/// Returns [`ImportError::Xml`] if serialization fails.
pub fn records_to_xml(records: &[TranslatedRecord]) -> Result<String> {
    let view = ElinkRecords {
        record: records.iter().map(ElinkRecord::from).collect(),
    };

    let mut xml = String::from(XML_DECLARATION);
    let mut serializer = Serializer::new(&mut xml);
    serializer.indent(' ', 2);
    view.serialize(serializer)
        .map_err(|e| ImportError::Xml(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}
