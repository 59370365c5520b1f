//! Common test helpers and utilities shared across test suite.

use std::cell::RefCell;
use std::collections::VecDeque;

use dataspace_osti::{HttpResponse, ImportError, RawMetadataField, Result, Transport};
use serde_json::{json, Value};

/// Transport that replays scripted responses and records requested paths.
///
/// When the script runs out, requests fail with a transport error.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<HttpResponse>>,
    requests: RefCell<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(responses: impl IntoIterator<Item = HttpResponse>) -> Self {
        Self {
            responses: RefCell::new(responses.into_iter().collect()),
            requests: RefCell::default(),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, path: &str) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(path.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ImportError::Transport("no scripted response left".to_string()))
    }
}

/// A 200 page of `count` item descriptors with ids `start..start + count`.
#[allow(dead_code)]
pub fn items_page(start: usize, count: usize) -> HttpResponse {
    let items: Vec<Value> = (start..start + count)
        .map(|i| json!({"id": i, "name": format!("Dataset {i}"), "type": "item"}))
        .collect();
    HttpResponse::new(200, Value::Array(items).to_string())
}

/// A 200 metadata response carrying `fields`.
#[allow(dead_code)]
pub fn metadata_response(fields: &[(&str, &str)]) -> HttpResponse {
    let body: Vec<Value> = fields
        .iter()
        .map(|(key, value)| json!({"key": key, "value": value, "language": null}))
        .collect();
    HttpResponse::new(200, Value::Array(body).to_string())
}

/// Raw fields from `(key, value)` pairs.
#[allow(dead_code)]
pub fn raw_fields(fields: &[(&str, &str)]) -> Vec<RawMetadataField> {
    fields
        .iter()
        .map(|(key, value)| RawMetadataField::new(*key, *value))
        .collect()
}

/// Metadata of a realistic DataSpace dataset record.
#[allow(dead_code)]
pub fn realistic_metadata() -> Vec<(&'static str, &'static str)> {
    vec![
        ("dc.contributor.author", "Kaganovich, Igor"),
        ("dc.contributor.author", "Raitses, Yevgeny"),
        ("dc.contributor.funder", "U. S. Department of Energy contract number DE-AC02-09CH11466"),
        ("dc.date.accessioned", "2018-05-21T17:33:12Z"),
        ("dc.date.available", "2018-05-21T17:33:12Z"),
        ("dc.date.issued", "2018-05"),
        ("dc.identifier.uri", "http://arks.princeton.edu/ark:/88435/dsp01x920g025r"),
        ("dc.description.abstract", "Data for the figures of the paper."),
        ("dc.language.iso", "en"),
        ("dc.publisher", "Princeton Plasma Physics Laboratory, Princeton University"),
        ("dc.relation.isreferencedby", "10.1063/1.5017467"),
        ("dc.subject", "Plasma discharge"),
        ("dc.title", "Kinetic effects in a Hall thruster discharge"),
        ("dc.type", "Dataset"),
    ]
}
