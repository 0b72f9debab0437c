//! Wire types for the explorer.
//!
//! This module defines:
//! - The query request the client posts to the relay
//! - The relay's success (`{rows}`) and error envelopes
//! - The SPARQL JSON results shape the relay receives from upstream
//!
//! Field names on the client/relay wire are camelCase.

use std::collections::BTreeMap;

use foundation::bounds::GeoBounds;
use foundation::time::YearWindow;
use serde::{Deserialize, Serialize};

/// Path of the relay's query endpoint.
pub const QUERY_PATH: &str = "/api/query";

/// Maximum number of rows the upstream query returns.
pub const RESULT_LIMIT: u32 = 200;

/// Query request body: the view extent and year window.
///
/// Values are plain JSON numbers; the relay validates them before they reach
/// the query text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    pub lon_w: f64,
    pub lat_s: f64,
    pub lon_e: f64,
    pub lat_n: f64,
    pub year_start: f64,
    pub year_end: f64,
}

impl QueryParams {
    pub fn from_view(bounds: GeoBounds, window: YearWindow) -> Self {
        Self {
            lon_w: bounds.west,
            lat_s: bounds.south,
            lon_e: bounds.east,
            lat_n: bounds.north,
            year_start: window.start_year as f64,
            year_end: window.end_year as f64,
        }
    }

    pub fn bounds(&self) -> GeoBounds {
        GeoBounds::new(self.lon_w, self.lat_s, self.lon_e, self.lat_n)
    }
}

/// One matched entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResultRecord {
    /// Entity URI.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// WKT literal, `Point(lon lat)`.
    pub coord: String,
    /// ISO-8601 instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
}

/// Successful relay response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRows {
    pub rows: Vec<QueryResultRecord>,
}

/// Error body returned by the relay with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: None,
            status_text: None,
        }
    }

    pub fn upstream(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            error: "Upstream error".to_string(),
            status: Some(status),
            status_text: Some(status_text.into()),
        }
    }
}

/// SPARQL 1.1 query results, JSON format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: SparqlHead,
    pub results: SparqlBindings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparqlHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparqlBindings {
    #[serde(default)]
    pub bindings: Vec<BTreeMap<String, RdfTerm>>,
}

/// A bound value: URI, literal or blank node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdfTerm {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl RdfTerm {
    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            kind: "uri".to_string(),
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            kind: "literal".to_string(),
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }
}
