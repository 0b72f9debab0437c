use std::collections::BTreeMap;

use protocol::{QueryResultRecord, RdfTerm, SparqlResults};

/// Variable names bound by the query template.
pub const VAR_ITEM: &str = "item";
pub const VAR_LABEL: &str = "itemLabel";
pub const VAR_COORD: &str = "coord";
pub const VAR_WHEN: &str = "when";
pub const VAR_ARTICLE: &str = "article";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRows {
    pub rows: Vec<QueryResultRecord>,
    /// Rows skipped because `item` or `coord` was unbound.
    pub dropped: usize,
}

/// Decode a SPARQL JSON results document.
pub fn parse_results_json(body: &[u8]) -> Result<ParsedRows, serde_json::Error> {
    let results: SparqlResults = serde_json::from_slice(body)?;
    Ok(parse_bindings(&results))
}

pub fn parse_bindings(results: &SparqlResults) -> ParsedRows {
    let mut parsed = ParsedRows::default();
    for row in &results.results.bindings {
        match parse_row(row) {
            Some(rec) => parsed.rows.push(rec),
            None => parsed.dropped += 1,
        }
    }
    parsed
}

/// One bindings row to a record; `None` if a required variable is missing.
pub fn parse_row(row: &BTreeMap<String, RdfTerm>) -> Option<QueryResultRecord> {
    let id = row.get(VAR_ITEM)?.value.clone();
    let coord = row.get(VAR_COORD)?.value.clone();
    Some(QueryResultRecord {
        id,
        label: optional(row, VAR_LABEL),
        coord,
        when: optional(row, VAR_WHEN),
        article: optional(row, VAR_ARTICLE),
    })
}

fn optional(row: &BTreeMap<String, RdfTerm>, var: &str) -> Option<String> {
    row.get(var).map(|t| t.value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BODY: &str = r#"{
      "head": {"vars": ["item", "itemLabel", "coord", "when", "article"]},
      "results": {"bindings": [
        {
          "item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q1"},
          "itemLabel": {"type": "literal", "xml:lang": "en", "value": "First"},
          "coord": {"type": "literal", "datatype": "http://www.opengis.net/ont/geosparql#wktLiteral", "value": "Point(-3.7 40.4)"},
          "when": {"type": "literal", "datatype": "http://www.w3.org/2001/XMLSchema#dateTime", "value": "1936-07-17T00:00:00Z"},
          "article": {"type": "uri", "value": "https://en.wikipedia.org/wiki/First"}
        },
        {
          "item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q2"},
          "coord": {"type": "literal", "value": "Point(2.35 48.85)"}
        },
        {
          "item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q3"},
          "itemLabel": {"type": "literal", "value": "No coordinate"}
        },
        {
          "coord": {"type": "literal", "value": "Point(0 0)"}
        }
      ]}
    }"#;

    #[test]
    fn parses_rows_and_drops_incomplete_ones() {
        let parsed = parse_results_json(BODY.as_bytes()).expect("valid json");
        assert_eq!(parsed.dropped, 2);
        assert_eq!(
            parsed.rows,
            vec![
                QueryResultRecord {
                    id: "http://www.wikidata.org/entity/Q1".into(),
                    label: Some("First".into()),
                    coord: "Point(-3.7 40.4)".into(),
                    when: Some("1936-07-17T00:00:00Z".into()),
                    article: Some("https://en.wikipedia.org/wiki/First".into()),
                },
                QueryResultRecord {
                    id: "http://www.wikidata.org/entity/Q2".into(),
                    label: None,
                    coord: "Point(2.35 48.85)".into(),
                    when: None,
                    article: None,
                },
            ]
        );
    }

    #[test]
    fn empty_bindings() {
        let parsed = parse_results_json(br#"{"results": {"bindings": []}}"#).expect("valid");
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.dropped, 0);
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_results_json(b"<html>rate limited</html>").is_err());
        assert!(parse_results_json(br#"{"head": {}}"#).is_err());
    }
}
