//! Query-string contract of the search page (`?q=<query>&debug=1`).

use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationParams {
    pub query: Option<String>,
    pub debug: bool,
}

/// Parses `?q=...&debug=1` (the leading `?` is optional).
pub fn parse_location(search: &str) -> LocationParams {
    let raw = search.split_once('?').map(|(_, rest)| rest).unwrap_or(search);
    let mut params = LocationParams::default();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            "q" if params.query.is_none() => {
                let value = value.trim();
                if !value.is_empty() {
                    params.query = Some(value.to_string());
                }
            }
            "debug" => params.debug = value == "1",
            _ => {}
        }
    }
    params
}

/// Location that encodes `query` so reload/back-navigation restores it.
pub fn search_location(path: &str, query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{path}?q={encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_the_query_string() {
        let location = search_location("/results.html", "cats & dogs");
        assert_eq!(location, "/results.html?q=cats+%26+dogs");
        let params = parse_location(&location);
        assert_eq!(params.query.as_deref(), Some("cats & dogs"));
        assert!(!params.debug);
    }

    #[test]
    fn debug_flag_and_blank_query() {
        let params = parse_location("?q=%20%20&debug=1");
        assert_eq!(params.query, None);
        assert!(params.debug);
        assert_eq!(parse_location(""), LocationParams::default());
    }
}
