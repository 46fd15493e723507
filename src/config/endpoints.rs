//! Endpoint list loading.
//!
//! The endpoint list is a JSON array of URL strings, read once at startup:
//!
//! ```json
//! ["https://example.com/health", "http://10.0.0.5:8080/"]
//! ```
//!
//! Entries that are not absolute http(s) URLs are skipped, duplicates are dropped.
//! The URL string itself is the endpoint identity, so entries are kept verbatim.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use url::Url;

/// Error type for endpoint list loading.
#[derive(Debug)]
pub enum EndpointsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for EndpointsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointsError::Io(e) => write!(f, "IO error: {}", e),
            EndpointsError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for EndpointsError {}

/// Read the endpoint list from a JSON file.
pub fn load_endpoints(path: &Path) -> Result<Vec<String>, EndpointsError> {
    let content = fs::read_to_string(path).map_err(EndpointsError::Io)?;
    parse_endpoints(&content)
}

/// Parse the endpoint list from JSON text.
pub fn parse_endpoints(content: &str) -> Result<Vec<String>, EndpointsError> {
    let raw: Vec<String> = serde_json::from_str(content).map_err(EndpointsError::Parse)?;

    let mut seen = HashSet::new();
    let mut endpoints = Vec::with_capacity(raw.len());
    for entry in raw {
        if !is_probeable(&entry) {
            tracing::warn!(url = %entry, "Skipping endpoint: not an absolute http(s) URL");
            continue;
        }
        if !seen.insert(entry.clone()) {
            tracing::warn!(url = %entry, "Skipping duplicate endpoint");
            continue;
        }
        endpoints.push(entry);
    }

    Ok(endpoints)
}

fn is_probeable(entry: &str) -> bool {
    match Url::parse(entry) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}
