use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use super::Source;
use crate::configuration::{Settings, StoreCredentials};
use crate::types::{Origin, Record, SourceError};

/// The hosted document store tier. Speaks the store's REST query endpoint
/// directly and is attempted only when the full credential set is configured.
///
/// The query carries the `isPubliclyViewable == true` constraint the store's
/// access rules require for public reads; filtering happens before data
/// leaves the store, never here.
pub struct RemoteSource {
    credentials: Option<StoreCredentials>,
    collection: String,
    base_url: Url,
    timeout: Duration,
}

impl RemoteSource {
    pub fn new(settings: &Settings) -> Self {
        Self {
            credentials: settings.credentials.clone(),
            collection: settings.collection.clone(),
            base_url: settings.base_url.clone(),
            timeout: settings.http_timeout,
        }
    }

    fn query_url(&self, project_id: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents:runQuery",
            self.base_url.as_str().trim_end_matches('/'),
            project_id
        )
    }

    fn query_body(&self) -> serde_json::Value {
        json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "isPubliclyViewable" },
                        "op": "EQUAL",
                        "value": { "booleanValue": true }
                    }
                }
            }
        })
    }

    fn fetch(&self, credentials: &StoreCredentials) -> Result<Vec<Record>, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| SourceError::ConnectionFailed(err.to_string()))?;

        let results: Vec<QueryResult> = client
            .post(self.query_url(&credentials.project_id))
            .json(&self.query_body())
            .send()
            .map_err(|err| SourceError::ConnectionFailed(err.to_string()))?
            .error_for_status()
            .map_err(|err| SourceError::ConnectionFailed(err.to_string()))?
            .json()
            .map_err(|err| SourceError::ParseFailed(err.to_string()))?;

        let records: Vec<Record> = results
            .iter()
            // Result envelopes without a document (readTime-only pages) carry no data.
            .filter_map(|result| result.document.as_ref())
            .filter_map(|document| match document.to_record() {
                Some(record) => Some(record),
                None => {
                    warn!("skipping malformed document {}", document.name);
                    None
                }
            })
            .collect();

        if records.is_empty() {
            return Err(SourceError::NotFound);
        }
        Ok(records)
    }
}

impl Source for RemoteSource {
    fn origin(&self) -> Origin {
        Origin::RemoteStore
    }

    fn load(&self) -> Result<Vec<Record>, SourceError> {
        let credentials = self.credentials.as_ref().ok_or(SourceError::ConfigMissing)?;
        debug!(
            "querying collection {} in project {}",
            self.collection, credentials.project_id
        );
        self.fetch(credentials)
    }
}

/// One element of the store's `runQuery` response array.
#[derive(Debug, Deserialize)]
struct QueryResult {
    document: Option<StoreDocument>,
}

#[derive(Debug, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    fields: HashMap<String, TypedValue>,
}

/// The store wraps every field value in a type envelope; integers travel as
/// decimal strings, and loosely typed writers sometimes store them as doubles.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TypedValue {
    integer_value: Option<String>,
    double_value: Option<f64>,
    string_value: Option<String>,
}

impl TypedValue {
    fn as_i64(&self) -> Option<i64> {
        if let Some(value) = &self.integer_value {
            return value.parse().ok();
        }
        self.double_value
            .filter(|value| value.fract() == 0.0)
            .map(|value| value as i64)
    }

    fn as_count(&self) -> Option<u32> {
        self.as_i64().and_then(|value| u32::try_from(value).ok())
    }
}

impl StoreDocument {
    /// Map the document's typed fields onto a record. `None` marks the
    /// document malformed; the caller skips it without aborting the batch.
    fn to_record(&self) -> Option<Record> {
        Some(Record {
            year: i32::try_from(self.fields.get("Year")?.as_i64()?).ok()?,
            pathogen: self.fields.get("Pathogen")?.string_value.clone()?,
            positive: self.fields.get("Positive")?.as_count()?,
            negative: self.fields.get("Negative")?.as_count()?,
            unknown: match self.fields.get("Unknown") {
                Some(value) => Some(value.as_count()?),
                None => None,
            },
        })
    }
}
