//! Manifest parsing
//!
//! The manifest is untrusted remote JSON. Malformed descriptors are dropped
//! one by one; a malformed document is rejected as a whole.

use crate::domain::entities::EndpointDescriptor;
use crate::domain::value_objects::{EndpointKind, AUTO_REGION, SECURE_SCHEME};
use serde::Serialize;
use serde_json::Value;

/// A validated endpoint manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub version: u64,
    pub updated: String,
    pub endpoints: Vec<EndpointDescriptor>,
}

/// Reasons a manifest body is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("manifest is not a JSON object")]
    NotAnObject,
    #[error("manifest version is not a non-negative integer")]
    InvalidVersion,
    #[error("manifest updated field is not a string")]
    InvalidUpdated,
    #[error("manifest has no endpoints field")]
    MissingEndpoints,
    #[error("manifest endpoints field is not an array")]
    EndpointsNotArray,
    #[error("manifest has no valid endpoints ({0} rejected)")]
    NoValidEndpoints(usize),
}

impl Manifest {
    /// Parse and validate a manifest body.
    pub fn parse(body: &str) -> Result<Self, ManifestError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| ManifestError::InvalidJson(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Validate an already decoded manifest document.
    pub fn from_value(value: &Value) -> Result<Self, ManifestError> {
        let obj = value.as_object().ok_or(ManifestError::NotAnObject)?;

        let version = match obj.get("version") {
            None | Some(Value::Null) => 0,
            Some(v) => v.as_u64().ok_or(ManifestError::InvalidVersion)?,
        };

        let updated = match obj.get("updated") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(ManifestError::InvalidUpdated),
        };

        let entries = obj
            .get("endpoints")
            .ok_or(ManifestError::MissingEndpoints)?
            .as_array()
            .ok_or(ManifestError::EndpointsNotArray)?;

        let endpoints: Vec<EndpointDescriptor> =
            entries.iter().filter_map(parse_descriptor).collect();

        if endpoints.is_empty() {
            return Err(ManifestError::NoValidEndpoints(entries.len()));
        }

        if endpoints.len() < entries.len() {
            tracing::debug!(
                "manifest v{}: dropped {} invalid endpoint(s)",
                version,
                entries.len() - endpoints.len()
            );
        }

        Ok(Self {
            version,
            updated,
            endpoints,
        })
    }
}

/// Validate a single manifest entry.
///
/// Requires a non-empty `https://` url and a non-empty region. A missing or
/// unknown kind is inferred rather than rejected.
fn parse_descriptor(entry: &Value) -> Option<EndpointDescriptor> {
    let obj = entry.as_object()?;

    let url = obj.get("url")?.as_str()?.trim();
    if url.len() <= SECURE_SCHEME.len() || !url.starts_with(SECURE_SCHEME) {
        return None;
    }

    let region = obj.get("region")?.as_str()?.trim();
    if region.is_empty() {
        return None;
    }

    let kind = obj
        .get("kind")
        .and_then(Value::as_str)
        .and_then(EndpointKind::parse)
        .unwrap_or(if region == AUTO_REGION {
            EndpointKind::Auto
        } else {
            EndpointKind::Direct
        });

    Some(EndpointDescriptor::new(url, region, kind))
}
