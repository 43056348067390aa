//! Brand catalog: the ordered list of showroom items.
//!
//! Loaded once at boot from JSON and immutable afterwards. Every record is
//! validated up front; a single bad record makes the whole catalog
//! malformed, which is fatal for boot.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use crate::color::{parse_hex_color, ColorError, Rgba};

/// One showroom entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandItem {
    /// Unique, non-empty
    pub id: String,
    pub display_name: String,
    pub accent_color: Rgba,
    /// Absolute http(s) URL opened on activation
    pub target_url: Url,
    /// Raw logo locator as written in the catalog (absolute or relative)
    pub asset_locator: Option<String>,
}

/// Catalog record as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
struct CatalogRecord {
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    logo: Option<String>,
    #[serde(default)]
    color: Option<String>,
    link: Option<String>,
}

/// Why a catalog payload was rejected.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("record {index}: missing or empty id")]
    MissingId { index: usize },
    #[error("record {index}: duplicate id {id:?}")]
    DuplicateId { index: usize, id: String },
    #[error("record {index} ({id}): missing link")]
    MissingLink { index: usize, id: String },
    #[error("record {index} ({id}): invalid link {link:?}: {reason}")]
    InvalidLink {
        index: usize,
        id: String,
        link: String,
        reason: String,
    },
    #[error("record {index} ({id}): {source}")]
    InvalidColor {
        index: usize,
        id: String,
        #[source]
        source: ColorError,
    },
}

/// Validated, ordered catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Arc<BrandItem>>,
}

impl Catalog {
    pub fn new(items: Vec<BrandItem>) -> Self {
        Self {
            items: items.into_iter().map(Arc::new).collect(),
        }
    }

    /// Parse and validate a JSON catalog (top-level array of records).
    pub fn from_json(bytes: &[u8]) -> Result<Self, CatalogError> {
        let records: Vec<CatalogRecord> = serde_json::from_slice(bytes)?;
        let mut seen = HashSet::with_capacity(records.len());
        let mut items = Vec::with_capacity(records.len());

        for (index, rec) in records.into_iter().enumerate() {
            let item = validate_record(index, rec)?;
            if !seen.insert(item.id.clone()) {
                return Err(CatalogError::DuplicateId { index, id: item.id });
            }
            items.push(item);
        }

        log::info!("Catalog loaded: {} items", items.len());
        Ok(Self::new(items))
    }

    pub fn items(&self) -> &[Arc<BrandItem>] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Arc<BrandItem>> {
        self.items.iter().find(|it| it.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|it| it.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn validate_record(index: usize, rec: CatalogRecord) -> Result<BrandItem, CatalogError> {
    let id = rec
        .id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(CatalogError::MissingId { index })?;

    let link = rec
        .link
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CatalogError::MissingLink {
            index,
            id: id.clone(),
        })?;
    let target_url = Url::parse(&link).map_err(|e| CatalogError::InvalidLink {
        index,
        id: id.clone(),
        link: link.clone(),
        reason: e.to_string(),
    })?;
    if !matches!(target_url.scheme(), "http" | "https") {
        return Err(CatalogError::InvalidLink {
            index,
            id,
            link,
            reason: format!("unsupported scheme {:?}", target_url.scheme()),
        });
    }

    let accent_color = match rec.color.as_deref().map(str::trim) {
        None | Some("") => Rgba::DEFAULT_ACCENT,
        Some(text) => parse_hex_color(text).map_err(|source| CatalogError::InvalidColor {
            index,
            id: id.clone(),
            source,
        })?,
    };

    // Display label falls back to the id.
    let display_name = rec
        .name
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| id.clone());

    let asset_locator = rec
        .logo
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(BrandItem {
        id,
        display_name,
        accent_color,
        target_url,
        asset_locator,
    })
}
