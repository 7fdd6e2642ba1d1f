//! Catalog consistency checks.
//!
//! Resolution accepts any catalog, so nothing here is an error. The checks
//! point at rows that resolve in a way the catalog owner probably did not
//! intend:
//!
//! - more than one image flagged primary (the earliest silently wins)
//! - no image data at all (the product shows the placeholder)
//! - the same product id appearing twice

use std::collections::HashSet;
use std::fmt;

use crate::catalog::{Product, ProductId};
use crate::resolve::{ImageSource, resolve_with_source};

/// A non-fatal finding about one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    MultiplePrimaries { index: usize, id: ProductId, count: usize },
    NoImageData { index: usize, id: ProductId },
    DuplicateId { index: usize, id: ProductId },
}

impl CatalogIssue {
    /// 0-based position of the product in the catalog.
    pub fn index(&self) -> usize {
        match self {
            CatalogIssue::MultiplePrimaries { index, .. }
            | CatalogIssue::NoImageData { index, .. }
            | CatalogIssue::DuplicateId { index, .. } => *index,
        }
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::MultiplePrimaries { id, count, .. } => {
                write!(f, "{id}: {count} images flagged primary, using the first")
            }
            CatalogIssue::NoImageData { id, .. } => {
                write!(f, "{id}: no image data, placeholder shown")
            }
            CatalogIssue::DuplicateId { id, .. } => write!(f, "{id}: duplicate product id"),
        }
    }
}

/// Check every product, returning issues in catalog order.
pub fn check_catalog(products: &[Product]) -> Vec<CatalogIssue> {
    let mut seen = HashSet::new();
    let mut issues = Vec::new();

    for (index, product) in products.iter().enumerate() {
        let id = product.id();
        if !seen.insert(id) {
            issues.push(CatalogIssue::DuplicateId {
                index,
                id: id.clone(),
            });
        }

        let count = product.primary_count();
        if count > 1 {
            issues.push(CatalogIssue::MultiplePrimaries {
                index,
                id: id.clone(),
                count,
            });
        }

        // Any non-empty placeholder works here; only the winning source matters.
        let resolved = resolve_with_source(&product.resolution_request("-"));
        if resolved.source == ImageSource::Placeholder {
            issues.push(CatalogIssue::NoImageData {
                index,
                id: id.clone(),
            });
        }
    }

    issues
}
