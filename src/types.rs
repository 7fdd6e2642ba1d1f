//! Shared image metadata types.
//!
//! `ProductImage` mirrors the record the catalog database hands us, so field
//! names follow its camelCase JSON shape. Every field is optional: rows with
//! missing data are legal input and simply resolve further down the fallback
//! chain.

use serde::{Deserialize, Serialize};

/// One stored image for a product.
///
/// Nothing enforces a single primary per product. Zero, one or several
/// entries may carry `is_primary = Some(true)`; the resolver takes the
/// earliest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    /// Remote address of the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Path of a copy stored with the application, e.g. `public/products/a.jpg`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

impl ProductImage {
    /// `true` only for an explicit `isPrimary: true`.
    pub fn is_primary(&self) -> bool {
        self.is_primary == Some(true)
    }
}

/// Borrowed input to the resolver.
///
/// Built per call from whatever record the caller holds; the resolver never
/// keeps it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionRequest<'a> {
    /// Top-level copy of the primary image's remote URL.
    pub primary_image_url: Option<&'a str>,
    /// Images in catalog order. Order only matters for picking the first one.
    pub images: Option<&'a [ProductImage]>,
    /// Placeholder override. `None` means [`crate::resolve::DEFAULT_PLACEHOLDER`].
    pub placeholder: Option<&'a str>,
}

impl<'a> ResolutionRequest<'a> {
    pub fn new(images: &'a [ProductImage]) -> Self {
        Self {
            images: Some(images),
            ..Self::default()
        }
    }

    pub fn with_primary_image_url(mut self, url: Option<&'a str>) -> Self {
        self.primary_image_url = url;
        self
    }

    pub fn with_placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}
