//! Shared test utilities for the catalog-images test suite.
//!
//! Builders keep image fixtures to one line:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let images = vec![
//!     image().primary().local("public/a.jpg"),
//!     image().url("https://cdn.example/b.jpg"),
//! ];
//! let desk = product("desk", &images);
//! let shelf = record(json!({"id": 9, "primaryImageUrl": "https://x/shelf.jpg"}));
//! ```

use std::path::Path;

use serde_json::{Value, json};

use crate::catalog::Product;
use crate::types::ProductImage;

// =========================================================================
// Image and product builders
// =========================================================================

/// An image row with every field absent.
pub fn image() -> ProductImage {
    ProductImage::default()
}

impl ProductImage {
    pub fn primary(mut self) -> Self {
        self.is_primary = Some(true);
        self
    }

    pub fn local(mut self, path: &str) -> Self {
        self.local_path = Some(path.to_string());
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }
}

/// A product with a text id, a name made from the id with dashes replaced by
/// spaces, and the given images.
pub fn product(id: &str, images: &[ProductImage]) -> Product {
    record(json!({
        "id": id,
        "name": id.replace('-', " "),
        "images": images,
    }))
}

/// A product parsed from a literal JSON record.
pub fn record(value: Value) -> Product {
    serde_json::from_value(value).unwrap()
}

// =========================================================================
// Fixture files
// =========================================================================

/// Write `contents` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}
