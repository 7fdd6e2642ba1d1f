//! Product catalog loading and enrichment.
//!
//! The catalog is exported by the persistence layer as JSON. Two shapes are
//! accepted:
//!
//! ```text
//! [ { "id": 1, "name": "Oak Desk", "images": [...] }, ... ]
//! { "products": [ { ... }, ... ] }
//! ```
//!
//! A directory is also accepted: every `*.json` file beneath it is loaded in
//! path order and the products are concatenated. This matches exports that
//! write one file per category.
//!
//! Records are kept verbatim, including fields the resolver does not care
//! about (price, sku, per-image alt text) and explicit nulls. `enrich` output
//! is the input record plus `imageSrc` and `imageSource`; an input that was
//! already enriched has those two keys replaced.

use rayon::prelude::*;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::resolve::{ImageSource, resolve_with_source};
use crate::types::{ProductImage, ResolutionRequest};

/// Keys written by `enrich`. Stale copies in the input record are replaced.
const ENRICHED_KEYS: [&str; 2] = ["imageSrc", "imageSource"];

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid catalog JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Catalog must be a JSON array or an object with a \"products\" array: {0}")]
    Shape(PathBuf),
}

/// Product identifier as stored upstream: any JSON number, or text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(Number),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{n}"),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

/// The fields of a product record the resolver reads.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductFields {
    id: ProductId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    primary_image_url: Option<String>,
    #[serde(default)]
    images: Option<Vec<ProductImage>>,
}

/// One catalog product.
///
/// The JSON record is kept exactly as loaded and is what gets serialized.
/// The typed fields are read-only views of it, so image rows keep their
/// extra keys and explicit nulls stay null.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Product {
    id: ProductId,
    name: Option<String>,
    primary_image_url: Option<String>,
    images: Option<Vec<ProductImage>>,
    record: Map<String, Value>,
}

impl TryFrom<Value> for Product {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let fields = ProductFields::deserialize(&value)?;
        let Value::Object(record) = value else {
            return Err(serde::de::Error::custom("product must be a JSON object"));
        };
        Ok(Product {
            id: fields.id,
            name: fields.name,
            primary_image_url: fields.primary_image_url,
            images: fields.images,
            record,
        })
    }
}

impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

impl Product {
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn primary_image_url(&self) -> Option<&str> {
        self.primary_image_url.as_deref()
    }

    pub fn images(&self) -> Option<&[ProductImage]> {
        self.images.as_deref()
    }

    /// The record as loaded, unknown fields included.
    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    /// Borrow this product as resolver input.
    pub fn resolution_request<'a>(&'a self, placeholder: &'a str) -> ResolutionRequest<'a> {
        ResolutionRequest {
            primary_image_url: self.primary_image_url(),
            images: self.images(),
            placeholder: Some(placeholder),
        }
    }

    /// Number of image rows flagged primary.
    pub fn primary_count(&self) -> usize {
        self.images
            .iter()
            .flatten()
            .filter(|image| image.is_primary())
            .count()
    }
}

/// A product with its resolved display image.
///
/// Serializes as the product record followed by `imageSrc` and `imageSource`.
#[derive(Debug)]
pub struct EnrichedProduct<'a> {
    pub product: &'a Product,
    pub image_src: String,
    pub image_source: ImageSource,
}

impl Serialize for EnrichedProduct<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.product.record() {
            if !ENRICHED_KEYS.contains(&key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        map.serialize_entry("imageSrc", &self.image_src)?;
        map.serialize_entry("imageSource", &self.image_source)?;
        map.end()
    }
}

/// Load products from a catalog file or directory of catalog files.
pub fn load_catalog(path: &Path) -> Result<Vec<Product>, CatalogError> {
    if path.is_dir() {
        load_catalog_dir(path)
    } else {
        load_catalog_file(path)
    }
}

/// Load a single catalog JSON file.
pub fn load_catalog_file(path: &Path) -> Result<Vec<Product>, CatalogError> {
    let content = fs::read_to_string(path)?;
    let json_error = |source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    };
    let value: Value = serde_json::from_str(&content).map_err(json_error)?;
    let list = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => match map.remove("products") {
            Some(products @ Value::Array(_)) => products,
            _ => return Err(CatalogError::Shape(path.to_path_buf())),
        },
        _ => return Err(CatalogError::Shape(path.to_path_buf())),
    };
    let products: Vec<Product> = serde_json::from_value(list).map_err(json_error)?;
    tracing::debug!(path = %path.display(), count = products.len(), "loaded catalog file");
    Ok(products)
}

/// Load every `*.json` file under `dir`, sorted by path.
pub fn load_catalog_dir(dir: &Path) -> Result<Vec<Product>, CatalogError> {
    let mut products = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        if !entry.file_type().is_file() || !is_json {
            continue;
        }
        let loaded = load_catalog_file(path)?;
        if loaded.is_empty() {
            tracing::warn!(path = %path.display(), "catalog file contains no products");
        }
        products.extend(loaded);
    }
    Ok(products)
}

/// Resolve the display image of every product, preserving input order.
///
/// Resolution is pure, so products are processed on the rayon pool.
pub fn enrich<'a>(products: &'a [Product], placeholder: &str) -> Vec<EnrichedProduct<'a>> {
    let enriched: Vec<EnrichedProduct<'a>> = products
        .par_iter()
        .map(|product| {
            let resolved = resolve_with_source(&product.resolution_request(placeholder));
            EnrichedProduct {
                product,
                image_src: resolved.src,
                image_source: resolved.source,
            }
        })
        .collect();
    tracing::debug!(count = enriched.len(), "enriched products");
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::DEFAULT_PLACEHOLDER;
    use crate::test_helpers::*;
    use serde_json::json;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"[
        {
            "id": 1,
            "name": "Oak Desk",
            "price": 420.5,
            "images": [
                {"isPrimary": true, "localPath": "public/a.jpg"},
                {"localPath": "b.jpg", "url": "https://x/b.jpg"}
            ]
        },
        {
            "id": "chair-7",
            "name": "Chair",
            "primaryImageUrl": null,
            "images": [{"url": "https://x/b.jpg"}]
        },
        {"id": 3, "name": "Lamp", "images": []}
    ]"#;

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn load_array_catalog() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "catalog.json", SAMPLE);

        let products = load_catalog(&tmp.path().join("catalog.json")).unwrap();
        assert_eq!(products.len(), 3);
        assert_eq!(products[0].id(), &ProductId::Number(Number::from(1u64)));
        assert_eq!(products[1].id(), &ProductId::Text("chair-7".into()));
        assert_eq!(products[0].images().unwrap().len(), 2);
    }

    #[test]
    fn load_wrapped_catalog() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "catalog.json",
            r#"{"products": [{"id": 9, "name": "Shelf"}], "exportedAt": "2026-01-01"}"#,
        );

        let products = load_catalog(&tmp.path().join("catalog.json")).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name(), Some("Shelf"));
        assert!(products[0].images().is_none());
    }

    #[test]
    fn load_rejects_wrong_shape() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "catalog.json", r#"{"items": []}"#);

        let result = load_catalog(&tmp.path().join("catalog.json"));
        assert!(matches!(result, Err(CatalogError::Shape(_))));
    }

    #[test]
    fn load_rejects_invalid_json() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "catalog.json", "[{");

        let result = load_catalog(&tmp.path().join("catalog.json"));
        assert!(matches!(result, Err(CatalogError::Json { .. })));
    }

    #[test]
    fn load_rejects_product_without_id() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "catalog.json", r#"[{"name": "Nameless"}]"#);

        let result = load_catalog(&tmp.path().join("catalog.json"));
        assert!(matches!(result, Err(CatalogError::Json { .. })));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_catalog(&tmp.path().join("missing.json"));
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    #[test]
    fn load_directory_concatenates_in_path_order() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "b-chairs.json", r#"[{"id": "chair"}]"#);
        write_file(tmp.path(), "a-desks.json", r#"[{"id": "desk"}]"#);
        write_file(tmp.path(), "nested/c-lamps.json", r#"{"products": [{"id": "lamp"}]}"#);
        write_file(tmp.path(), "notes.txt", "not a catalog");

        let products = load_catalog(tmp.path()).unwrap();
        let ids: Vec<String> = products.iter().map(|p| p.id().to_string()).collect();
        assert_eq!(ids, vec!["desk", "chair", "lamp"]);
    }

    #[test]
    fn unknown_fields_survive_roundtrip() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "catalog.json", SAMPLE);
        let products = load_catalog(&tmp.path().join("catalog.json")).unwrap();

        let json = serde_json::to_value(&products[0]).unwrap();
        assert_eq!(json["price"], serde_json::json!(420.5));
        assert_eq!(json["name"], "Oak Desk");
    }

    #[test]
    fn load_accepts_float_and_large_numeric_ids() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "catalog.json",
            r#"[{"id": 1.5}, {"id": 18446744073709551615}, {"id": -3}]"#,
        );

        let products = load_catalog(&tmp.path().join("catalog.json")).unwrap();
        let ids: Vec<String> = products.iter().map(|p| p.id().to_string()).collect();
        assert_eq!(ids, vec!["1.5", "18446744073709551615", "-3"]);
    }

    #[test]
    fn load_rejects_non_object_product() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "catalog.json", r#"[{"id": 1}, "desk"]"#);

        let result = load_catalog(&tmp.path().join("catalog.json"));
        assert!(matches!(result, Err(CatalogError::Json { .. })));
    }

    // =========================================================================
    // Record pass-through
    // =========================================================================

    #[test]
    fn typed_views_read_the_record() {
        let desk = record(json!({
            "id": "desk",
            "name": null,
            "primaryImageUrl": "https://x/desk.jpg",
            "images": [{"id": "img-1", "isPrimary": true, "localPath": "a.jpg"}],
        }));
        assert_eq!(desk.name(), None);
        assert_eq!(desk.primary_image_url(), Some("https://x/desk.jpg"));
        assert_eq!(desk.images().unwrap(), &[image().primary().local("a.jpg")]);
        assert_eq!(desk.record()["images"][0]["id"], "img-1");
    }

    #[test]
    fn enrich_keeps_nested_image_fields() {
        let products = vec![record(json!({
            "id": 1,
            "images": [{"id": "img-1", "alt": "Desk", "sortOrder": 2, "localPath": "a.jpg"}],
        }))];
        let json = serde_json::to_value(enrich(&products, DEFAULT_PLACEHOLDER)).unwrap();

        assert_eq!(
            json[0]["images"],
            json!([{"id": "img-1", "alt": "Desk", "sortOrder": 2, "localPath": "a.jpg"}])
        );
        assert_eq!(json[0]["imageSrc"], "/a.jpg");
    }

    #[test]
    fn enrich_keeps_explicit_nulls_and_adds_no_fields() {
        let input = json!({"id": 1, "primaryImageUrl": null, "images": null});
        let products = vec![record(input.clone())];
        let json = serde_json::to_value(&enrich(&products, DEFAULT_PLACEHOLDER)[0]).unwrap();

        let mut expected = input;
        expected["imageSrc"] = json!("/images/placeholder.svg");
        expected["imageSource"] = json!("placeholder");
        assert_eq!(json, expected);
        assert!(json.get("name").is_none());
    }

    #[test]
    fn enrich_replaces_stale_enriched_keys() {
        let products = vec![record(json!({
            "id": 1,
            "imageSrc": "/old.svg",
            "imageSource": "placeholder",
            "images": [{"localPath": "a.jpg"}],
        }))];
        let text = serde_json::to_string(&enrich(&products, DEFAULT_PLACEHOLDER)).unwrap();

        assert_eq!(text.matches("\"imageSrc\"").count(), 1);
        assert_eq!(text.matches("\"imageSource\"").count(), 1);
        let json: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json[0]["imageSrc"], "/a.jpg");
        assert_eq!(json[0]["imageSource"], "first-local");
    }

    #[test]
    fn enriching_twice_matches_enriching_once() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "catalog.json", SAMPLE);
        let products = load_catalog(&tmp.path().join("catalog.json")).unwrap();
        let once = serde_json::to_string_pretty(&enrich(&products, DEFAULT_PLACEHOLDER)).unwrap();

        write_file(tmp.path(), "enriched.json", &once);
        let reloaded = load_catalog(&tmp.path().join("enriched.json")).unwrap();
        let twice = serde_json::to_string_pretty(&enrich(&reloaded, DEFAULT_PLACEHOLDER)).unwrap();

        assert_eq!(once, twice);
    }

    // =========================================================================
    // Enrichment
    // =========================================================================

    #[test]
    fn enrich_resolves_each_product_in_order() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "catalog.json", SAMPLE);
        let products = load_catalog(&tmp.path().join("catalog.json")).unwrap();

        let enriched = enrich(&products, DEFAULT_PLACEHOLDER);
        let srcs: Vec<&str> = enriched.iter().map(|e| e.image_src.as_str()).collect();
        assert_eq!(srcs, vec!["/a.jpg", "https://x/b.jpg", "/images/placeholder.svg"]);
        assert_eq!(enriched[0].image_source, ImageSource::PrimaryLocal);
        assert_eq!(enriched[1].image_source, ImageSource::FirstUrl);
        assert_eq!(enriched[2].image_source, ImageSource::Placeholder);
    }

    #[test]
    fn enrich_uses_given_placeholder() {
        let products = vec![product("empty", &[])];
        let enriched = enrich(&products, "/static/none.png");
        assert_eq!(enriched[0].image_src, "/static/none.png");
    }

    #[test]
    fn enriched_json_carries_product_fields() {
        let images = vec![image().local("public/desk.jpg")];
        let products = vec![product("desk", &images)];
        let enriched = enrich(&products, DEFAULT_PLACEHOLDER);

        let json = serde_json::to_value(&enriched[0]).unwrap();
        assert_eq!(json["id"], "desk");
        assert_eq!(json["imageSrc"], "/desk.jpg");
        assert_eq!(json["imageSource"], "first-local");
        assert_eq!(json["images"][0]["localPath"], "public/desk.jpg");
    }

    #[test]
    fn primary_count_counts_flags() {
        let images = vec![image().primary(), image(), image().primary()];
        assert_eq!(product("p", &images).primary_count(), 2);
        assert_eq!(product("q", &[]).primary_count(), 0);
    }
}
