//! # Catalog Images
//!
//! Picks the one image a product page should show.
//!
//! Products in a quote catalog carry image metadata from several places: rows
//! in an images table (each with an optional local copy, an optional remote
//! URL and an optional primary flag) and a top-level `primaryImageUrl`. Pages
//! and API handlers only want one string. This crate turns the metadata into
//! that string with a fixed, deterministic preference order and a guaranteed
//! placeholder at the end, so no call site ever has to null-check.
//!
//! ```text
//! primary.localPath → first.localPath → primaryImageUrl → first.url → placeholder
//! ```
//!
//! The catalog itself, authentication, payments and page rendering live
//! elsewhere. They hand this crate plain records and take back a string.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`paths`] | `public/`-stripping, leading-slash normalization of stored local paths |
//! | [`resolve`] | The ordered fallback itself, with provenance of the winning candidate |
//! | [`types`] | `ProductImage` records and the borrowed `ResolutionRequest` |
//! | [`catalog`] | JSON catalog loading (file or directory) and bulk enrichment |
//! | [`check`] | Non-fatal catalog diagnostics (multiple primaries, missing data, duplicate ids) |
//! | [`config`] | `catalog-images.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## No Error Path in Resolution
//!
//! [`resolve::resolve_image_src`] returns `String`, not `Result`. Every input,
//! including no images at all, is legal and ends at the placeholder at worst.
//! Errors exist only at the edges: reading config and catalog files.
//!
//! ## Permissive Primary Flags
//!
//! The catalog does not enforce a single primary image. When several rows are
//! flagged, the earliest wins and the rest are ignored. Rejecting such rows
//! would change what pages show, so [`check`] reports them instead.
//!
//! ## Borrowed Requests
//!
//! [`types::ResolutionRequest`] borrows from the caller's record. Resolving a
//! whole catalog allocates only the resulting strings, and the pure resolver
//! runs on a rayon pool without any coordination.

pub mod catalog;
pub mod check;
pub mod config;
pub mod output;
pub mod paths;
pub mod resolve;
pub mod types;

pub use paths::normalize_local_path;
pub use resolve::{DEFAULT_PLACEHOLDER, ImageSource, ResolvedImage, resolve_image_src};
pub use types::{ProductImage, ResolutionRequest};

#[cfg(test)]
pub(crate) mod test_helpers;
