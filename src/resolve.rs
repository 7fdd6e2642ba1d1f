//! Display image resolution.
//!
//! A product may know about its image in several ways at once: a local copy
//! on the primary image row, a local copy on the first row, a top-level
//! `primaryImageUrl`, and a remote `url` on the first row. Exactly one string
//! is handed to the page.
//!
//! ## Resolution priority
//!
//! The first non-empty candidate wins:
//!
//! 1. local path of the first image flagged primary (normalized)
//! 2. local path of the first image (normalized)
//! 3. `primaryImageUrl`, verbatim
//! 4. remote `url` of the first image, verbatim
//! 5. the placeholder
//!
//! Local copies beat remote URLs because they render without a network round
//! trip, and a primary flag beats list position. Remote URLs are never
//! rewritten.
//!
//! Resolution has no error path. With the default placeholder something
//! renderable always comes back; an empty placeholder override can produce
//! `""`, which callers treat as "no image".

use serde::Serialize;
use std::fmt;

use crate::paths::normalize_local_path;
use crate::types::ResolutionRequest;

/// Placeholder used when the request does not override it.
pub const DEFAULT_PLACEHOLDER: &str = "/images/placeholder.svg";

/// Which candidate produced the resolved string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageSource {
    PrimaryLocal,
    FirstLocal,
    PrimaryUrl,
    FirstUrl,
    Placeholder,
}

impl ImageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSource::PrimaryLocal => "primary-local",
            ImageSource::FirstLocal => "first-local",
            ImageSource::PrimaryUrl => "primary-url",
            ImageSource::FirstUrl => "first-url",
            ImageSource::Placeholder => "placeholder",
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved display string together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedImage {
    pub src: String,
    pub source: ImageSource,
}

/// Ordered, non-empty display candidates for a request.
///
/// The placeholder is always last unless it was overridden with `""`, in which
/// case the list may be empty.
pub fn candidates(request: &ResolutionRequest<'_>) -> Vec<(ImageSource, String)> {
    let images = request.images.unwrap_or_default();
    let primary = images.iter().find(|image| image.is_primary());
    let first = images.first();

    let raw: [(ImageSource, Option<String>); 5] = [
        (
            ImageSource::PrimaryLocal,
            primary.and_then(|image| normalize_local_path(image.local_path.as_deref())),
        ),
        (
            ImageSource::FirstLocal,
            first.and_then(|image| normalize_local_path(image.local_path.as_deref())),
        ),
        (
            ImageSource::PrimaryUrl,
            request.primary_image_url.map(String::from),
        ),
        (
            ImageSource::FirstUrl,
            first.and_then(|image| image.url.clone()),
        ),
        (
            ImageSource::Placeholder,
            Some(request.placeholder.unwrap_or(DEFAULT_PLACEHOLDER).to_string()),
        ),
    ];

    raw.into_iter()
        .filter_map(|(source, value)| value.filter(|s| !s.is_empty()).map(|s| (source, s)))
        .collect()
}

/// Resolve the display image and report which candidate won.
pub fn resolve_with_source(request: &ResolutionRequest<'_>) -> ResolvedImage {
    match candidates(request).into_iter().next() {
        Some((source, src)) => ResolvedImage { src, source },
        // Only reachable with an empty placeholder override.
        None => ResolvedImage {
            src: String::new(),
            source: ImageSource::Placeholder,
        },
    }
}

/// Resolve the display image for a request.
pub fn resolve_image_src(request: &ResolutionRequest<'_>) -> String {
    resolve_with_source(request).src
}
