//! Local image path normalization.
//!
//! Catalog rows store local paths the way they were written to disk, usually
//! relative to the project root (`public/products/a.jpg`). Browsers need the
//! web-root form (`/products/a.jpg`). The conversion is purely syntactic:
//!
//! - `public/foo/bar.png` → `/foo/bar.png`
//! - `foo/bar.png`        → `/foo/bar.png`
//! - `/foo/bar.png`       → `/foo/bar.png`
//!
//! No existence or traversal checks are made; `../x` becomes `/../x`.

/// Directory prefix that the web server maps to `/`.
const PUBLIC_PREFIX: &str = "public/";

/// Normalize a stored local path into a web-root path.
///
/// Returns `None` for absent or empty input. Only one literal `public/` prefix
/// is removed and everything after it is left untouched.
pub fn normalize_local_path(path: Option<&str>) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    let stripped = path.strip_prefix(PUBLIC_PREFIX).unwrap_or(path);
    if stripped.starts_with('/') {
        Some(stripped.to_string())
    } else {
        Some(format!("/{stripped}"))
    }
}
