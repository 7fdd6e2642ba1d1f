//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! Products follow a two-level pattern: a header line with the 1-based
//! position, name and id, then indented context lines.
//!
//! ```text
//! 001 Oak Desk (1)
//!     Image: /a.jpg
//!     Source: primary-local
//! 002 Chair (chair-7)
//!     Image: https://x/b.jpg
//!     Source: first-url
//!
//! Resolved 2 products (1 local, 1 remote, 0 placeholder)
//! ```

use crate::catalog::{EnrichedProduct, Product};
use crate::check::CatalogIssue;
use crate::resolve::ImageSource;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `count` followed by the singular or plural noun.
fn count_noun(count: usize, singular: &str, plural: &str) -> String {
    let noun = if count == 1 { singular } else { plural };
    format!("{} {}", count, noun)
}

/// Product header: position, name, id. Unnamed products show only the id.
fn product_header(index: usize, product: &Product) -> String {
    match product.name().filter(|name| !name.is_empty()) {
        Some(name) => format!("{} {} ({})", format_index(index), name, product.id()),
        None => format!("{} ({})", format_index(index), product.id()),
    }
}

// ============================================================================
// normalize
// ============================================================================

pub fn format_normalize_output(normalized: Option<&str>) -> Vec<String> {
    vec![normalized.unwrap_or("(none)").to_string()]
}

pub fn print_normalize_output(normalized: Option<&str>) {
    for line in format_normalize_output(normalized) {
        println!("{}", line);
    }
}

// ============================================================================
// resolve
// ============================================================================

pub fn format_resolve_output(enriched: &[EnrichedProduct<'_>]) -> Vec<String> {
    let mut lines = Vec::new();
    let (mut local, mut remote, mut placeholder) = (0, 0, 0);

    for (i, entry) in enriched.iter().enumerate() {
        lines.push(product_header(i + 1, entry.product));
        let src = if entry.image_src.is_empty() {
            "(empty)"
        } else {
            entry.image_src.as_str()
        };
        lines.push(format!("{}Image: {}", indent(1), src));
        lines.push(format!("{}Source: {}", indent(1), entry.image_source));

        match entry.image_source {
            ImageSource::PrimaryLocal | ImageSource::FirstLocal => local += 1,
            ImageSource::PrimaryUrl | ImageSource::FirstUrl => remote += 1,
            ImageSource::Placeholder => placeholder += 1,
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Resolved {} ({} local, {} remote, {} placeholder)",
        count_noun(enriched.len(), "product", "products"),
        local,
        remote,
        placeholder
    ));
    lines
}

pub fn print_resolve_output(enriched: &[EnrichedProduct<'_>]) {
    for line in format_resolve_output(enriched) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Issues grouped under their product header.
///
/// ```text
/// 002 Oak Desk (desk)
///     desk: 2 images flagged primary, using the first
///
/// 1 issue in 3 products
/// ```
pub fn format_check_output(products: &[Product], issues: &[CatalogIssue]) -> Vec<String> {
    if issues.is_empty() {
        return vec![format!(
            "No issues in {}",
            count_noun(products.len(), "product", "products")
        )];
    }

    let mut lines = Vec::new();
    let mut current = None;
    for issue in issues {
        let index = issue.index();
        if current != Some(index) {
            if let Some(product) = products.get(index) {
                lines.push(product_header(index + 1, product));
            }
            current = Some(index);
        }
        lines.push(format!("{}{}", indent(1), issue));
    }

    lines.push(String::new());
    lines.push(format!(
        "{} in {}",
        count_noun(issues.len(), "issue", "issues"),
        count_noun(products.len(), "product", "products")
    ));
    lines
}

pub fn print_check_output(products: &[Product], issues: &[CatalogIssue]) {
    for line in format_check_output(products, issues) {
        println!("{}", line);
    }
}
