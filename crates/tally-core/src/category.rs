//! Category label normalization
//!
//! AI-extracted categories drift between singular and plural ("Groceries" vs
//! "Grocery"), so comparisons go through [`normalize_category`].

/// Categories offered when the user has not defined their own
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Groceries",
    "Dining",
    "Transport",
    "Utilities",
    "Entertainment",
    "Shopping",
    "Health",
    "Other",
];

/// Canonical form of a category label
///
/// Lower-cases and trims, then folds a plural ending: "ies" becomes "y", and a
/// single trailing "s" is dropped unless it follows another "s".
pub fn normalize_category(category: &str) -> String {
    let normalized = category.trim().to_lowercase();

    if let Some(stem) = normalized.strip_suffix("ies") {
        format!("{}y", stem)
    } else if normalized.ends_with('s') && !normalized.ends_with("ss") {
        normalized[..normalized.len() - 1].to_string()
    } else {
        normalized
    }
}

/// Whether two labels name the same category
pub fn same_category(a: &str, b: &str) -> bool {
    normalize_category(a) == normalize_category(b)
}
