//! The kinds of resource managed through the admin API.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A managed resource type.
///
/// `Store` is the tenant root; the others live under `/api/{storeId}/...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Store,
    Billboard,
    Category,
    Color,
    Size,
    Product,
}

impl ResourceKind {
    /// Every kind, stores first.
    pub const ALL: [Self; 6] = [
        Self::Store,
        Self::Billboard,
        Self::Category,
        Self::Color,
        Self::Size,
        Self::Product,
    ];

    /// Plural URL segment, e.g. `billboards`.
    #[must_use]
    pub const fn path_segment(&self) -> &'static str {
        match self {
            Self::Store => "stores",
            Self::Billboard => "billboards",
            Self::Category => "categories",
            Self::Color => "colors",
            Self::Size => "sizes",
            Self::Product => "products",
        }
    }

    /// Capitalized singular name, e.g. `Billboard`.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Store => "Store",
            Self::Billboard => "Billboard",
            Self::Category => "Category",
            Self::Color => "Color",
            Self::Size => "Size",
            Self::Product => "Product",
        }
    }

    /// Upper-case tag prefix used in server logs, e.g. `BILLBOARDS`.
    #[must_use]
    pub const fn log_tag(&self) -> &'static str {
        match self {
            Self::Store => "STORES",
            Self::Billboard => "BILLBOARDS",
            Self::Category => "CATEGORIES",
            Self::Color => "COLORS",
            Self::Size => "SIZES",
            Self::Product => "PRODUCTS",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments_are_unique() {
        let mut segments: Vec<_> = ResourceKind::ALL.iter().map(ResourceKind::path_segment).collect();
        segments.sort_unstable();
        segments.dedup();
        assert_eq!(segments.len(), ResourceKind::ALL.len());
    }

    #[test]
    fn test_display() {
        assert_eq!(ResourceKind::Category.to_string(), "Category");
        assert_eq!(ResourceKind::Category.path_segment(), "categories");
    }
}
