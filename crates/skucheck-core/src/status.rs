//! Badge tone classification for record status columns.

use serde::{Deserialize, Serialize};

/// Status columns carried on a product record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusField {
    /// `Product_Status`.
    ProductStatus,
    /// `AI_Status`.
    AiStatus,
    /// `AI_Quality_Check`.
    AiQualityCheck,
    /// `Listing_Status`.
    ListingStatus,
}

impl StatusField {
    /// Every status column, in display order.
    pub const ALL: [Self; 4] = [
        Self::ProductStatus,
        Self::AiStatus,
        Self::AiQualityCheck,
        Self::ListingStatus,
    ];

    /// Column name in the record store.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::ProductStatus => "Product_Status",
            Self::AiStatus => "AI_Status",
            Self::AiQualityCheck => "AI_Quality_Check",
            Self::ListingStatus => "Listing_Status",
        }
    }

    /// Short human label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProductStatus => "Product",
            Self::AiStatus => "AI",
            Self::AiQualityCheck => "QC",
            Self::ListingStatus => "Listing",
        }
    }
}

/// Visual tone a presenter should use for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    /// No particular meaning.
    Neutral,
    /// Completed or approved.
    Success,
    /// In progress or awaiting action.
    Warning,
    /// Failed or rejected.
    Error,
    /// Informational (e.g. published).
    Info,
}

impl BadgeTone {
    /// Lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// Map a status value from `field` to a badge tone. Matching is
/// case-insensitive; absent or empty values are neutral.
#[must_use]
pub fn classify_status(status: Option<&str>, field: StatusField) -> BadgeTone {
    let Some(status) = status.filter(|value| !value.is_empty()) else {
        return BadgeTone::Neutral;
    };
    let upper = status.to_uppercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|needle| upper.contains(needle));

    match field {
        StatusField::ProductStatus => {
            if upper.contains("ERROR") {
                BadgeTone::Error
            } else if contains_any(&["READY", "DONE", "GENERATED"])
                || upper == "LISTED"
                || upper == "SOLD"
            {
                BadgeTone::Success
            } else if contains_any(&["PENDING", "PROCESSING", "WAITING"]) {
                BadgeTone::Warning
            } else {
                BadgeTone::Neutral
            }
        }
        StatusField::AiStatus => {
            if upper.contains("ERROR") {
                BadgeTone::Error
            } else if upper == "AI_DONE" {
                BadgeTone::Success
            } else if contains_any(&["PENDING", "PROCESSING"]) {
                BadgeTone::Warning
            } else {
                BadgeTone::Neutral
            }
        }
        StatusField::AiQualityCheck => match upper.as_str() {
            "APPROVED" => BadgeTone::Success,
            "REJECTED" => BadgeTone::Error,
            "PENDING" => BadgeTone::Warning,
            _ => BadgeTone::Neutral,
        },
        StatusField::ListingStatus => match upper.as_str() {
            "PUBLISHED" | "LIVE" => BadgeTone::Info,
            _ => BadgeTone::Neutral,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_status_rules() {
        let field = StatusField::ProductStatus;
        assert_eq!(classify_status(Some("AI_ERROR"), field), BadgeTone::Error);
        assert_eq!(classify_status(Some("ready_for_ai"), field), BadgeTone::Success);
        assert_eq!(classify_status(Some("IMAGES_GENERATED"), field), BadgeTone::Success);
        assert_eq!(classify_status(Some("Listed"), field), BadgeTone::Success);
        assert_eq!(classify_status(Some("SOLD"), field), BadgeTone::Success);
        assert_eq!(classify_status(Some("SOLD_OUT"), field), BadgeTone::Neutral);
        assert_eq!(classify_status(Some("WAITING_PHOTOS"), field), BadgeTone::Warning);
        assert_eq!(classify_status(Some("ARCHIVED"), field), BadgeTone::Neutral);
    }

    #[test]
    fn error_wins_over_success_markers() {
        assert_eq!(
            classify_status(Some("DONE_WITH_ERROR"), StatusField::ProductStatus),
            BadgeTone::Error
        );
    }

    #[test]
    fn ai_status_rules() {
        let field = StatusField::AiStatus;
        assert_eq!(classify_status(Some("AI_DONE"), field), BadgeTone::Success);
        assert_eq!(classify_status(Some("DONE"), field), BadgeTone::Neutral);
        assert_eq!(classify_status(Some("AI_PROCESSING"), field), BadgeTone::Warning);
        assert_eq!(classify_status(Some("AI_ERROR"), field), BadgeTone::Error);
    }

    #[test]
    fn field_specific_exact_matches() {
        assert_eq!(
            classify_status(Some("approved"), StatusField::AiQualityCheck),
            BadgeTone::Success
        );
        assert_eq!(
            classify_status(Some("REJECTED"), StatusField::AiQualityCheck),
            BadgeTone::Error
        );
        assert_eq!(
            classify_status(Some("PENDING"), StatusField::AiQualityCheck),
            BadgeTone::Warning
        );
        assert_eq!(
            classify_status(Some("LIVE"), StatusField::ListingStatus),
            BadgeTone::Info
        );
        assert_eq!(
            classify_status(Some("PUBLISHED"), StatusField::ListingStatus),
            BadgeTone::Info
        );
        assert_eq!(
            classify_status(Some("APPROVED"), StatusField::ListingStatus),
            BadgeTone::Neutral
        );
    }

    #[test]
    fn missing_status_is_neutral() {
        for field in StatusField::ALL {
            assert_eq!(classify_status(None, field), BadgeTone::Neutral);
            assert_eq!(classify_status(Some(""), field), BadgeTone::Neutral);
        }
    }
}
