//! Response documents and field projections.

use serde::Deserialize;
use skucheck_core::ProductRecord;

/// Columns requested for product lookups.
pub const PRODUCT_FIELDS: &[&str] = &[
    "SKU",
    "Product_Status",
    "AI_Status",
    "AI_Quality_Check",
    "Listing_Status",
    "Brand_TXT",
    "Category",
    "Sub-Category",
    "gender",
    "Size (INT)",
    "Colors",
    "Condizione",
    "Note Prodotto",
    "RAW",
    "RAW_FolderID",
    "RAW_Photo_Count",
    "rawID_FRONT",
    "rawID_BACK",
    "AI_Front_Image_Link",
    "AI_Back_Image_Link",
];

/// Columns requested for linked raw-data records.
pub const LINKED_FIELDS: &[&str] = &["Folder_ID", "Folder_Link", "Photo_Count"];

/// List endpoint envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse {
    #[serde(default)]
    pub(crate) records: Vec<ProductRecord>,
}
