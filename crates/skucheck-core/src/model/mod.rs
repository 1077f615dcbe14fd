//! Record and file DTOs shared across the workspace.
//!
//! # Design
//! - Field names mirror the record store columns through serde renames so the
//!   Airtable client can decode responses directly.
//! - Lookup columns may arrive as a scalar or a one-element array; both shapes
//!   decode through [`OneOrMany`].
//! - Display-only columns decode into [`FieldValue`] and never fail a fetch.
//! - Id columns that hold an unexpected shape (formula errors, numbers) decode
//!   as absent instead of failing the fetch.

use std::fmt::{self, Display, Formatter};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::links::extract_folder_id;
use crate::status::StatusField;

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// A value stored either as a scalar or as a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// Scalar value.
    One(T),
    /// Sequence value; lookups usually hold a single element.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// First value, taking the head of a sequence.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        match self {
            Self::One(value) => Some(value),
            Self::Many(values) => values.first(),
        }
    }
}

impl OneOrMany<String> {
    /// First value when it is a non-empty string.
    #[must_use]
    pub fn first_non_empty(&self) -> Option<&str> {
        self.first()
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Loosely-typed display value from the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox column.
    Flag(bool),
    /// Numeric column.
    Number(serde_json::Number),
    /// Text, single-select, or URL column.
    Text(String),
    /// Multi-select or lookup column.
    List(Vec<FieldValue>),
    /// Anything else (attachments, collaborators, ...).
    Other(serde_json::Value),
}

impl FieldValue {
    /// Text content, taking the first element of a list.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::List(values) => values.first().and_then(Self::as_text),
            _ => None,
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(formatter, "{flag}"),
            Self::Number(number) => write!(formatter, "{number}"),
            Self::Text(text) => formatter.write_str(text),
            Self::List(values) => {
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{value}")?;
                }
                Ok(())
            }
            Self::Other(value) => write!(formatter, "{value}"),
        }
    }
}

/// Projected columns of a product record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    /// Canonical SKU.
    #[serde(rename = "SKU", default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Overall pipeline status.
    #[serde(rename = "Product_Status", default, skip_serializing_if = "Option::is_none")]
    pub product_status: Option<FieldValue>,
    /// Image generation status.
    #[serde(rename = "AI_Status", default, skip_serializing_if = "Option::is_none")]
    pub ai_status: Option<FieldValue>,
    /// Manual review outcome for generated images.
    #[serde(rename = "AI_Quality_Check", default, skip_serializing_if = "Option::is_none")]
    pub ai_quality_check: Option<FieldValue>,
    /// Marketplace listing status.
    #[serde(rename = "Listing_Status", default, skip_serializing_if = "Option::is_none")]
    pub listing_status: Option<FieldValue>,
    /// Brand name.
    #[serde(rename = "Brand_TXT", default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<FieldValue>,
    /// Category.
    #[serde(rename = "Category", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<FieldValue>,
    /// Sub-category.
    #[serde(rename = "Sub-Category", default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<FieldValue>,
    /// Target gender.
    #[serde(rename = "gender", default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<FieldValue>,
    /// Size.
    #[serde(rename = "Size (INT)", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<FieldValue>,
    /// Colors.
    #[serde(rename = "Colors", default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<FieldValue>,
    /// Item condition.
    #[serde(rename = "Condizione", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<FieldValue>,
    /// Free-form product notes.
    #[serde(rename = "Note Prodotto", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<FieldValue>,
    /// Linked raw-data record ids.
    #[serde(
        rename = "RAW",
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub raw: Vec<String>,
    /// Folder id looked up from the linked raw-data record.
    #[serde(
        rename = "RAW_FolderID",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub raw_folder_id: Option<OneOrMany<String>>,
    /// Photo count reported by the raw-data record.
    #[serde(rename = "RAW_Photo_Count", default, skip_serializing_if = "Option::is_none")]
    pub raw_photo_count: Option<FieldValue>,
    /// Expected storage file id of the front photo.
    #[serde(
        rename = "rawID_FRONT",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub front_file_id: Option<OneOrMany<String>>,
    /// Expected storage file id of the back photo.
    #[serde(
        rename = "rawID_BACK",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub back_file_id: Option<OneOrMany<String>>,
    /// Generated front image link.
    #[serde(rename = "AI_Front_Image_Link", default, skip_serializing_if = "Option::is_none")]
    pub ai_front_image: Option<FieldValue>,
    /// Generated back image link.
    #[serde(rename = "AI_Back_Image_Link", default, skip_serializing_if = "Option::is_none")]
    pub ai_back_image: Option<FieldValue>,
}

/// A product row from the record store. Read-only to this workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Opaque record id.
    pub id: String,
    /// Projected columns.
    #[serde(default)]
    pub fields: ProductFields,
}

impl ProductRecord {
    /// Folder id recorded directly on the product, if populated.
    #[must_use]
    pub fn direct_folder_id(&self) -> Option<&str> {
        self.fields
            .raw_folder_id
            .as_ref()
            .and_then(OneOrMany::first_non_empty)
    }

    /// First linked raw-data record id.
    #[must_use]
    pub fn linked_record_id(&self) -> Option<&str> {
        self.fields
            .raw
            .first()
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Expected file id of the front photo.
    #[must_use]
    pub fn front_file_id(&self) -> Option<&str> {
        self.fields
            .front_file_id
            .as_ref()
            .and_then(OneOrMany::first_non_empty)
    }

    /// Expected file id of the back photo.
    #[must_use]
    pub fn back_file_id(&self) -> Option<&str> {
        self.fields
            .back_file_id
            .as_ref()
            .and_then(OneOrMany::first_non_empty)
    }

    /// Raw text of a status column.
    #[must_use]
    pub fn status(&self, field: StatusField) -> Option<&str> {
        let value = match field {
            StatusField::ProductStatus => self.fields.product_status.as_ref(),
            StatusField::AiStatus => self.fields.ai_status.as_ref(),
            StatusField::AiQualityCheck => self.fields.ai_quality_check.as_ref(),
            StatusField::ListingStatus => self.fields.listing_status.as_ref(),
        };
        value.and_then(FieldValue::as_text)
    }
}

/// Projected columns of a linked raw-data record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedFields {
    /// Storage folder id holding the source photos.
    #[serde(
        rename = "Folder_ID",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub folder_id: Option<OneOrMany<String>>,
    /// Storage folder link.
    #[serde(rename = "Folder_Link", default, skip_serializing_if = "Option::is_none")]
    pub folder_link: Option<FieldValue>,
    /// Number of photos in the folder.
    #[serde(rename = "Photo_Count", default, skip_serializing_if = "Option::is_none")]
    pub photo_count: Option<FieldValue>,
}

/// Secondary record consulted when a product has no direct folder id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedRecord {
    /// Opaque record id.
    pub id: String,
    /// Projected columns.
    #[serde(default)]
    pub fields: LinkedFields,
}

impl LinkedRecord {
    /// Folder id when populated, else the id parsed from the folder link.
    #[must_use]
    pub fn folder_id(&self) -> Option<String> {
        let direct = self
            .fields
            .folder_id
            .as_ref()
            .and_then(OneOrMany::first_non_empty);
        if let Some(id) = direct {
            return Some(id.to_string());
        }
        self.fields
            .folder_link
            .as_ref()
            .and_then(FieldValue::as_text)
            .and_then(extract_folder_id)
    }
}

/// Folder id resolved for one search; `None` when no strategy yielded one.
pub type FolderReference = Option<String>;

/// File listed from a storage folder. Snapshot only; never refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    /// Backend-assigned file id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Service-provided thumbnail link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_link: Option<String>,
}
