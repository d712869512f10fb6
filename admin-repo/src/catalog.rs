//! Catalog entities backing the `images`, `collections` and `collection_images`
//! tables. Nothing reads or writes them yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

pub type ImageId = i64;
pub type CollectionId = i64;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown {kind} value: {value}")]
pub struct ParseCatalogEnumError {
    kind: &'static str,
    value: String,
}

macro_rules! catalog_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseCatalogEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ParseCatalogEnumError {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

catalog_enum!(ImageFormat, "image format", { Jpeg => "jpeg", Jpg => "jpg", Png => "png" });
catalog_enum!(ImageStatus, "image status", { Active => "active", Deleted => "deleted" });
catalog_enum!(CollectionStatus, "collection status", {
    Published => "published",
    Draft => "draft",
    Deleted => "deleted",
});

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Image {
    pub id: ImageId,
    pub url: String,
    pub alt: String,
    pub width: i32,
    pub height: i32,
    pub format: ImageFormat,
    pub status: ImageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Collection {
    pub id: CollectionId,
    pub title: String,
    pub description: String,
    pub thumbnail_id: ImageId,
    /// Populated only when the thumbnail row was loaded alongside the collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Image>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub status: CollectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
