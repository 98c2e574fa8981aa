//! Gift Types - Pure type definitions shared by the gift crates
//!
//! This crate contains only plain data types with no async runtime or storage
//! dependencies.

pub mod gift;
pub mod user_gift;

pub use gift::*;
pub use user_gift::*;

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier could not be parsed from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid identifier: {0:?}")]
pub struct InvalidId(pub String);

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }

            /// Rowids start at 1
            pub fn is_valid(self) -> bool {
                self.0 > 0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let id = Self(i64::deserialize(deserializer)?);
                if !id.is_valid() {
                    return Err(de::Error::custom(InvalidId(id.to_string())));
                }
                Ok(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            /// Only positive decimal integers are accepted
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().parse::<i64>().map(Self) {
                    Ok(id) if id.is_valid() => Ok(id),
                    _ => Err(InvalidId(s.to_string())),
                }
            }
        }
    };
}

row_id!(
    /// Catalog gift id (`gift.id`)
    GiftId
);
row_id!(
    /// Id of one given gift (`user_gift.id`)
    UserGiftId
);
row_id!(
    /// Host user id
    UserId
);

/// Read state of a received gift.
///
/// Stored as an integer column: unread is `1`, read is `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiftStatus {
    Unread,
    Read,
}

impl GiftStatus {
    pub fn as_db(self) -> i64 {
        match self {
            GiftStatus::Unread => 1,
            GiftStatus::Read => 0,
        }
    }

    pub fn from_db(value: i64) -> Self {
        if value == 0 {
            GiftStatus::Read
        } else {
            GiftStatus::Unread
        }
    }

    pub fn is_unread(self) -> bool {
        matches!(self, GiftStatus::Unread)
    }
}

impl fmt::Display for GiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GiftStatus::Unread => write!(f, "unread"),
            GiftStatus::Read => write!(f, "read"),
        }
    }
}

/// Page selection for listings.
///
/// `limit == 0` lists everything. Pages are 1-based; page `0` is treated
/// like page `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub page: u32,
}

impl Page {
    pub fn new(limit: u32, page: u32) -> Self {
        Self { limit, page }
    }

    pub fn unlimited() -> Self {
        Self::default()
    }

    /// `LIMIT` value, `None` when unlimited
    pub fn limit(&self) -> Option<i64> {
        (self.limit > 0).then_some(i64::from(self.limit))
    }

    pub fn offset(&self) -> i64 {
        if self.limit == 0 || self.page == 0 {
            return 0;
        }
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids_only() {
        assert_eq!("42".parse::<UserGiftId>(), Ok(UserGiftId(42)));
        assert_eq!(" 7 ".parse::<GiftId>(), Ok(GiftId(7)));
        assert!("abc".parse::<UserGiftId>().is_err());
        assert!("0".parse::<UserGiftId>().is_err());
        assert!("-3".parse::<UserId>().is_err());
        assert!("".parse::<UserId>().is_err());
        assert!("1; DROP TABLE user_gift".parse::<UserGiftId>().is_err());
    }

    #[test]
    fn status_db_encoding() {
        assert_eq!(GiftStatus::Unread.as_db(), 1);
        assert_eq!(GiftStatus::Read.as_db(), 0);
        assert_eq!(GiftStatus::from_db(0), GiftStatus::Read);
        assert_eq!(GiftStatus::from_db(1), GiftStatus::Unread);
    }

    #[test]
    fn page_offsets() {
        assert_eq!(Page::unlimited().limit(), None);
        assert_eq!(Page::unlimited().offset(), 0);
        assert_eq!(Page::new(10, 0).offset(), 0);
        assert_eq!(Page::new(10, 1).offset(), 0);
        assert_eq!(Page::new(10, 3).offset(), 20);
        assert_eq!(Page::new(50, 2).limit(), Some(50));
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&GiftId(5)).unwrap();
        assert_eq!(json, "5");
        assert_eq!(serde_json::from_str::<GiftId>("5").unwrap(), GiftId(5));
    }

    #[test]
    fn json_ids_must_be_positive() {
        assert!(serde_json::from_str::<UserId>("0").is_err());
        assert!(serde_json::from_str::<UserId>("-5").is_err());
        assert!(serde_json::from_str::<UserGiftId>("\"7\"").is_err());

        let err = serde_json::from_str::<UserRef>(r#"{"id":-5,"name":"ghost"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid identifier"));
    }
}
