//! Owner records

use serde::{Deserialize, Serialize};

use super::{Record, is_blank};

/// A pet-shop customer, as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Server-assigned identifier
    pub id: i64,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Calendar date as sent by the server (not parsed)
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

impl Record for Owner {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Owner {
    /// Labelled detail rows shown when the owner card is expanded.
    ///
    /// Absent fields are skipped rather than rendered empty.
    pub fn detail_rows(&self) -> Vec<(&'static str, &str)> {
        [
            ("Address", &self.address),
            ("City", &self.city),
            ("State", &self.state),
            ("ZIP Code", &self.zip_code),
            ("Country", &self.country),
            ("Date of Birth", &self.date_of_birth),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (label, v))
        })
        .collect()
    }
}

/// Payload for `POST /owners`. The identifier is never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewOwner {
    pub name: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub date_of_birth: Option<String>,
}

impl NewOwner {
    /// Create a payload with only the required name set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
