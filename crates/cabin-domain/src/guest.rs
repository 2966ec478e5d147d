use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: GuestId,
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
}

impl Guest {
    pub fn new(id: GuestId, full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
            nationality: None,
            national_id: None,
        }
    }
}

impl Identifiable for Guest {
    fn id(&self) -> u64 {
        self.id
    }
}

impl NamedEntity for Guest {
    fn name(&self) -> &str {
        &self.full_name
    }
}
