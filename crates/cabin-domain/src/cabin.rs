use serde::{Deserialize, Serialize};

use crate::common::*;

/// A rentable cabin with its nightly pricing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cabin {
    pub id: CabinId,
    pub name: String,
    #[serde(default)]
    pub max_capacity: u32,
    pub regular_price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Cabin {
    pub fn new(
        id: CabinId,
        name: impl Into<String>,
        max_capacity: u32,
        regular_price: f64,
        discount: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            max_capacity,
            regular_price,
            discount,
            description: None,
        }
    }

    /// Nightly rate after discount.
    pub fn effective_rate(&self) -> f64 {
        self.regular_price - self.discount
    }

    pub fn has_valid_rate(&self) -> bool {
        self.regular_price >= 0.0 && self.discount >= 0.0 && self.effective_rate() >= 0.0
    }
}

impl Identifiable for Cabin {
    fn id(&self) -> u64 {
        self.id
    }
}

impl NamedEntity for Cabin {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Cabin {
    fn display_label(&self) -> String {
        format!("cabin {} ({})", self.name, self.id)
    }
}
