//! Discount entity and effective-discount resolution.

use serde::{Deserialize, Serialize};

/// How a discount amount is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Flat,
}

impl std::str::FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "flat" => Ok(DiscountType::Flat),
            other => Err(format!("unknown discount type '{other}'")),
        }
    }
}

/// A discount offered to customers referred by a partner.
///
/// `max_duration` is the number of months the discount applies for;
/// `None` means it never runs out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub id: String,
    pub amount: i32,
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    pub max_duration: Option<i32>,
}

/// Picks the discount that applies to a partner's link.
///
/// The partner's enrollment-level discount wins over the program default.
/// A zero-amount discount is not surfaced.
pub fn resolve_effective_discount(
    partner_discount: Option<Discount>,
    program_default: Option<Discount>,
) -> Option<Discount> {
    partner_discount
        .or(program_default)
        .filter(|discount| discount.amount != 0)
}
