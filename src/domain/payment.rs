//! Purchase payment modes.

use serde::{Deserialize, Serialize};

/// How a purchase is paid for.
///
/// The mode is always stated explicitly by the buyer rather than inferred
/// from whether a value accompanies the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payment {
    /// Native value attached to the call; must equal the purchase cost.
    Value(u128),
    /// Cost is debited from the buyer's allowance; no value is attached.
    Allowance,
}

impl Payment {
    /// Returns the mode discriminator without the attached amount.
    #[must_use]
    pub const fn mode(&self) -> PaymentMode {
        match self {
            Self::Value(_) => PaymentMode::Value,
            Self::Allowance => PaymentMode::Allowance,
        }
    }
}

/// Payment mode discriminator as carried in events and API payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Paid with attached native value.
    Value,
    /// Paid from accumulated allowance.
    Allowance,
}
