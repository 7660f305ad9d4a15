//! Billing interval definitions.

use serde::{Deserialize, Serialize};

/// Cadence at which the provider collects payment for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    /// Billed every month.
    Monthly,

    /// Billed every year.
    Yearly,
}

impl BillingInterval {
    /// Returns the display name for this interval.
    pub fn display_name(&self) -> &'static str {
        match self {
            BillingInterval::Monthly => "Monthly",
            BillingInterval::Yearly => "Yearly",
        }
    }
}

impl std::fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_are_correct() {
        assert_eq!(BillingInterval::Monthly.display_name(), "Monthly");
        assert_eq!(BillingInterval::Yearly.display_name(), "Yearly");
    }

    #[test]
    fn interval_serializes_lowercase() {
        let json = serde_json::to_string(&BillingInterval::Yearly).unwrap();
        assert_eq!(json, "\"yearly\"");
    }

    #[test]
    fn interval_deserializes_from_lowercase() {
        let interval: BillingInterval = serde_json::from_str("\"monthly\"").unwrap();
        assert_eq!(interval, BillingInterval::Monthly);
    }
}
