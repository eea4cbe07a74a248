//! Paradise PIX gateway integration: payload construction, the HTTP
//! client, response-shape normalization and the amount-keyed offer cache.

mod cache;
mod client;
mod normalize;
mod payload;

pub use cache::*;
pub use client::*;
pub use normalize::*;
pub use payload::*;

use serde::Serialize;

/// Result of trying to obtain a gateway offer for an amount.
///
/// Offer creation failing is not a checkout failure: the transaction can
/// be created from the amount and cart instead. Modeling the fallback as
/// data keeps the branch out of error-handling control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferOutcome {
    Obtained(String),
    Unavailable,
}

impl OfferOutcome {
    pub fn hash(&self) -> Option<&str> {
        match self {
            OfferOutcome::Obtained(hash) => Some(hash),
            OfferOutcome::Unavailable => None,
        }
    }
}

/// Payment status as reported by the gateway. Upstream has grown states
/// over time, so unrecognized values are carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PaymentStatus {
    Pending,
    Processing,
    Paid,
    Refused,
    Refunded,
    Chargedback,
    Canceled,
    #[strum(default)]
    Other(String),
}

impl PaymentStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl Serialize for PaymentStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_and_defaults() {
        assert_eq!(PaymentStatus::from_str("paid").unwrap(), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from_str("PAID").unwrap(), PaymentStatus::Paid);
        assert_eq!(
            PaymentStatus::from_str("waiting_payment").unwrap(),
            PaymentStatus::Other("waiting_payment".into())
        );
        assert_eq!(PaymentStatus::Paid.to_string(), "paid");
        assert!(PaymentStatus::Paid.is_paid());
        assert!(!PaymentStatus::Pending.is_paid());
    }
}
