//! Tariff price labels.
//!
//! The schema stores prices as text matching `^(\d+ руб/мес|По запросу)$`.
//! [`Price`] is the typed form of that label: a monthly amount in roubles or
//! "price on request".

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MONTHLY_SUFFIX: &str = " руб/мес";
const ON_REQUEST: &str = "По запросу";

/// A tariff price.
///
/// Ordering puts monthly prices first in ascending amount and on-request
/// tariffs last, which is the order tariffs are presented in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Price {
    /// A fixed monthly price.
    Monthly { roubles: Roubles },
    /// Price negotiated individually.
    OnRequest,
}

impl Price {
    /// Build a fixed monthly price.
    pub fn monthly(roubles: u64) -> Self {
        Self::Monthly {
            roubles: Roubles(roubles.to_string()),
        }
    }

    /// Return the monthly amount when it is fixed and fits in a `u64`.
    pub fn monthly_roubles(&self) -> Option<u64> {
        match self {
            Self::Monthly { roubles } => roubles.to_u64(),
            Self::OnRequest => None,
        }
    }
}

/// A monthly amount in roubles, kept as the digits it was written with.
///
/// The column accepts any run of digits, so amounts are compared by numeric
/// value without a fixed-width integer. Leading zeros survive a round trip;
/// `0990` and `990` order by value and then by their spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Roubles(String);

impl Roubles {
    /// Digits exactly as stored.
    pub fn digits(&self) -> &str {
        &self.0
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    fn significant(&self) -> &str {
        self.0.trim_start_matches('0')
    }
}

impl Ord for Roubles {
    fn cmp(&self, other: &Self) -> Ordering {
        let (left, right) = (self.significant(), other.significant());
        left.len()
            .cmp(&right.len())
            .then_with(|| left.cmp(right))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Roubles {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Roubles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly { roubles } => write!(f, "{roubles}{MONTHLY_SUFFIX}"),
            Self::OnRequest => f.write_str(ON_REQUEST),
        }
    }
}

/// Parse error for [`Price`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePriceError {
    pub input: String,
}

impl fmt::Display for ParsePriceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid price '{}': expected '<digits>{MONTHLY_SUFFIX}' or '{ON_REQUEST}'",
            self.input
        )
    }
}

impl std::error::Error for ParsePriceError {}

impl FromStr for Price {
    type Err = ParsePriceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == ON_REQUEST {
            return Ok(Self::OnRequest);
        }

        let error = || ParsePriceError {
            input: value.to_owned(),
        };
        let digits = value.strip_suffix(MONTHLY_SUFFIX).ok_or_else(error)?;
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(error());
        }
        Ok(Self::Monthly {
            roubles: Roubles(digits.to_owned()),
        })
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("990 руб/мес", Price::monthly(990))]
    #[case("0 руб/мес", Price::monthly(0))]
    #[case("По запросу", Price::OnRequest)]
    fn accepts_permitted_forms(#[case] input: &str, #[case] expected: Price) {
        assert_eq!(input.parse::<Price>(), Ok(expected));
    }

    #[rstest]
    #[case("990")]
    #[case("990руб/мес")]
    #[case(" руб/мес")]
    #[case("9.90 руб/мес")]
    #[case("-5 руб/мес")]
    #[case("990 руб/мес ")]
    #[case("по запросу")]
    fn rejects_everything_else(#[case] input: &str) {
        let err = input.parse::<Price>().expect_err("price should be rejected");
        assert_eq!(err.input, input);
    }

    #[rstest]
    #[case("99999999999 руб/мес", None)]
    #[case("123456789012345678901234567890 руб/мес", None)]
    #[case("0990 руб/мес", Some(990))]
    #[case("18446744073709551615 руб/мес", Some(u64::MAX))]
    fn stored_amounts_of_any_width_round_trip(#[case] input: &str, #[case] fixed: Option<u64>) {
        let price: Price = input.parse().expect("digits are accepted");
        assert_eq!(price.to_string(), input);
        if let Some(expected) = fixed {
            assert_eq!(price.monthly_roubles(), Some(expected));
        }
    }

    #[rstest]
    fn leading_zeros_order_by_value() {
        let padded: Price = "0990 руб/мес".parse().expect("padded price");
        let mut prices = vec![
            Price::monthly(1000),
            padded.clone(),
            Price::monthly(990),
            Price::monthly(89),
        ];
        prices.sort();
        assert_eq!(
            prices,
            vec![Price::monthly(89), padded, Price::monthly(990), Price::monthly(1000)]
        );
    }

    #[rstest]
    fn display_matches_schema_pattern() {
        assert_eq!(Price::monthly(4900).to_string(), "4900 руб/мес");
        assert_eq!(Price::OnRequest.to_string(), "По запросу");
    }

    #[rstest]
    fn on_request_sorts_after_every_monthly_price() {
        let mut prices = vec![
            Price::OnRequest,
            Price::monthly(4900),
            Price::monthly(990),
            "99999999999 руб/мес".parse().expect("wide price"),
        ];
        prices.sort();

        assert_eq!(
            prices,
            vec![
                Price::monthly(990),
                Price::monthly(4900),
                "99999999999 руб/мес".parse().expect("wide price"),
                Price::OnRequest,
            ]
        );
    }
}
