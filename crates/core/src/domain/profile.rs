use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named weighting strategy determining how much each ratio contributes to
/// the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InvestorProfile {
    Value,
    Growth,
    Income,
}

/// Per-ratio weights. Each profile's weights sum to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct RatioWeights {
    pub peg_ratio: f64,
    pub price_to_book: f64,
    pub price_to_earnings: f64,
    pub return_on_equity: f64,
    pub dividend_yield: f64,
    pub dividend_payout_ratio: f64,
}

const VALUE_WEIGHTS: RatioWeights = RatioWeights {
    peg_ratio: 0.20,
    price_to_book: 0.25,
    price_to_earnings: 0.25,
    return_on_equity: 0.10,
    dividend_yield: 0.10,
    dividend_payout_ratio: 0.10,
};

const GROWTH_WEIGHTS: RatioWeights = RatioWeights {
    peg_ratio: 0.10,
    price_to_book: 0.10,
    price_to_earnings: 0.10,
    return_on_equity: 0.50,
    dividend_yield: 0.10,
    dividend_payout_ratio: 0.10,
};

const INCOME_WEIGHTS: RatioWeights = RatioWeights {
    peg_ratio: 0.10,
    price_to_book: 0.10,
    price_to_earnings: 0.10,
    return_on_equity: 0.10,
    dividend_yield: 0.40,
    dividend_payout_ratio: 0.20,
};

impl InvestorProfile {
    pub const ALL: [InvestorProfile; 3] = [
        InvestorProfile::Value,
        InvestorProfile::Growth,
        InvestorProfile::Income,
    ];

    pub fn weights(self) -> &'static RatioWeights {
        match self {
            InvestorProfile::Value => &VALUE_WEIGHTS,
            InvestorProfile::Growth => &GROWTH_WEIGHTS,
            InvestorProfile::Income => &INCOME_WEIGHTS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InvestorProfile::Value => "value",
            InvestorProfile::Growth => "growth",
            InvestorProfile::Income => "income",
        }
    }
}

impl fmt::Display for InvestorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized investor profile tag. Unknown tags are a contract violation
/// and must never fall back to a default profile.
#[derive(Debug, Clone)]
pub struct InvalidProfileError {
    pub tag: String,
}

impl fmt::Display for InvalidProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid investor profile {:?} (expected \"value\", \"growth\" or \"income\")",
            self.tag
        )
    }
}

impl std::error::Error for InvalidProfileError {}

impl FromStr for InvestorProfile {
    type Err = InvalidProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "value" => Ok(InvestorProfile::Value),
            "growth" => Ok(InvestorProfile::Growth),
            "income" => Ok(InvestorProfile::Income),
            _ => Err(InvalidProfileError { tag: s.to_string() }),
        }
    }
}

impl TryFrom<String> for InvestorProfile {
    type Error = InvalidProfileError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<InvestorProfile> for String {
    fn from(p: InvestorProfile) -> String {
        p.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one_for_every_profile() {
        for profile in InvestorProfile::ALL {
            let w = profile.weights();
            let sum = w.peg_ratio
                + w.price_to_book
                + w.price_to_earnings
                + w.return_on_equity
                + w.dividend_yield
                + w.dividend_payout_ratio;
            assert!(
                (sum - 1.0).abs() < 1e-9,
                "weights for {profile} sum to {sum}"
            );
        }
    }

    #[test]
    fn parses_known_tags_case_insensitively() {
        assert_eq!(
            "value".parse::<InvestorProfile>().unwrap(),
            InvestorProfile::Value
        );
        assert_eq!(
            "Growth".parse::<InvestorProfile>().unwrap(),
            InvestorProfile::Growth
        );
        assert_eq!(
            " INCOME ".parse::<InvestorProfile>().unwrap(),
            InvestorProfile::Income
        );
    }

    #[test]
    fn rejects_unknown_tags() {
        let err = "momentum".parse::<InvestorProfile>().unwrap_err();
        assert_eq!(err.tag, "momentum");
        assert!(err.to_string().contains("momentum"));
    }

    #[test]
    fn serde_uses_string_tags() {
        let json = serde_json::to_string(&InvestorProfile::Income).unwrap();
        assert_eq!(json, "\"income\"");
        let back: InvestorProfile = serde_json::from_str("\"value\"").unwrap();
        assert_eq!(back, InvestorProfile::Value);
        assert!(serde_json::from_str::<InvestorProfile>("\"hodl\"").is_err());
    }
}
