//! Canonical three-way sentiment label

use serde::{Deserialize, Serialize};

/// Sentiment polarity shared by the gold standard and every backend.
///
/// Backends with richer outputs (scores, probabilities, multi-class) map
/// down to this domain before handing a result to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Negative,
    Neutral,
}

impl Label {
    pub fn all() -> Vec<Label> {
        vec![Label::Positive, Label::Negative, Label::Neutral]
    }

    /// Short corpus/report spelling (`+`, `-`, `0`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "+",
            Label::Negative => "-",
            Label::Neutral => "0",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Label::Positive => "positive",
            Label::Negative => "negative",
            Label::Neutral => "neutral",
        }
    }

    pub fn is_polar(&self) -> bool {
        !matches!(self, Label::Neutral)
    }

    /// Worst-case penalty for missing a document with this gold label:
    /// 1 for neutral, 2 for a polar label.
    pub fn max_error_weight(&self) -> u32 {
        if self.is_polar() {
            2
        } else {
            1
        }
    }

    /// Map a polarity word (`positive`, `negative`, anything else) to a label.
    ///
    /// Several services answer with a free-form class name; unknown classes
    /// are treated as neutral.
    pub fn from_polarity_word(word: &str) -> Label {
        match word.trim().to_lowercase().as_str() {
            "positive" => Label::Positive,
            "negative" => Label::Negative,
            _ => Label::Neutral,
        }
    }

    /// Map a signed score to a label using a symmetric neutral band.
    ///
    /// Scores strictly inside `(-band, band)` are neutral.
    pub fn from_score(score: f64, band: f64) -> Label {
        if score > -band && score < band {
            Label::Neutral
        } else if score > band {
            Label::Positive
        } else if score < -band {
            Label::Negative
        } else {
            // exactly on the band edge
            Label::Neutral
        }
    }
}

impl std::str::FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "+" | "positive" | "pos" => Ok(Label::Positive),
            "-" | "negative" | "neg" => Ok(Label::Negative),
            "0" | "neutral" | "neu" => Ok(Label::Neutral),
            _ => Err(format!("Unknown sentiment label: {}", s)),
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_and_long_forms() {
        assert_eq!("+".parse::<Label>().unwrap(), Label::Positive);
        assert_eq!("-".parse::<Label>().unwrap(), Label::Negative);
        assert_eq!("0".parse::<Label>().unwrap(), Label::Neutral);
        assert_eq!("Positive".parse::<Label>().unwrap(), Label::Positive);
        assert_eq!(" neutral ".parse::<Label>().unwrap(), Label::Neutral);
        assert!("X".parse::<Label>().is_err());
    }

    #[test]
    fn test_max_error_weight() {
        assert_eq!(Label::Neutral.max_error_weight(), 1);
        assert_eq!(Label::Positive.max_error_weight(), 2);
        assert_eq!(Label::Negative.max_error_weight(), 2);
    }

    #[test]
    fn test_from_score_band() {
        assert_eq!(Label::from_score(0.0, 0.2), Label::Neutral);
        assert_eq!(Label::from_score(0.19, 0.2), Label::Neutral);
        assert_eq!(Label::from_score(0.5, 0.2), Label::Positive);
        assert_eq!(Label::from_score(-0.5, 0.2), Label::Negative);
        assert_eq!(Label::from_score(0.2, 0.2), Label::Neutral);
        assert_eq!(Label::from_score(-0.2, 0.2), Label::Neutral);
        assert_eq!(Label::from_score(-1.5, 0.4), Label::Negative);
    }

    #[test]
    fn test_from_polarity_word() {
        assert_eq!(Label::from_polarity_word("positive"), Label::Positive);
        assert_eq!(Label::from_polarity_word("Negative"), Label::Negative);
        assert_eq!(Label::from_polarity_word("mixed"), Label::Neutral);
    }
}
