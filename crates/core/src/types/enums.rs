//! Closed vocabularies shared by the API and the forms.
//!
//! Every enum serializes to the exact lowercase string the API uses and
//! parses back from it via `FromStr`, so the CLI can accept the same values.

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of an enum's wire values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value} (expected one of: {expected})")]
pub struct UnknownVariant {
    /// Name of the vocabulary, e.g. "mood".
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
    /// Accepted values, space separated.
    pub expected: &'static str,
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The value sent over the wire.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_owned(),
                        expected: concat!($($wire, " "),+),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Interface language of an account.
    #[derive(Default)]
    Language, "language" {
        #[default]
        Es => "es",
        En => "en",
    }
}

wire_enum! {
    /// Account role; gates admin-only views.
    #[derive(Default)]
    Role, "role" {
        #[default]
        User => "user",
        Admin => "admin",
    }
}

wire_enum! {
    /// Whether money came in or went out. Categories carry the same type.
    TransactionType, "transaction type" {
        Expense => "expense",
        Income => "income",
    }
}

wire_enum! {
    /// Psychological driver behind a transaction.
    EmotionTag, "emotion tag" {
        Need => "need",
        Impulse => "impulse",
        Emotional => "emotional",
    }
}

wire_enum! {
    /// Mood recorded in a daily snapshot.
    Mood, "mood" {
        Calm => "calm",
        Stressed => "stressed",
        Confident => "confident",
        Neutral => "neutral",
    }
}

wire_enum! {
    /// How often a habit is meant to be performed.
    HabitFrequency, "habit frequency" {
        Daily => "daily",
        Weekly => "weekly",
    }
}

wire_enum! {
    /// Risk profile of an investment plan.
    InvestmentStrategy, "investment strategy" {
        Conservative => "conservative",
        Balanced => "balanced",
        LongTerm => "long_term",
    }
}

impl Mood {
    /// Human label with the emoji the web client showed.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Calm => "😌 Calm",
            Self::Stressed => "😰 Stressed",
            Self::Confident => "💪 Confident",
            Self::Neutral => "😐 Neutral",
        }
    }
}

impl TransactionType {
    /// Sign shown in front of an amount of this type.
    #[must_use]
    pub const fn sign(&self) -> char {
        match self {
            Self::Income => '+',
            Self::Expense => '-',
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values_roundtrip_through_serde() {
        for strategy in InvestmentStrategy::ALL {
            let json = serde_json::to_string(strategy).unwrap();
            assert_eq!(json, format!("\"{}\"", strategy.as_str()));
        }
        let parsed: InvestmentStrategy = serde_json::from_str("\"long_term\"").unwrap();
        assert_eq!(parsed, InvestmentStrategy::LongTerm);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("impulse".parse::<EmotionTag>().unwrap(), EmotionTag::Impulse);
        assert_eq!(" admin ".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "ecstatic".parse::<Mood>().unwrap_err();
        assert_eq!(err.kind, "mood");
        assert!(err.to_string().contains("calm"));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Role::default(), Role::User);
        assert_eq!(Language::default(), Language::Es);
    }
}
