//! Closed vocabularies stored as database labels.
//!
//! Each enum mirrors either a PostgreSQL `ENUM` type or a `CHECK (... IN
//! (...))` list, so the label returned by `as_str` is exactly the value the
//! schema accepts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! closed_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident ($label:literal) {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Return the label stored in the database.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        ::paste::paste! {
            #[doc = "Parse error for [`" $name "`]."]
            #[derive(Debug, Clone, PartialEq, Eq)]
            pub struct [<Parse $name Error>] {
                pub input: String,
            }

            impl fmt::Display for [<Parse $name Error>] {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "invalid {}: {}", $label, self.input)
                }
            }

            impl std::error::Error for [<Parse $name Error>] {}

            impl FromStr for $name {
                type Err = [<Parse $name Error>];

                fn from_str(value: &str) -> Result<Self, Self::Err> {
                    match value {
                        $($text => Ok(Self::$variant),)+
                        _ => Err([<Parse $name Error>] {
                            input: value.to_owned(),
                        }),
                    }
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use closed_enum;

closed_enum! {
    /// Subject of a general support question (`topic_tag`).
    pub enum TopicTag ("topic tag") {
        Installation => "installation",
        Configuration => "configuration",
        Usage => "usage",
        Error => "error",
        Billing => "billing",
    }
}

closed_enum! {
    /// How demanding a support answer is (`difficulty_tag`).
    pub enum DifficultyTag ("difficulty tag") {
        Basic => "basic",
        Intermediate => "intermediate",
        Advanced => "advanced",
    }
}

impl Default for DifficultyTag {
    fn default() -> Self {
        Self::Basic
    }
}

closed_enum! {
    /// Product component a support question concerns (`component_tag`).
    pub enum ComponentTag ("component tag") {
        Ui => "ui",
        Api => "api",
        Database => "database",
        Security => "security",
        Integration => "integration",
    }
}

closed_enum! {
    /// Category of a tariff feature.
    pub enum FeatureCategory ("feature category") {
        Security => "Security",
        Analytics => "Analytics",
        Integration => "Integration",
        Automation => "Automation",
        Ui => "UI",
    }
}

closed_enum! {
    /// Name of a support knowledge-base category.
    pub enum SupportCategoryName ("support category") {
        GettingStarted => "Getting Started",
        Security => "Security",
        Billing => "Billing",
        TechnicalIssues => "Technical Issues",
        Integration => "Integration",
    }
}

closed_enum! {
    /// Kind of link between two support questions.
    pub enum RelationType ("relation type") {
        Related => "related",
        /// The source must be understood before the target.
        Prerequisite => "prerequisite",
        /// The target is a natural next question after the source.
        Followup => "followup",
    }
}

closed_enum! {
    /// Table a support question lives in.
    pub enum QuestionKind ("question kind") {
        /// `support_general`.
        General => "general",
        /// `support_tariff_specific`.
        Tariff => "tariff",
    }
}

closed_enum! {
    /// Author of a chat message.
    pub enum MessageRole ("message role") {
        User => "user",
        Assistant => "assistant",
    }
}
