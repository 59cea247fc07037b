//! Support question tags.
//!
//! General support questions carry between one and three topic tags, exactly
//! one difficulty and between one and three component tags. Authors supply a
//! flat list; [`SupportTags::classify`] sorts it into the three groups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::enums::{ComponentTag, DifficultyTag, TopicTag};

/// Errors raised when building a [`TagSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSetError {
    Empty,
    TooMany { count: usize },
    Duplicate { tag: String },
}

impl fmt::Display for TagSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "at least one tag is required"),
            Self::TooMany { count } => {
                write!(f, "at most {} tags are allowed, got {count}", TAG_SET_MAX)
            }
            Self::Duplicate { tag } => write!(f, "tag '{tag}' is listed more than once"),
        }
    }
}

impl std::error::Error for TagSetError {}

const TAG_SET_MAX: usize = 3;

/// One to three tags, in author order.
///
/// Sets built with [`TagSet::new`] hold distinct tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<T>", into = "Vec<T>")]
#[serde(bound(
    serialize = "T: Clone + Serialize",
    deserialize = "T: Deserialize<'de> + PartialEq + fmt::Display"
))]
pub struct TagSet<T>(Vec<T>);

impl<T> TagSet<T>
where
    T: PartialEq + fmt::Display,
{
    /// Maximum number of tags in a set.
    pub const MAX: usize = TAG_SET_MAX;

    pub fn new(tags: Vec<T>) -> Result<Self, TagSetError> {
        let tags = Self::from_stored(tags)?.0;
        for (index, tag) in tags.iter().enumerate() {
            if tags.iter().skip(index + 1).any(|other| other == tag) {
                return Err(TagSetError::Duplicate {
                    tag: tag.to_string(),
                });
            }
        }
        Ok(Self(tags))
    }

    /// Accept tags read back from the database.
    ///
    /// Checks the length bound only; repeated tags are kept as stored.
    pub fn from_stored(tags: Vec<T>) -> Result<Self, TagSetError> {
        if tags.is_empty() {
            return Err(TagSetError::Empty);
        }
        if tags.len() > Self::MAX {
            return Err(TagSetError::TooMany { count: tags.len() });
        }
        Ok(Self(tags))
    }
}

impl<T> TagSet<T> {
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the set holds no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> TryFrom<Vec<T>> for TagSet<T>
where
    T: PartialEq + fmt::Display,
{
    type Error = TagSetError;

    fn try_from(value: Vec<T>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> From<TagSet<T>> for Vec<T> {
    fn from(value: TagSet<T>) -> Self {
        value.0
    }
}

impl<'a, T> IntoIterator for &'a TagSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Errors raised while classifying a flat tag list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportTagError {
    /// The tag belongs to none of the three vocabularies.
    UnknownTag { tag: String },
    /// More than one difficulty was supplied.
    ConflictingDifficulty {
        first: DifficultyTag,
        second: DifficultyTag,
    },
    Topics(TagSetError),
    Components(TagSetError),
}

impl fmt::Display for SupportTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTag { tag } => write!(f, "unknown support tag '{tag}'"),
            Self::ConflictingDifficulty { first, second } => {
                write!(f, "conflicting difficulty tags '{first}' and '{second}'")
            }
            Self::Topics(err) => write!(f, "topic tags: {err}"),
            Self::Components(err) => write!(f, "component tags: {err}"),
        }
    }
}

impl std::error::Error for SupportTagError {}

/// Classified tags of a general support question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTags {
    pub topics: TagSet<TopicTag>,
    pub difficulty: DifficultyTag,
    pub components: TagSet<ComponentTag>,
}

impl SupportTags {
    /// Split a flat tag list into topic, difficulty and component groups.
    ///
    /// The three vocabularies are disjoint, so each tag lands in exactly one
    /// group. Difficulty defaults to [`DifficultyTag::Basic`] when absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use salesdesk::domain::{ComponentTag, DifficultyTag, SupportTags, TopicTag};
    ///
    /// let tags = SupportTags::classify(["installation", "ui"]).expect("valid tags");
    /// assert_eq!(tags.topics.as_slice(), &[TopicTag::Installation]);
    /// assert_eq!(tags.difficulty, DifficultyTag::Basic);
    /// assert_eq!(tags.components.as_slice(), &[ComponentTag::Ui]);
    /// ```
    pub fn classify<I, S>(tags: I) -> Result<Self, SupportTagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut topics = Vec::new();
        let mut components = Vec::new();
        let mut difficulty: Option<DifficultyTag> = None;

        for raw in tags {
            let tag = raw.as_ref();
            if let Ok(topic) = TopicTag::from_str(tag) {
                topics.push(topic);
            } else if let Ok(component) = ComponentTag::from_str(tag) {
                components.push(component);
            } else if let Ok(level) = DifficultyTag::from_str(tag) {
                match difficulty {
                    Some(first) if first != level => {
                        return Err(SupportTagError::ConflictingDifficulty {
                            first,
                            second: level,
                        });
                    }
                    _ => difficulty = Some(level),
                }
            } else {
                return Err(SupportTagError::UnknownTag {
                    tag: tag.to_owned(),
                });
            }
        }

        Ok(Self {
            topics: TagSet::new(topics).map_err(SupportTagError::Topics)?,
            difficulty: difficulty.unwrap_or_default(),
            components: TagSet::new(components).map_err(SupportTagError::Components)?,
        })
    }

    /// Flatten back into labels: topics, then difficulty, then components.
    pub fn labels(&self) -> Vec<&'static str> {
        self.topics
            .iter()
            .map(TopicTag::as_str)
            .chain(std::iter::once(self.difficulty.as_str()))
            .chain(self.components.iter().map(ComponentTag::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn classify_sorts_tags_into_groups() {
        let tags = SupportTags::classify(["error", "advanced", "api", "security"])
            .expect("valid tags");

        assert_eq!(tags.topics.as_slice(), &[TopicTag::Error]);
        assert_eq!(tags.difficulty, DifficultyTag::Advanced);
        assert_eq!(
            tags.components.as_slice(),
            &[ComponentTag::Api, ComponentTag::Security]
        );
    }

    #[rstest]
    fn repeated_identical_difficulty_is_accepted() {
        let tags = SupportTags::classify(["usage", "intermediate", "intermediate", "ui"])
            .expect("same difficulty twice is harmless");
        assert_eq!(tags.difficulty, DifficultyTag::Intermediate);
    }

    #[rstest]
    #[case(&["installation", "ui", "wizardry"], SupportTagError::UnknownTag { tag: "wizardry".to_owned() })]
    #[case(&["ui"], SupportTagError::Topics(TagSetError::Empty))]
    #[case(&["billing"], SupportTagError::Components(TagSetError::Empty))]
    #[case(
        &["usage", "error", "billing", "installation", "ui"],
        SupportTagError::Topics(TagSetError::TooMany { count: 4 })
    )]
    #[case(
        &["usage", "ui", "ui"],
        SupportTagError::Components(TagSetError::Duplicate { tag: "ui".to_owned() })
    )]
    #[case(
        &["usage", "basic", "advanced", "ui"],
        SupportTagError::ConflictingDifficulty {
            first: DifficultyTag::Basic,
            second: DifficultyTag::Advanced,
        }
    )]
    fn classify_rejects_invalid_lists(#[case] tags: &[&str], #[case] expected: SupportTagError) {
        assert_eq!(SupportTags::classify(tags), Err(expected));
    }

    #[rstest]
    fn labels_flatten_in_group_order() {
        let tags = SupportTags::classify(["ui", "configuration"]).expect("valid tags");
        assert_eq!(tags.labels(), vec!["configuration", "basic", "ui"]);
    }

    #[rstest]
    fn stored_tags_keep_repeats_but_not_bad_lengths() {
        let stored = TagSet::from_stored(vec![TopicTag::Error, TopicTag::Error])
            .expect("repeats are kept");
        assert_eq!(stored.as_slice(), &[TopicTag::Error, TopicTag::Error]);
        assert!(!stored.is_empty());
        assert_eq!(
            TagSet::<TopicTag>::from_stored(Vec::new()),
            Err(TagSetError::Empty)
        );
        assert_eq!(
            TagSet::from_stored(vec![ComponentTag::Ui; 4]),
            Err(TagSetError::TooMany { count: 4 })
        );
        assert_eq!(
            TagSet::new(vec![TopicTag::Error, TopicTag::Error]),
            Err(TagSetError::Duplicate { tag: "error".to_owned() })
        );
    }

    #[rstest]
    fn tag_set_deserialisation_enforces_cardinality() {
        let set: TagSet<TopicTag> =
            serde_json::from_str(r#"["usage", "billing"]"#).expect("two tags");
        assert_eq!(set.len(), 2);
        assert!(serde_json::from_str::<TagSet<TopicTag>>("[]").is_err());
    }
}
