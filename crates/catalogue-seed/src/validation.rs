//! Consistency checks applied to a freshly parsed knowledge pack.

use std::collections::HashSet;

use crate::document::{QuestionPointer, RawKnowledgePack, SupportCategorySeed, TariffSeed};
use crate::error::PackError;

/// Knowledge-pack version understood by this crate.
pub const SUPPORTED_VERSION: u32 = 1;

pub(crate) fn validate_pack(raw: &RawKnowledgePack) -> Result<(), PackError> {
    if raw.version != SUPPORTED_VERSION {
        return Err(PackError::UnsupportedVersion {
            expected: SUPPORTED_VERSION,
            actual: raw.version,
        });
    }

    if raw.features.is_empty() && raw.tariffs.is_empty() && raw.support.is_empty() {
        return Err(PackError::EmptyPack);
    }

    let mut feature_names = HashSet::new();
    for feature in &raw.features {
        if !feature_names.insert(feature.name.as_str()) {
            return Err(PackError::DuplicateFeature {
                name: feature.name.clone(),
            });
        }
    }

    let mut tariff_names = HashSet::new();
    let mut tariff_questions = HashSet::new();
    for tariff in &raw.tariffs {
        if !tariff_names.insert(tariff.name.as_str()) {
            return Err(PackError::DuplicateTariff {
                name: tariff.name.clone(),
            });
        }
        check_tariff(tariff, &feature_names, &mut tariff_questions)?;
    }

    let mut category_names = HashSet::new();
    let mut general_questions = HashSet::new();
    for category in &raw.support {
        if !category_names.insert(category.name.as_str()) {
            return Err(PackError::DuplicateCategory {
                name: category.name.clone(),
            });
        }
        if category.questions.is_empty() {
            return Err(PackError::EmptyCategory {
                name: category.name.clone(),
            });
        }
        for question in &category.questions {
            if !general_questions.insert(question.question.as_str()) {
                return Err(PackError::DuplicateQuestion {
                    question: question.question.clone(),
                });
            }
        }
    }

    // Relations may point at questions from any category, so resolve them
    // only once every question is known.
    for category in &raw.support {
        check_relations(category, &general_questions, &tariff_questions)?;
    }

    Ok(())
}

fn check_tariff<'a>(
    tariff: &'a TariffSeed,
    feature_names: &HashSet<&str>,
    tariff_questions: &mut HashSet<(&'a str, &'a str)>,
) -> Result<(), PackError> {
    let referenced = tariff
        .features
        .iter()
        .map(|reference| reference.name.as_str())
        .chain(
            tariff
                .questions
                .iter()
                .filter_map(|question| question.feature.as_deref()),
        );
    for feature in referenced {
        if !feature_names.contains(feature) {
            return Err(PackError::UnknownFeature {
                tariff: tariff.name.clone(),
                feature: feature.to_owned(),
            });
        }
    }

    for question in &tariff.questions {
        if !tariff_questions.insert((tariff.name.as_str(), question.question.as_str())) {
            return Err(PackError::DuplicateTariffQuestion {
                tariff: tariff.name.clone(),
                question: question.question.clone(),
            });
        }
    }

    Ok(())
}

fn check_relations(
    category: &SupportCategorySeed,
    general_questions: &HashSet<&str>,
    tariff_questions: &HashSet<(&str, &str)>,
) -> Result<(), PackError> {
    for relation in &category.relations {
        for pointer in [&relation.source, &relation.target] {
            let resolved = match pointer {
                QuestionPointer::General { question } => {
                    general_questions.contains(question.as_str())
                }
                QuestionPointer::Tariff { tariff, question } => {
                    tariff_questions.contains(&(tariff.as_str(), question.as_str()))
                }
            };
            if !resolved {
                return Err(PackError::UnresolvedRelation {
                    category: category.name.clone(),
                    question: pointer.question().to_owned(),
                });
            }
        }
    }
    Ok(())
}
