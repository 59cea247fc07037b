//! Knowledge-pack seeding orchestration.
//!
//! Converts a validated [`catalogue_seed::KnowledgePack`] into domain drafts,
//! then persists features, tariffs and support content through the catalogue
//! and support ports. Features are written first because tariffs reference
//! them by id; tariff feature names resolve to ids only after that write.

use std::collections::HashMap;
use std::sync::Arc;

use catalogue_seed::{
    FeatureSeed, GeneralQuestionSeed, KnowledgePack, QuestionPointer, RelationSeed,
    SupportCategorySeed, TariffQuestionSeed, TariffSeed,
};
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{
    CatalogueRepository, CatalogueRepositoryError, SupportRepository, SupportRepositoryError,
};
use crate::domain::{
    BoundedValueError, FeatureCategory, FeatureDraft, FeatureId, GeneralQuestionDraft,
    ParseFeatureCategoryError, ParsePriceError, ParseRelationTypeError,
    ParseSupportCategoryNameError, Priority, QuestionKey, QuestionRelationDraft, RelationType,
    SupportBundle, SupportCategoryDraft, SupportCategoryName, SupportSaveSummary, SupportTagError,
    SupportTags, TariffBundle, TariffDraft, TariffFeatureRef, TariffQuestionDraft, UseCase,
    UserLimit,
};

/// Row counts written by a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgePackSeedOutcome {
    pub features: usize,
    pub tariffs: usize,
    pub support: SupportSaveSummary,
}

/// Errors raised while converting or persisting a knowledge pack.
#[derive(Debug, Error)]
pub enum KnowledgePackSeedingError {
    #[error("feature '{feature}' has an invalid category: {source}")]
    FeatureCategory {
        feature: String,
        source: ParseFeatureCategoryError,
    },
    #[error("tariff '{tariff}' has an invalid price: {source}")]
    Price {
        tariff: String,
        source: ParsePriceError,
    },
    #[error("tariff '{tariff}' has an invalid user limit: {source}")]
    UserLimit {
        tariff: String,
        source: BoundedValueError,
    },
    #[error("question '{question}' has an invalid priority: {source}")]
    Priority {
        question: String,
        source: BoundedValueError,
    },
    #[error("question '{question}' has invalid tags: {source}")]
    Tags {
        question: String,
        source: SupportTagError,
    },
    #[error("invalid support category: {0}")]
    SupportCategory(#[from] ParseSupportCategoryNameError),
    #[error("invalid relation: {0}")]
    RelationType(#[from] ParseRelationTypeError),
    /// A feature name was not returned by the feature save.
    #[error("feature '{feature}' was not stored")]
    MissingFeature { feature: String },
    #[error("catalogue persistence error: {0}")]
    Catalogue(#[from] CatalogueRepositoryError),
    #[error("support persistence error: {0}")]
    Support(#[from] SupportRepositoryError),
}

/// Service that loads a knowledge pack into the database.
#[derive(Clone)]
pub struct KnowledgePackSeeder<C, S> {
    catalogue: Arc<C>,
    support: Arc<S>,
}

impl<C, S> KnowledgePackSeeder<C, S> {
    pub fn new(catalogue: Arc<C>, support: Arc<S>) -> Self {
        Self { catalogue, support }
    }
}

impl<C, S> KnowledgePackSeeder<C, S>
where
    C: CatalogueRepository,
    S: SupportRepository,
{
    /// Convert and persist `pack`.
    ///
    /// Every feature, tariff and support category is converted before the
    /// first write, so a value that fails domain validation leaves the
    /// database untouched.
    ///
    /// # Errors
    ///
    /// Returns [`KnowledgePackSeedingError`] when a value fails domain
    /// validation or a repository call fails.
    pub async fn seed(
        &self,
        pack: &KnowledgePack,
    ) -> Result<KnowledgePackSeedOutcome, KnowledgePackSeedingError> {
        let feature_drafts = pack
            .features()
            .iter()
            .map(convert_feature)
            .collect::<Result<Vec<_>, _>>()?;
        let pending_tariffs = pack
            .tariffs()
            .iter()
            .map(convert_tariff)
            .collect::<Result<Vec<_>, _>>()?;
        let support_bundles = pack
            .support()
            .iter()
            .map(convert_support_category)
            .collect::<Result<Vec<_>, _>>()?;

        let stored = self.catalogue.save_features(feature_drafts).await?;
        let feature_ids: HashMap<String, FeatureId> = stored
            .iter()
            .map(|feature| (feature.name.clone(), feature.id))
            .collect();
        info!(count = stored.len(), "features saved");

        let bundles = pending_tariffs
            .into_iter()
            .map(|pending| pending.resolve(&feature_ids))
            .collect::<Result<Vec<_>, _>>()?;
        let tariff_ids = self.catalogue.save_tariffs(bundles).await?;
        info!(count = tariff_ids.len(), "tariffs saved");

        let support = self.support.save_support(support_bundles).await?;
        info!(
            categories = support.categories,
            questions = support.questions,
            relations = support.relations,
            "support content saved"
        );

        Ok(KnowledgePackSeedOutcome {
            features: stored.len(),
            tariffs: tariff_ids.len(),
            support,
        })
    }
}

/// A converted tariff whose feature references are still names.
struct PendingTariff {
    bundle: TariffBundle,
    features: Vec<(String, bool)>,
    question_features: Vec<Option<String>>,
}

impl PendingTariff {
    fn resolve(
        mut self,
        feature_ids: &HashMap<String, FeatureId>,
    ) -> Result<TariffBundle, KnowledgePackSeedingError> {
        for (name, is_premium) in &self.features {
            self.bundle.features.push(TariffFeatureRef {
                feature_id: lookup_feature(feature_ids, name)?,
                is_premium: *is_premium,
            });
        }
        for (question, feature) in self
            .bundle
            .questions
            .iter_mut()
            .zip(&self.question_features)
        {
            question.feature_id = feature
                .as_deref()
                .map(|name| lookup_feature(feature_ids, name))
                .transpose()?;
        }
        Ok(self.bundle)
    }
}

fn convert_feature(seed: &FeatureSeed) -> Result<FeatureDraft, KnowledgePackSeedingError> {
    let category = seed
        .category
        .parse::<FeatureCategory>()
        .map_err(|source| KnowledgePackSeedingError::FeatureCategory {
            feature: seed.name.clone(),
            source,
        })?;
    Ok(FeatureDraft {
        name: seed.name.clone(),
        description: seed.description.clone(),
        category,
    })
}

fn lookup_feature(
    ids: &HashMap<String, FeatureId>,
    name: &str,
) -> Result<FeatureId, KnowledgePackSeedingError> {
    ids.get(name)
        .copied()
        .ok_or_else(|| KnowledgePackSeedingError::MissingFeature {
            feature: name.to_owned(),
        })
}

fn convert_tariff(seed: &TariffSeed) -> Result<PendingTariff, KnowledgePackSeedingError> {
    let price = seed
        .price
        .parse()
        .map_err(|source| KnowledgePackSeedingError::Price {
            tariff: seed.name.clone(),
            source,
        })?;
    let user_limit = seed
        .user_limit
        .map(UserLimit::new)
        .transpose()
        .map_err(|source| KnowledgePackSeedingError::UserLimit {
            tariff: seed.name.clone(),
            source,
        })?;

    let mut bundle = TariffBundle::new(TariffDraft {
        name: seed.name.clone(),
        price,
        user_limit,
        description: seed.description.clone(),
    });
    bundle.use_cases = seed
        .use_cases
        .iter()
        .map(|case| UseCase {
            scenario: case.scenario.clone(),
            solution: case.solution.clone(),
            target_audience: case.target_audience.clone(),
        })
        .collect();
    bundle.questions = seed
        .questions
        .iter()
        .map(convert_tariff_question)
        .collect::<Result<_, _>>()?;
    Ok(PendingTariff {
        bundle,
        features: seed
            .features
            .iter()
            .map(|feature| (feature.name.clone(), feature.is_premium))
            .collect(),
        question_features: seed
            .questions
            .iter()
            .map(|question| question.feature.clone())
            .collect(),
    })
}

fn convert_tariff_question(
    seed: &TariffQuestionSeed,
) -> Result<TariffQuestionDraft, KnowledgePackSeedingError> {
    Ok(TariffQuestionDraft {
        question: seed.question.clone(),
        answer: seed.answer.clone(),
        feature_id: None,
        priority: convert_priority(&seed.question, seed.priority)?,
    })
}

fn convert_priority(question: &str, value: i32) -> Result<Priority, KnowledgePackSeedingError> {
    Priority::new(value).map_err(|source| KnowledgePackSeedingError::Priority {
        question: question.to_owned(),
        source,
    })
}

fn convert_support_category(
    seed: &SupportCategorySeed,
) -> Result<SupportBundle, KnowledgePackSeedingError> {
    let name = seed.name.parse::<SupportCategoryName>()?;
    let questions = seed
        .questions
        .iter()
        .map(convert_general_question)
        .collect::<Result<_, _>>()?;
    let relations = seed
        .relations
        .iter()
        .map(convert_relation)
        .collect::<Result<_, _>>()?;
    Ok(SupportBundle {
        category: SupportCategoryDraft {
            name,
            description: seed.description.clone(),
        },
        questions,
        relations,
    })
}

fn convert_general_question(
    seed: &GeneralQuestionSeed,
) -> Result<GeneralQuestionDraft, KnowledgePackSeedingError> {
    let tags = SupportTags::classify(&seed.tags).map_err(|source| {
        KnowledgePackSeedingError::Tags {
            question: seed.question.clone(),
            source,
        }
    })?;
    Ok(GeneralQuestionDraft {
        question: seed.question.clone(),
        answer: seed.answer.clone(),
        tags,
        priority: convert_priority(&seed.question, seed.priority)?,
    })
}

fn convert_relation(
    seed: &RelationSeed,
) -> Result<QuestionRelationDraft, KnowledgePackSeedingError> {
    Ok(QuestionRelationDraft {
        source: question_key(&seed.source),
        target: question_key(&seed.target),
        kind: seed.relation_type.parse::<RelationType>()?,
    })
}

fn question_key(pointer: &QuestionPointer) -> QuestionKey {
    match pointer {
        QuestionPointer::General { question } => QuestionKey::General {
            question: question.clone(),
        },
        QuestionPointer::Tariff { tariff, question } => QuestionKey::Tariff {
            tariff: tariff.clone(),
            question: question.clone(),
        },
    }
}
