//! Knowledge-pack documents for seeding the sales and support knowledge base.
//!
//! A knowledge pack is a versioned JSON document describing tariff features,
//! tariffs (with their feature references, use cases and tariff-specific
//! questions) and support categories (with general questions and the
//! relations between questions). This crate parses the document and checks
//! its internal consistency; it is deliberately independent of backend domain
//! types so the document format can evolve on its own.
//!
//! Field-level rules such as the price format, tag vocabulary and priority
//! range are enforced by the backend when the pack is converted into domain
//! drafts.
//!
//! # Example
//!
//! ```
//! use catalogue_seed::KnowledgePack;
//!
//! let json = r#"{
//!     "version": 1,
//!     "features": [
//!         {"name": "SSO", "description": "Single sign-on", "category": "Security"}
//!     ],
//!     "tariffs": [{
//!         "name": "Team",
//!         "price": "990 руб/мес",
//!         "userLimit": 10,
//!         "description": "Small teams",
//!         "features": [{"name": "SSO", "isPremium": true}]
//!     }]
//! }"#;
//!
//! let pack = KnowledgePack::from_json(json).expect("valid pack");
//! assert_eq!(pack.tariffs().len(), 1);
//! ```

mod document;
mod error;
mod validation;

pub use document::{
    FeatureRefSeed, FeatureSeed, GeneralQuestionSeed, KnowledgePack, QuestionPointer, RelationSeed,
    SupportCategorySeed, TariffQuestionSeed, TariffSeed, UseCaseSeed,
};
pub use error::PackError;
pub use validation::SUPPORTED_VERSION;
