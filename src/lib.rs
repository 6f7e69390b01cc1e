//! # entcmp
//!
//! Decide whether two JSON records describe the same real-world entity.
//!
//! Every field the two records share is normalized and scored with a
//! character-bigram Dice coefficient and a Levenshtein-based similarity.
//! The match decision is the weighted mean bigram score compared against a
//! threshold. When a model credential is supplied, each shared field and the
//! comparison as a whole also get an advisory judgment from an external
//! language model; those judgments are reported, never used for the decision.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install entcmp
//! entcmp                                  # MCP over stdio
//! entcmp --transport http --http-port 8000
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use entcmp::prelude::*;
//! use serde_json::json;
//!
//! # async fn run() -> entcmp::Result<()> {
//! let entity1 = Entity::from_value("entity1", json!({"name": "John Smith", "city": "NYC"}))?;
//! let entity2 = Entity::from_value("entity2", json!({"name": "Jon Smith", "city": "New York"}))?;
//!
//! let verdict = entcmp::compare_entities(&entity1, &entity2, DEFAULT_THRESHOLD, None).await?;
//! println!("match: {} ({:.2})", verdict.is_match, verdict.overall_bigram_score);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - [`entcmp-core`](https://docs.rs/entcmp-core) - Entity, text normalization, semantic verdict model
//! - [`entcmp-similarity`](https://docs.rs/entcmp-similarity) - Field scorer, comparator, verdict assembly
//! - [`entcmp-semantic`](https://docs.rs/entcmp-semantic) - Model-backed semantic judges
//! - [`entcmp-api`](https://docs.rs/entcmp-api) - JSON-RPC / MCP server (stdio and HTTP)

// Re-export core types
pub use entcmp_core::{
    normalize_text, value_to_text, Entity, Error, Result, SemanticAnnotations, SemanticVerdict,
};

// Re-export similarity
pub use entcmp_similarity::{
    bigram_similarity, edit_similarity, score_pair, validate_threshold, ComparisonVerdict,
    EntityComparator, FieldComparison, FieldReport, FieldScores, FieldWeights, SyntacticSummary,
    DEFAULT_THRESHOLD,
};

// Re-export semantic
pub use entcmp_semantic::{
    GeminiJudge, ModelConfig, NoCredentialJudge, SemanticError, SemanticJudge, SemanticResult,
};

// Re-export API
pub use entcmp_api::{ComparisonService, Dispatcher, RestApi, ServerConfig, StdioServer, Transport};

/// Compare two entities with uniform weights and the default model settings.
///
/// Fails only on an invalid threshold; semantic faults are reported in the
/// returned verdict.
pub async fn compare_entities(
    entity1: &Entity,
    entity2: &Entity,
    threshold: f64,
    api_key: Option<&str>,
) -> Result<ComparisonVerdict> {
    let threshold = validate_threshold(threshold)?;
    Ok(ComparisonService::default()
        .compare(entity1, entity2, threshold, api_key)
        .await)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ComparisonService, ComparisonVerdict, Entity, EntityComparator, Error, FieldReport,
        FieldWeights, ModelConfig, Result, SemanticJudge, SemanticVerdict, DEFAULT_THRESHOLD,
    };
}
