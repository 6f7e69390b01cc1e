//! # entcmp Similarity
//!
//! Field-wise syntactic similarity for schemaless entities.
//!
//! ## Features
//!
//! - **Two metrics per field**: bigram Dice coefficient and normalized edit similarity
//! - **Field alignment**: fields are compared by shared name, in the first entity's order
//! - **Field weights**: explicit name → weight mapping, 1.0 by default
//! - **Verdict assembly**: merges syntactic scores with semantic annotations
//!
//! ## Example
//!
//! ```rust
//! use entcmp_core::{Entity, SemanticAnnotations};
//! use entcmp_similarity::{ComparisonVerdict, EntityComparator, DEFAULT_THRESHOLD};
//! use serde_json::json;
//!
//! let e1 = Entity::from_value("entity1", json!({"city": "New York"})).unwrap();
//! let e2 = Entity::from_value("entity2", json!({"city": "new york!"})).unwrap();
//!
//! let summary = EntityComparator::uniform().compare(&e1, &e2);
//! let annotations = SemanticAnnotations::skipped(summary.field_names());
//! let verdict = ComparisonVerdict::assemble(summary, DEFAULT_THRESHOLD, annotations);
//! assert!(verdict.is_match);
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Entities   │────>│ Comparator  │────>│  Syntactic  │
//! │  (1 and 2)  │     │ (per field) │     │   Summary   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                     ┌─────────────┐            │
//!                     │  Semantic   │            │
//!                     │ Annotations │            │
//!                     └─────────────┘            │
//!                            │                   │
//!                     ┌─────────────┐            │
//!                     │  Assembler  │<───────────┘
//!                     │  (verdict)  │
//!                     └─────────────┘
//! ```

pub mod compare;
pub mod distance;
pub mod explain;
pub mod weights;

pub use compare::{
    validate_threshold, EntityComparator, FieldComparison, SyntacticSummary, DEFAULT_THRESHOLD,
};
pub use distance::{bigram_similarity, edit_similarity, score_pair, FieldScores};
pub use explain::{explain, ComparisonVerdict, FieldReport, UnmatchedFields, MISSING_ANNOTATION};
pub use weights::{weighted_mean, FieldWeights, DEFAULT_WEIGHT};
