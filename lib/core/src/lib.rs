//! # entcmp Core
//!
//! Core types for the entcmp entity comparison engine.
//!
//! - [`Entity`] - a schemaless key/value record, fields kept in input order
//! - [`normalize_text`] - canonical form used by every syntactic metric
//! - [`SemanticVerdict`] / [`SemanticAnnotations`] - advisory model judgments
//!
//! ## Example
//!
//! ```rust
//! use entcmp_core::{normalize_text, Entity};
//! use serde_json::json;
//!
//! let entity = Entity::from_value("entity1", json!({"name": "John Smith"})).unwrap();
//! assert_eq!(normalize_text("  John   SMITH! "), "john smith");
//! assert!(entity.contains("name"));
//! ```

pub mod entity;
pub mod error;
pub mod normalize;
pub mod verdict;

pub use entity::{value_to_text, Entity};
pub use error::{Error, Result};
pub use normalize::{normalize_text, normalize_value, normalized_items};
pub use verdict::{
    SemanticAnnotations, SemanticVerdict, HOLISTIC_SKIPPED_DUE_TO_ERROR,
    HOLISTIC_SKIPPED_NO_CREDENTIAL, SKIPPED_NO_CREDENTIAL, UNPARSED_PREFIX,
};
