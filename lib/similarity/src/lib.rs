//! # linkspec Similarity
//!
//! Similarity measures and rule execution for record pairs.
//!
//! The learning loop only talks to the [`SimilarityEngine`] and
//! [`ExecutionEngine`] traits; this crate also ships a built-in
//! implementation of both so a session can run without external engines.
//!
//! ## Features
//!
//! - **String measures**: cosine, jaccard, jaro, qgrams, trigrams, exactmatch, levenshtein
//! - **Date measures**: datesim, daysim, yearsim
//! - **Point-set measures**: hausdorff, symmetrichausdorff, frechet, geolink, geomean,
//!   surjection, fairsurjection
//! - **Execution**: nested-loop evaluation of AND / OR / XOR / MINUS rule trees
//!
//! ## Example
//!
//! ```rust
//! use linkspec_core::{MetricExpression, Record};
//! use linkspec_similarity::{BuiltinSimilarity, SimilarityEngine};
//!
//! let a = Record::new("s1").with_property("name", "Prosciutto cotto");
//! let b = Record::new("t1").with_property("title", "prosciutto crudo");
//! let expr = MetricExpression::parse("trigrams(x.name, y.title)").unwrap();
//!
//! let score = BuiltinSimilarity.similarity(Some(&a), Some(&b), &expr, 0.01);
//! assert!(score > 0.5);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌─────────────┐
//! │  RuleTree   │────>│ NestedLoopEngine │────>│   Mapping   │
//! │ (thresholds)│     │  (cross product) │     │   (links)   │
//! └─────────────┘     └──────────────────┘     └─────────────┘
//!                              │
//!                     ┌──────────────────┐
//!                     │ SimilarityEngine │
//!                     │ (measure scores) │
//!                     └──────────────────┘
//! ```

pub mod measure;
pub mod distance;
pub mod temporal;
pub mod pointset;
pub mod engine;
pub mod execution;

pub use measure::{Measure, MeasureKind};
pub use engine::{BuiltinSimilarity, SimilarityEngine, MISSING_RECORD_SIMILARITY};
pub use execution::{ExecutionEngine, NestedLoopEngine};
pub use pointset::GeoPoint;
