//! Resume ranking engine.
//!
//! `Ranker` is built once at start-up from the scoring tables and a
//! similarity strategy, then shared read-only across requests. The only
//! mutable piece is the `ScoringHistoryContext` the caller passes in.

pub mod domain;
pub mod embedding;
pub mod experience;
pub mod handlers;
pub mod history;
pub mod keywords;
pub mod models;
pub mod normalize;
pub mod ranker;
pub mod similarity;
pub mod skills;
pub mod summary;
pub mod tables;
pub mod tfidf;
pub mod weights;
