//! Clinical trial domain core.
//!
//! Schema validation, business-rule normalization and natural-key upsert
//! for trial documents. Storage is reached only through the
//! [`store::TrialStore`] trait so this crate has no database dependency.

pub mod error;
pub mod ingest;
pub mod memory;
pub mod normalize;
pub mod schema;
pub mod store;
pub mod trial;
pub mod types;
