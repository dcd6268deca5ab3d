//! Schema key profiler and map/reduce utilities for document collections.
//!
//! Provides the record value model, field-path flattening and signature
//! hashing, an in-process map/reduce engine, the two-pass key-frequency
//! profiler, and a handful of collection maintenance helpers.

pub mod collection;
pub mod config;
pub mod error;
pub mod flatten;
pub mod hash;
pub mod jobs;
pub mod maintenance;
pub mod mapreduce;
pub mod profiler;
pub mod report;
pub mod testdoc;
pub mod value;

pub use error::{KeyprofError, Result};
pub use flatten::{flatten, FlattenOptions, Flattened};
pub use hash::{segment_depth, str_hash, Signature};
pub use profiler::{FieldAggregate, SchemaProfile, SchemaProfiler, SignatureAggregate};
pub use value::{Record, Scalar, Value};
