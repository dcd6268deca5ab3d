//! Integration test suite.
//!
//! 1. Profiler scenarios over small record sets
//! 2. Order and partition independence properties
//! 3. File-based pipeline: JSON lines in, report and field export out

pub mod pipeline_tests;
pub mod property_tests;
pub mod scenario_tests;
