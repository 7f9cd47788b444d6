//! Source records and filter types for the four operations collections.
//!
//! Every field the reports group on is optional: exports routinely carry
//! NULLs and badly typed cells, and aggregates drop-and-count those rows
//! instead of folding them into a wrong bucket.

pub mod appointment;
pub mod claim;
pub mod enums;
pub mod filters;
pub mod lab;
pub mod staffing;

pub use appointment::*;
pub use claim::*;
pub use filters::*;
pub use lab::*;
pub use staffing::*;
