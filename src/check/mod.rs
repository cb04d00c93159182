//! Per-record checks run while records stream through the pipeline.
//!
//! - [`text`] — forbidden-character scan with line/column locations.
//! - [`duplicates`] — duplicate text and license/exception id collisions.
//! - [`compare`] — semantic text equivalence used by the duplicate check and
//!   the reference tester.

pub mod compare;
pub mod duplicates;
pub mod text;
