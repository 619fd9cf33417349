//! Validation of timetable inputs and outputs.
//!
//! - **`conflicts`**: residual double-booking of faculty and rooms in a
//!   produced timetable. The greedy scheduler cannot rule these out; for
//!   the CSP scheduler the check doubles as a correctness oracle.
//! - **`input`**: pre-flight findings on the entity collections.

mod conflicts;
mod input;

pub use conflicts::{validate_schedule, Conflict, ValidationReport};
pub use input::{
    validate_input, InputReport, ValidationError, ValidationErrorKind, HIGH_WORKLOAD_COURSES,
};
