//! Academic timetable construction.
//!
//! Places weekly course sessions into a Monday–Friday, 09:00–17:00 grid of
//! one-hour slots, assigning each session a room, and checks the result for
//! faculty and room double-booking.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Course`, `Faculty`, `Room`, `Student`,
//!   `Slot`, `Schedule`, `ScheduleEntry`, `ProgramConfig`
//! - **`scheduler`**: Randomized greedy scheduler, capability checks,
//!   request-level generation (`build_schedule`), and KPIs
//! - **`cp`**: Constraint-satisfaction scheduler with bounded backtracking
//! - **`validation`**: Double-booking detection and input pre-flight checks
//! - **`error`**: `TimetableError`
//!
//! # Algorithms
//!
//! The greedy scheduler is fast and never fails, but may leave sessions
//! unplaced. The CSP scheduler either places every session without a clash
//! or fails explicitly.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6

pub mod cp;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::TimetableError;
pub use scheduler::{build_schedule, GeneratedTimetable, GenerationResponse, ScheduleRequest};
pub use validation::{validate_schedule, ValidationReport};
