//! Timetabling domain models.
//!
//! Provides the entity records consumed by the scheduler (courses,
//! faculty, rooms, students), the weekly slot grid, and the schedule
//! produced from them.
//!
//! # Domain Mappings
//!
//! | u-timetable | Generic scheduling |
//! |-------------|--------------------|
//! | Course session | Activity |
//! | Faculty | Human resource |
//! | Room | Primary resource |
//! | Slot | Time window |
//! | Schedule | Assignment list |
//!
//! # Ingestion
//!
//! Records deserialize leniently: missing optional fields take their
//! documented defaults and malformed numbers coerce to a default rather
//! than failing.

mod coerce;
mod course;
mod faculty;
mod program;
mod room;
mod schedule;
mod slot;
mod student;

pub use coerce::{DEFAULT_CAPACITY, DEFAULT_CREDITS};
pub use course::{Course, SessionKind, SessionType, CLASSROOM};
pub use faculty::{Availability, AvailabilitySpec, Faculty};
pub use program::{ProgramConfig, GENERAL_PROGRAM};
pub use room::Room;
pub use schedule::{
    Algorithm, Schedule, ScheduleEntry, ScheduleMetadata, UnscheduledCourse, UNASSIGNED_FACULTY,
};
pub use slot::{Day, ParseSlotError, Slot, TimeSlot, SLOTS_PER_WEEK};
pub use student::Student;
