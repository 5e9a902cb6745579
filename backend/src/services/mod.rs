//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP handlers and the repository traits. They
//! parse wire-format input, apply the ordering and grouping rules and map
//! storage failures onto [`ScheduleError`].

pub mod error;
pub mod schedule_interactor;
pub mod subjects;

pub use error::{ScheduleError, ServiceResult};
pub use schedule_interactor::{NewSchedule, ScheduleInteractor, ScheduleListView, ScheduleUpdate};
pub use subjects::SubjectService;
