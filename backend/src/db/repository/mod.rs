//! Repository trait definitions for storage operations.
//!
//! Storage is split into focused traits so that each service only depends on
//! what it touches:
//!
//! - [`error`]: Error types for repository operations
//! - [`schedule`]: CRUD and owner/date lookups for schedules
//! - [`subject`]: CRUD for subjects
//!
//! # Convenience Trait Bound
//!
//! For code that needs every storage capability (application state, the
//! factory), use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn seed<R: FullRepository + ?Sized>(repo: &R, schedule: &Schedule) -> RepositoryResult<()> {
//!     repo.create_schedule(schedule).await
//! }
//! ```

pub mod error;
pub mod schedule;
pub mod subject;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use schedule::ScheduleRepository;
pub use subject::SubjectRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements every repository trait.
pub trait FullRepository: ScheduleRepository + SubjectRepository {}

impl<T> FullRepository for T where T: ScheduleRepository + SubjectRepository {}
