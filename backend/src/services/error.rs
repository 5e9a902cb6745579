//! Errors raised by the schedule and subject services.

use crate::db::repository::RepositoryError;

pub type ServiceResult<T> = Result<T, ScheduleError>;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A date-time field did not match `YYYY-MM-DD HH:MM:SS`.
    #[error("{field} has an invalid format")]
    FormatInvalid { field: &'static str },

    /// The caller does not own the record.
    #[error("forbidden")]
    Forbidden,

    #[error("storage failure: {0}")]
    InternalStorage(#[source] RepositoryError),

    /// A bulk call stopped at item `index` (0-based). Earlier items stay written.
    #[error("bulk operation aborted at item {index}: {cause}")]
    BulkAborted {
        index: usize,
        cause: Box<ScheduleError>,
    },
}

impl ScheduleError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Map a read failure: a missing row becomes [`ScheduleError::NotFound`].
    pub(crate) fn from_read(entity: &'static str, id: impl ToString, err: RepositoryError) -> Self {
        if err.is_not_found() {
            Self::not_found(entity, id)
        } else {
            Self::InternalStorage(err)
        }
    }

    /// The error that actually stopped the operation, unwrapping bulk aborts.
    pub fn root_cause(&self) -> &ScheduleError {
        match self {
            Self::BulkAborted { cause, .. } => cause.root_cause(),
            other => other,
        }
    }

    /// Item index of a bulk abort, if any.
    pub fn bulk_index(&self) -> Option<usize> {
        match self {
            Self::BulkAborted { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl From<RepositoryError> for ScheduleError {
    fn from(err: RepositoryError) -> Self {
        Self::InternalStorage(err)
    }
}
