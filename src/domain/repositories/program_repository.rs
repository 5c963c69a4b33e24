//! Repository trait for programs and enrollments.

use crate::domain::entities::{EnrollmentWithProgram, Program};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgramRepository: Send + Sync {
    /// Finds a partner's enrollment in a program, with the program loaded.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_enrollment(
        &self,
        partner_id: &str,
        program_id: &str,
    ) -> Result<Option<EnrollmentWithProgram>, AppError>;

    /// Finds a program only if it is owned by `workspace_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_in_workspace(
        &self,
        workspace_id: &str,
        program_id: &str,
    ) -> Result<Option<Program>, AppError>;
}
