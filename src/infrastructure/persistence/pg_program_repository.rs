//! PostgreSQL implementation of program repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{EnrollmentWithProgram, Program, ProgramEnrollment};
use crate::domain::repositories::ProgramRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ProgramRow {
    id: String,
    workspace_id: String,
    name: String,
    default_discount_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ProgramRow> for Program {
    fn from(r: ProgramRow) -> Self {
        Program {
            id: r.id,
            workspace_id: r.workspace_id,
            name: r.name,
            default_discount_id: r.default_discount_id,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    enrollment_id: String,
    partner_id: String,
    discount_id: Option<String>,
    status: String,
    enrolled_at: DateTime<Utc>,
    #[sqlx(flatten)]
    program: ProgramRow,
}

pub struct PgProgramRepository {
    pool: Arc<PgPool>,
}

impl PgProgramRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgramRepository for PgProgramRepository {
    async fn find_enrollment(
        &self,
        partner_id: &str,
        program_id: &str,
    ) -> Result<Option<EnrollmentWithProgram>, AppError> {
        let row = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT pe.id AS enrollment_id,
                   pe.partner_id,
                   pe.discount_id,
                   pe.status,
                   pe.created_at AS enrolled_at,
                   p.id, p.workspace_id, p.name, p.default_discount_id, p.created_at
            FROM program_enrollments pe
            JOIN programs p ON p.id = pe.program_id
            WHERE pe.partner_id = $1 AND pe.program_id = $2
            "#,
        )
        .bind(partner_id)
        .bind(program_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|r| EnrollmentWithProgram {
            enrollment: ProgramEnrollment {
                id: r.enrollment_id,
                partner_id: r.partner_id,
                program_id: r.program.id.clone(),
                discount_id: r.discount_id,
                status: r.status,
                created_at: r.enrolled_at,
            },
            program: r.program.into(),
        }))
    }

    async fn find_in_workspace(
        &self,
        workspace_id: &str,
        program_id: &str,
    ) -> Result<Option<Program>, AppError> {
        let row = sqlx::query_as::<_, ProgramRow>(
            r#"
            SELECT id, workspace_id, name, default_discount_id, created_at
            FROM programs
            WHERE id = $1 AND workspace_id = $2
            "#,
        )
        .bind(program_id)
        .bind(workspace_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Program::from))
    }
}
