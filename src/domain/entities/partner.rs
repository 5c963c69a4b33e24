//! Partner, program and enrollment entities.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A partner profile (affiliate) that can enroll into programs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partner {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

/// An affiliate program owned by a workspace.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    pub default_discount_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Membership of a partner in a program.
///
/// `discount_id` overrides the program's default discount when set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramEnrollment {
    pub id: String,
    pub partner_id: String,
    pub program_id: String,
    pub discount_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// An enrollment loaded together with its program.
#[derive(Debug, Clone)]
pub struct EnrollmentWithProgram {
    pub enrollment: ProgramEnrollment,
    pub program: Program,
}
