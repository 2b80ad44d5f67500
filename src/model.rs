//! Entities and request payloads. JSON field names are camelCase; columns are snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Book limit applied when a membership is created without one.
pub const DEFAULT_BOOK_LIMIT: i32 = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub aadhar: String,
    pub proctor_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Professor {
    pub id: String,
    pub name: String,
    pub aadhar: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LibraryMembership {
    pub id: String,
    pub student_id: String,
    pub issue_date: DateTime<Utc>,
    pub book_limit: i32,
}

/// Student with the proctor relation loaded; `proctor` is null when unassigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentWithProctor {
    #[serde(flatten)]
    pub student: Student,
    pub proctor: Option<Professor>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    #[serde(alias = "aadharNumber")]
    pub aadhar: String,
    #[serde(default)]
    pub proctor_id: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfessor {
    pub name: String,
    #[serde(alias = "aadharNumber")]
    pub aadhar: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLibraryMembership {
    #[serde(default)]
    pub issue_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub book_limit: Option<i32>,
}

/// Partial student update. `proctor_id` distinguishes "absent" (`None`) from "set to null" (`Some(None)`).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "aadharNumber")]
    pub aadhar: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub proctor_id: Option<Option<String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessorPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "aadharNumber")]
    pub aadhar: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryMembershipPatch {
    #[serde(default)]
    pub issue_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub book_limit: Option<i32>,
}

/// Body of `POST /professors/:id/proctorships`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProctorAssignment {
    pub student_id: String,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
