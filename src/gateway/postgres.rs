//! PostgreSQL gateway. Tables are created by [`crate::store::ensure_schema`].

use super::{Gateway, Result};
use crate::error::StoreError;
use crate::model::{
    LibraryMembership, LibraryMembershipPatch, NewLibraryMembership, NewProfessor, NewStudent, Professor,
    ProfessorPatch, Student, StudentPatch, StudentWithProctor, DEFAULT_BOOK_LIMIT,
};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

const STUDENT_COLUMNS: &str = "id, name, aadhar, proctor_id";
const PROFESSOR_COLUMNS: &str = "id, name, aadhar";
const MEMBERSHIP_COLUMNS: &str = "id, student_id, issue_date, book_limit";

#[derive(sqlx::FromRow)]
struct EnrichedRow {
    #[sqlx(flatten)]
    student: Student,
    proctor: Option<Json<Professor>>,
}

#[derive(Clone, Debug)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn expect_affected(rows: u64) -> Result<()> {
    if rows == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn list_students(&self) -> Result<Vec<Student>> {
        let sql = format!("SELECT {} FROM students", STUDENT_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
    }

    async fn list_students_enriched(&self) -> Result<Vec<StudentWithProctor>> {
        let sql = r#"
            SELECT s.id, s.name, s.aadhar, s.proctor_id,
                   CASE WHEN p.id IS NULL THEN NULL
                        ELSE json_build_object('id', p.id, 'name', p.name, 'aadhar', p.aadhar)
                   END AS proctor
            FROM students s
            LEFT JOIN professors p ON p.id = s.proctor_id
        "#;
        tracing::debug!(sql = %sql, "query");
        let rows: Vec<EnrichedRow> = sqlx::query_as(sql).fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|r| StudentWithProctor {
                student: r.student,
                proctor: r.proctor.map(|Json(p)| p),
            })
            .collect())
    }

    async fn get_student(&self, id: &str) -> Result<Option<Student>> {
        let sql = format!("SELECT {} FROM students WHERE id = $1", STUDENT_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn create_student(&self, new: NewStudent) -> Result<Student> {
        let sql = format!(
            "INSERT INTO students (name, aadhar, proctor_id) VALUES ($1, $2, $3) RETURNING {}",
            STUDENT_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as(&sql)
            .bind(new.name)
            .bind(new.aadhar)
            .bind(new.proctor_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_student(&self, id: &str, patch: StudentPatch) -> Result<Student> {
        let sql = format!(
            r#"UPDATE students SET
                name = COALESCE($2, name),
                aadhar = COALESCE($3, aadhar),
                proctor_id = CASE WHEN $4 THEN $5 ELSE proctor_id END
            WHERE id = $1
            RETURNING {}"#,
            STUDENT_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let (set_proctor, proctor_id) = match patch.proctor_id {
            Some(value) => (true, value),
            None => (false, None),
        };
        sqlx::query_as(&sql)
            .bind(id)
            .bind(patch.name)
            .bind(patch.aadhar)
            .bind(set_proctor)
            .bind(proctor_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete_student(&self, id: &str) -> Result<()> {
        tracing::debug!(id, "delete student");
        let done = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_affected(done.rows_affected())
    }

    async fn list_professors(&self) -> Result<Vec<Professor>> {
        let sql = format!("SELECT {} FROM professors", PROFESSOR_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_professor(&self, id: &str) -> Result<Option<Professor>> {
        let sql = format!("SELECT {} FROM professors WHERE id = $1", PROFESSOR_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn create_professor(&self, new: NewProfessor) -> Result<Professor> {
        let sql = format!(
            "INSERT INTO professors (name, aadhar) VALUES ($1, $2) RETURNING {}",
            PROFESSOR_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as(&sql)
            .bind(new.name)
            .bind(new.aadhar)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_professor(&self, id: &str, patch: ProfessorPatch) -> Result<Professor> {
        let sql = format!(
            "UPDATE professors SET name = COALESCE($2, name), aadhar = COALESCE($3, aadhar) WHERE id = $1 RETURNING {}",
            PROFESSOR_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        sqlx::query_as(&sql)
            .bind(id)
            .bind(patch.name)
            .bind(patch.aadhar)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete_professor(&self, id: &str) -> Result<()> {
        tracing::debug!(id, "delete professor");
        let done = sqlx::query("DELETE FROM professors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_affected(done.rows_affected())
    }

    async fn list_students_by_proctor(&self, professor_id: &str) -> Result<Vec<Student>> {
        let sql = format!("SELECT {} FROM students WHERE proctor_id = $1", STUDENT_COLUMNS);
        tracing::debug!(sql = %sql, professor_id, "query");
        Ok(sqlx::query_as(&sql).bind(professor_id).fetch_all(&self.pool).await?)
    }

    async fn assign_proctor(&self, professor_id: &str, student_id: &str) -> Result<Student> {
        let sql = format!(
            "UPDATE students SET proctor_id = $1 WHERE id = $2 RETURNING {}",
            STUDENT_COLUMNS
        );
        tracing::debug!(sql = %sql, professor_id, student_id, "query");
        sqlx::query_as(&sql)
            .bind(professor_id)
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn get_library_membership(&self, student_id: &str) -> Result<Option<LibraryMembership>> {
        let sql = format!(
            "SELECT {} FROM library_memberships WHERE student_id = $1",
            MEMBERSHIP_COLUMNS
        );
        tracing::debug!(sql = %sql, student_id, "query");
        Ok(sqlx::query_as(&sql).bind(student_id).fetch_optional(&self.pool).await?)
    }

    async fn create_library_membership(
        &self,
        student_id: &str,
        new: NewLibraryMembership,
    ) -> Result<LibraryMembership> {
        let sql = format!(
            "INSERT INTO library_memberships (student_id, issue_date, book_limit) VALUES ($1, COALESCE($2, NOW()), $3) RETURNING {}",
            MEMBERSHIP_COLUMNS
        );
        tracing::debug!(sql = %sql, student_id, "query");
        Ok(sqlx::query_as(&sql)
            .bind(student_id)
            .bind(new.issue_date)
            .bind(new.book_limit.unwrap_or(DEFAULT_BOOK_LIMIT))
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_library_membership(
        &self,
        student_id: &str,
        patch: LibraryMembershipPatch,
    ) -> Result<LibraryMembership> {
        let sql = format!(
            "UPDATE library_memberships SET issue_date = COALESCE($2, issue_date), book_limit = COALESCE($3, book_limit) WHERE student_id = $1 RETURNING {}",
            MEMBERSHIP_COLUMNS
        );
        tracing::debug!(sql = %sql, student_id, "query");
        sqlx::query_as(&sql)
            .bind(student_id)
            .bind(patch.issue_date)
            .bind(patch.book_limit)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete_library_membership(&self, student_id: &str) -> Result<()> {
        tracing::debug!(student_id, "delete library membership");
        let done = sqlx::query("DELETE FROM library_memberships WHERE student_id = $1")
            .bind(student_id)
            .execute(&self.pool)
            .await?;
        expect_affected(done.rows_affected())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
