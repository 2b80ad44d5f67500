//! Persistence gateway: one typed operation per store call.
//!
//! Provides `Gateway` implementations for:
//! - PostgreSQL (`PgGateway`)
//! - In-memory (`MemoryGateway`), enforcing the same constraints as the SQL schema

mod memory;
mod postgres;

pub use memory::MemoryGateway;
pub use postgres::PgGateway;

use crate::error::StoreError;
use crate::model::{
    LibraryMembership, LibraryMembershipPatch, NewLibraryMembership, NewProfessor, NewStudent, Professor,
    ProfessorPatch, Student, StudentPatch, StudentWithProctor,
};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn list_students(&self) -> Result<Vec<Student>>;

    /// All students with their proctor joined in (left-join semantics).
    async fn list_students_enriched(&self) -> Result<Vec<StudentWithProctor>>;

    async fn get_student(&self, id: &str) -> Result<Option<Student>>;

    async fn create_student(&self, new: NewStudent) -> Result<Student>;

    async fn update_student(&self, id: &str, patch: StudentPatch) -> Result<Student>;

    async fn delete_student(&self, id: &str) -> Result<()>;

    async fn list_professors(&self) -> Result<Vec<Professor>>;

    async fn get_professor(&self, id: &str) -> Result<Option<Professor>>;

    async fn create_professor(&self, new: NewProfessor) -> Result<Professor>;

    async fn update_professor(&self, id: &str, patch: ProfessorPatch) -> Result<Professor>;

    async fn delete_professor(&self, id: &str) -> Result<()>;

    async fn list_students_by_proctor(&self, professor_id: &str) -> Result<Vec<Student>>;

    /// Sets `proctor_id` on the student. The professor id is not checked here; the store's FK decides.
    async fn assign_proctor(&self, professor_id: &str, student_id: &str) -> Result<Student>;

    async fn get_library_membership(&self, student_id: &str) -> Result<Option<LibraryMembership>>;

    async fn create_library_membership(
        &self,
        student_id: &str,
        new: NewLibraryMembership,
    ) -> Result<LibraryMembership>;

    async fn update_library_membership(
        &self,
        student_id: &str,
        patch: LibraryMembershipPatch,
    ) -> Result<LibraryMembership>;

    async fn delete_library_membership(&self, student_id: &str) -> Result<()>;

    /// Cheap round trip used by `/ready`.
    async fn ping(&self) -> Result<()>;
}
