//! In-memory gateway for development and testing.
//!
//! Mirrors the constraints of the SQL schema: unique `aadhar` per table, one membership
//! per student, `proctor_id` set to null when the professor is deleted, and students with
//! a membership cannot be deleted.

use super::{Gateway, Result};
use crate::error::StoreError;
use crate::model::{
    LibraryMembership, LibraryMembershipPatch, NewLibraryMembership, NewProfessor, NewStudent, Professor,
    ProfessorPatch, Student, StudentPatch, StudentWithProctor, DEFAULT_BOOK_LIMIT,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    students: Vec<Student>,
    professors: Vec<Professor>,
    memberships: Vec<LibraryMembership>,
}

impl Tables {
    fn check_proctor(&self, proctor_id: Option<&str>) -> Result<()> {
        match proctor_id {
            Some(pid) if !self.professors.iter().any(|p| p.id == pid) => {
                Err(StoreError::ForeignKey("students_proctor_id_fkey".into()))
            }
            _ => Ok(()),
        }
    }
}

/// Data is not persisted and is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn list_students(&self) -> Result<Vec<Student>> {
        Ok(self.tables.read().await.students.clone())
    }

    async fn list_students_enriched(&self) -> Result<Vec<StudentWithProctor>> {
        let t = self.tables.read().await;
        Ok(t.students
            .iter()
            .map(|s| StudentWithProctor {
                student: s.clone(),
                proctor: s
                    .proctor_id
                    .as_deref()
                    .and_then(|pid| t.professors.iter().find(|p| p.id == pid).cloned()),
            })
            .collect())
    }

    async fn get_student(&self, id: &str) -> Result<Option<Student>> {
        let t = self.tables.read().await;
        Ok(t.students.iter().find(|s| s.id == id).cloned())
    }

    async fn create_student(&self, new: NewStudent) -> Result<Student> {
        let mut t = self.tables.write().await;
        if t.students.iter().any(|s| s.aadhar == new.aadhar) {
            return Err(StoreError::Conflict("students_aadhar_key".into()));
        }
        t.check_proctor(new.proctor_id.as_deref())?;
        let student = Student {
            id: new_id(),
            name: new.name,
            aadhar: new.aadhar,
            proctor_id: new.proctor_id,
        };
        t.students.push(student.clone());
        Ok(student)
    }

    async fn update_student(&self, id: &str, patch: StudentPatch) -> Result<Student> {
        let mut t = self.tables.write().await;
        let idx = t.students.iter().position(|s| s.id == id).ok_or(StoreError::NotFound)?;
        if let Some(ref aadhar) = patch.aadhar {
            if t.students.iter().any(|s| s.id != id && &s.aadhar == aadhar) {
                return Err(StoreError::Conflict("students_aadhar_key".into()));
            }
        }
        if let Some(Some(ref pid)) = patch.proctor_id {
            t.check_proctor(Some(pid.as_str()))?;
        }
        let student = &mut t.students[idx];
        if let Some(name) = patch.name {
            student.name = name;
        }
        if let Some(aadhar) = patch.aadhar {
            student.aadhar = aadhar;
        }
        if let Some(proctor_id) = patch.proctor_id {
            student.proctor_id = proctor_id;
        }
        Ok(student.clone())
    }

    async fn delete_student(&self, id: &str) -> Result<()> {
        let mut t = self.tables.write().await;
        let idx = t.students.iter().position(|s| s.id == id).ok_or(StoreError::NotFound)?;
        if t.memberships.iter().any(|m| m.student_id == id) {
            return Err(StoreError::ForeignKey("library_memberships_student_id_fkey".into()));
        }
        t.students.remove(idx);
        Ok(())
    }

    async fn list_professors(&self) -> Result<Vec<Professor>> {
        Ok(self.tables.read().await.professors.clone())
    }

    async fn get_professor(&self, id: &str) -> Result<Option<Professor>> {
        let t = self.tables.read().await;
        Ok(t.professors.iter().find(|p| p.id == id).cloned())
    }

    async fn create_professor(&self, new: NewProfessor) -> Result<Professor> {
        let mut t = self.tables.write().await;
        if t.professors.iter().any(|p| p.aadhar == new.aadhar) {
            return Err(StoreError::Conflict("professors_aadhar_key".into()));
        }
        let professor = Professor {
            id: new_id(),
            name: new.name,
            aadhar: new.aadhar,
        };
        t.professors.push(professor.clone());
        Ok(professor)
    }

    async fn update_professor(&self, id: &str, patch: ProfessorPatch) -> Result<Professor> {
        let mut t = self.tables.write().await;
        let idx = t.professors.iter().position(|p| p.id == id).ok_or(StoreError::NotFound)?;
        if let Some(ref aadhar) = patch.aadhar {
            if t.professors.iter().any(|p| p.id != id && &p.aadhar == aadhar) {
                return Err(StoreError::Conflict("professors_aadhar_key".into()));
            }
        }
        let professor = &mut t.professors[idx];
        if let Some(name) = patch.name {
            professor.name = name;
        }
        if let Some(aadhar) = patch.aadhar {
            professor.aadhar = aadhar;
        }
        Ok(professor.clone())
    }

    async fn delete_professor(&self, id: &str) -> Result<()> {
        let mut t = self.tables.write().await;
        let idx = t.professors.iter().position(|p| p.id == id).ok_or(StoreError::NotFound)?;
        t.professors.remove(idx);
        // ON DELETE SET NULL
        for s in t.students.iter_mut().filter(|s| s.proctor_id.as_deref() == Some(id)) {
            s.proctor_id = None;
        }
        Ok(())
    }

    async fn list_students_by_proctor(&self, professor_id: &str) -> Result<Vec<Student>> {
        let t = self.tables.read().await;
        Ok(t.students
            .iter()
            .filter(|s| s.proctor_id.as_deref() == Some(professor_id))
            .cloned()
            .collect())
    }

    async fn assign_proctor(&self, professor_id: &str, student_id: &str) -> Result<Student> {
        let mut t = self.tables.write().await;
        let idx = t
            .students
            .iter()
            .position(|s| s.id == student_id)
            .ok_or(StoreError::NotFound)?;
        t.check_proctor(Some(professor_id))?;
        let student = &mut t.students[idx];
        student.proctor_id = Some(professor_id.to_string());
        Ok(student.clone())
    }

    async fn get_library_membership(&self, student_id: &str) -> Result<Option<LibraryMembership>> {
        let t = self.tables.read().await;
        Ok(t.memberships.iter().find(|m| m.student_id == student_id).cloned())
    }

    async fn create_library_membership(
        &self,
        student_id: &str,
        new: NewLibraryMembership,
    ) -> Result<LibraryMembership> {
        let mut t = self.tables.write().await;
        if t.memberships.iter().any(|m| m.student_id == student_id) {
            return Err(StoreError::Conflict("library_memberships_student_id_key".into()));
        }
        if !t.students.iter().any(|s| s.id == student_id) {
            return Err(StoreError::ForeignKey("library_memberships_student_id_fkey".into()));
        }
        let membership = LibraryMembership {
            id: new_id(),
            student_id: student_id.to_string(),
            issue_date: new.issue_date.unwrap_or_else(Utc::now),
            book_limit: new.book_limit.unwrap_or(DEFAULT_BOOK_LIMIT),
        };
        t.memberships.push(membership.clone());
        Ok(membership)
    }

    async fn update_library_membership(
        &self,
        student_id: &str,
        patch: LibraryMembershipPatch,
    ) -> Result<LibraryMembership> {
        let mut t = self.tables.write().await;
        let membership = t
            .memberships
            .iter_mut()
            .find(|m| m.student_id == student_id)
            .ok_or(StoreError::NotFound)?;
        if let Some(issue_date) = patch.issue_date {
            membership.issue_date = issue_date;
        }
        if let Some(book_limit) = patch.book_limit {
            membership.book_limit = book_limit;
        }
        Ok(membership.clone())
    }

    async fn delete_library_membership(&self, student_id: &str) -> Result<()> {
        let mut t = self.tables.write().await;
        let idx = t
            .memberships
            .iter()
            .position(|m| m.student_id == student_id)
            .ok_or(StoreError::NotFound)?;
        t.memberships.remove(idx);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
