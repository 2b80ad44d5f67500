//! HTTP handlers for students, professors and library memberships.

pub mod memberships;
pub mod professors;
pub mod students;
