//! Student, professor and library membership routes.
//! Static segments (`/students/enriched`) take precedence over `/:student_id`.

use crate::handlers::{memberships, professors, students};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn campus_routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(students::list).post(students::create))
        .route("/students/enriched", get(students::list_enriched))
        .route(
            "/students/:student_id",
            get(students::read).patch(students::update).delete(students::delete),
        )
        .route(
            "/students/:student_id/library-membership",
            get(memberships::read)
                .post(memberships::create)
                .patch(memberships::update)
                .delete(memberships::delete),
        )
        .route("/professors", get(professors::list).post(professors::create))
        .route(
            "/professors/:professor_id",
            get(professors::read).patch(professors::update).delete(professors::delete),
        )
        .route(
            "/professors/:professor_id/proctorships",
            get(professors::list_proctorships).post(professors::assign_proctor),
        )
}
