//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (DB ping)
//!
//! # Content (JSON CRUD; lists order by created_at DESC)
//! GET|POST          /api/blog           GET|PATCH|DELETE /api/blog/{id}
//! GET|POST          /api/courses        GET|PATCH|DELETE /api/courses/{id}
//! GET|POST          /api/gallery        GET|PATCH|DELETE /api/gallery/{id}
//! GET|POST          /api/portfolio      GET|PATCH|DELETE /api/portfolio/{id}
//! GET|POST          /api/testimonials   GET|PATCH|DELETE /api/testimonials/{id}
//! GET|POST          /api/registrations  GET|PATCH|DELETE /api/registrations/{id}
//! GET|POST          /api/schedules      GET|PATCH|DELETE /api/schedules/{id}
//!
//! # Portal lifecycle ({portal} = admin | franchise | staff)
//! POST /api/{portal}/signup             - Create pending account + send link
//! POST /api/{portal}/verify-email       - Redeem token (JSON)
//! POST /api/{portal}/send-verification  - Re-issue token for pending account
//! GET  /{portal}/verify-email?token=... - Emailed link target (redirects)
//! GET  /api/{portal}/accounts           - List accounts (?status=...)
//! PATCH /api/{portal}/accounts/{id}     - Manual status/approval transition
//! POST /api/admin/accounts/{id}/elevate - Admin role elevation
//!
//! # Reminders
//! POST /api/reminders/run               - Scheduler-triggered scan
//! ```

pub mod blog;
pub mod courses;
pub mod gallery;
pub mod portal;
pub mod portfolio;
pub mod registrations;
pub mod reminders;
pub mod schedules;
pub mod testimonials;

use axum::Router;

use crate::state::AppState;

/// Compose all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(blog::router())
        .merge(courses::router())
        .merge(gallery::router())
        .merge(portfolio::router())
        .merge(testimonials::router())
        .merge(registrations::router())
        .merge(schedules::router())
        .merge(portal::router())
        .merge(reminders::router())
}
