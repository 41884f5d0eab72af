//! Public-site content entities and their typed mutation payloads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use brightclass_core::{
    BlogPostId, BlogStatus, CourseId, CourseStatus, GalleryImageId, GalleryStatus, PortfolioItemId,
    PortfolioStatus, RegistrationId, RegistrationStatus, TestimonialId, TestimonialStatus,
};

// =============================================================================
// Blog
// =============================================================================

/// A blog post.
#[derive(Debug, Clone, Serialize)]
pub struct BlogPost {
    pub id: BlogPostId,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub cover_image_url: Option<String>,
    pub category: Option<String>,
    pub status: BlogStatus,
    /// Stamped exactly once, when the post first transitions to `published`.
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a blog post.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBlogPost {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    pub body: String,
    pub cover_image_url: Option<String>,
    pub category: Option<String>,
    pub status: Option<BlogStatus>,
}

/// Partial update payload for a blog post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPostUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub cover_image_url: Option<String>,
    pub category: Option<String>,
    pub status: Option<BlogStatus>,
}

/// Decide the `published_at` value to store for a blog post update.
///
/// The timestamp is written exactly once: when the effective status is
/// `published` and no timestamp exists yet. It is never cleared or
/// rewritten by later updates.
#[must_use]
pub fn stamp_published_at(
    effective_status: BlogStatus,
    existing: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (effective_status, existing) {
        (BlogStatus::Published, None) => Some(now),
        (_, existing) => existing,
    }
}

// =============================================================================
// Courses
// =============================================================================

/// A course offering.
#[derive(Debug, Clone, Serialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub duration_weeks: i32,
    pub level: String,
    pub status: CourseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a course.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub duration_weeks: i32,
    pub level: String,
    pub status: Option<CourseStatus>,
}

/// Partial update payload for a course.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub duration_weeks: Option<i32>,
    pub level: Option<String>,
    pub status: Option<CourseStatus>,
}

// =============================================================================
// Gallery
// =============================================================================

/// An image in the public gallery.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryImage {
    pub id: GalleryImageId,
    pub title: String,
    pub image_url: String,
    pub caption: Option<String>,
    pub status: GalleryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a gallery image.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGalleryImage {
    pub title: String,
    pub image_url: String,
    pub caption: Option<String>,
    pub status: Option<GalleryStatus>,
}

/// Partial update payload for a gallery image.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryImageUpdate {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub caption: Option<String>,
    pub status: Option<GalleryStatus>,
}

// =============================================================================
// Portfolio
// =============================================================================

/// A portfolio entry (past engagement or project).
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioItem {
    pub id: PortfolioItemId,
    pub title: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub client_name: Option<String>,
    pub status: PortfolioStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a portfolio item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPortfolioItem {
    pub title: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub client_name: Option<String>,
    pub status: Option<PortfolioStatus>,
}

/// Partial update payload for a portfolio item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortfolioItemUpdate {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub client_name: Option<String>,
    pub status: Option<PortfolioStatus>,
}

// =============================================================================
// Testimonials
// =============================================================================

/// A testimonial awaiting moderation or published on the site.
#[derive(Debug, Clone, Serialize)]
pub struct Testimonial {
    pub id: TestimonialId,
    pub author_name: String,
    pub author_role: Option<String>,
    pub quote: String,
    pub rating: Option<i32>,
    pub status: TestimonialStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a testimonial.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTestimonial {
    pub author_name: String,
    pub author_role: Option<String>,
    pub quote: String,
    pub rating: Option<i32>,
    pub status: Option<TestimonialStatus>,
}

/// Partial update payload for a testimonial.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestimonialUpdate {
    pub author_name: Option<String>,
    pub author_role: Option<String>,
    pub quote: Option<String>,
    pub rating: Option<i32>,
    pub status: Option<TestimonialStatus>,
}

// =============================================================================
// Registrations
// =============================================================================

/// A course-interest registration submitted from the public site.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub course_id: Option<CourseId>,
    pub student_name: String,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub email: String,
    pub message: Option<String>,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a registration.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRegistration {
    pub course_id: Option<CourseId>,
    pub student_name: String,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub email: String,
    pub message: Option<String>,
}

/// Partial update payload for a registration (follow-up state).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationUpdate {
    pub student_name: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub message: Option<String>,
    pub status: Option<RegistrationStatus>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_published_at_stamped_on_first_publish() {
        let now = Utc::now();
        let stamped = stamp_published_at(BlogStatus::Published, None, now);
        assert_eq!(stamped, Some(now));
    }

    #[test]
    fn test_published_at_not_rewritten_when_already_set() {
        let first = Utc::now() - Duration::days(3);
        let now = Utc::now();
        let stamped = stamp_published_at(BlogStatus::Published, Some(first), now);
        assert_eq!(stamped, Some(first));
    }

    #[test]
    fn test_published_at_untouched_for_drafts() {
        let now = Utc::now();
        assert_eq!(stamp_published_at(BlogStatus::Draft, None, now), None);

        // Archiving a previously published post keeps the original stamp
        let first = now - Duration::days(1);
        assert_eq!(
            stamp_published_at(BlogStatus::Archived, Some(first), now),
            Some(first)
        );
    }
}
