//! Integration tests for the content CRUD endpoints.
//!
//! These tests require a running server and applied migrations.
//!
//! Run with: `cargo test -p brightclass-integration-tests -- --ignored`

use reqwest::StatusCode;
use serde_json::{Value, json};

use brightclass_integration_tests::{TestContext, unique_email};

fn unique_slug(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("{prefix}-{nanos:x}")
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_blog_post_published_at_stamped_once() {
    let ctx = TestContext::new();
    let slug = unique_slug("launch-post");

    // Create a draft: no published_at
    let created = ctx
        .client
        .post(ctx.url("/api/blog"))
        .json(&json!({
            "title": "Our new Lagos campus",
            "slug": slug,
            "body": "We are opening a new campus.",
            "category": "news"
        }))
        .send()
        .await
        .expect("create failed");
    assert_eq!(created.status(), StatusCode::CREATED);
    let post: Value = created.json().await.expect("invalid JSON");
    assert_eq!(post["status"], "draft");
    assert!(post["published_at"].is_null());
    let id = post["id"].as_i64().expect("missing id");

    // Publish: published_at gets stamped
    let published = ctx
        .client
        .patch(ctx.url(&format!("/api/blog/{id}")))
        .json(&json!({ "status": "published" }))
        .send()
        .await
        .expect("publish failed");
    assert_eq!(published.status(), StatusCode::OK);
    let post: Value = published.json().await.expect("invalid JSON");
    let first_stamp = post["published_at"]
        .as_str()
        .expect("published_at not set")
        .to_owned();

    // A later edit that keeps the post published must not move the stamp
    let edited = ctx
        .client
        .patch(ctx.url(&format!("/api/blog/{id}")))
        .json(&json!({ "excerpt": "Updated excerpt", "status": "published" }))
        .send()
        .await
        .expect("edit failed");
    let post: Value = edited.json().await.expect("invalid JSON");
    assert_eq!(post["published_at"].as_str(), Some(first_stamp.as_str()));

    // Cleanup
    let deleted = ctx
        .client
        .delete(ctx.url(&format!("/api/blog/{id}")))
        .send()
        .await
        .expect("delete failed");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_blog_list_filters_by_status() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(ctx.url("/api/blog?status=published"))
        .send()
        .await
        .expect("list failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let posts: Vec<Value> = resp.json().await.expect("invalid JSON");
    assert!(posts.iter().all(|p| p["status"] == "published"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_registration_flow() {
    let ctx = TestContext::new();
    let email = unique_email("guardian");

    let created = ctx
        .client
        .post(ctx.url("/api/registrations"))
        .json(&json!({
            "student_name": "Chidi Okafor",
            "guardian_name": "Mrs Okafor",
            "guardian_phone": "08012345678",
            "email": email,
            "message": "Interested in the JSS2 maths course"
        }))
        .send()
        .await
        .expect("create failed");
    assert_eq!(created.status(), StatusCode::CREATED);
    let registration: Value = created.json().await.expect("invalid JSON");
    assert_eq!(registration["status"], "new");
    let id = registration["id"].as_i64().expect("missing id");

    // Operator follow-up transition
    let updated = ctx
        .client
        .patch(ctx.url(&format!("/api/registrations/{id}")))
        .json(&json!({ "status": "contacted" }))
        .send()
        .await
        .expect("update failed");
    assert_eq!(updated.status(), StatusCode::OK);
    let registration: Value = updated.json().await.expect("invalid JSON");
    assert_eq!(registration["status"], "contacted");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_testimonial_rating_validation() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .post(ctx.url("/api/testimonials"))
        .json(&json!({
            "author_name": "Happy Parent",
            "quote": "Great tutors!",
            "rating": 9
        }))
        .send()
        .await
        .expect("create failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_missing_entity_is_404() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(ctx.url("/api/courses/999999999"))
        .send()
        .await
        .expect("get failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
