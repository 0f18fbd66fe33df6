//! Integration specifications for the SME directory: the search engine over
//! subscription snapshots and the HTTP search endpoint.

use std::sync::Arc;

use axum::body::to_bytes;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::util::ServiceExt;

use skillbridge::workflows::directory::{
    directory_router, profile_feed, Availability, DirectoryError, DirectorySearch,
    ProfileDirectory, SearchFilters, SmeProfile,
};

fn expert(id: &str, name: &str, roles: &[&str], availability: Availability) -> SmeProfile {
    SmeProfile {
        id: id.to_string(),
        name: name.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        specializations: vec!["Skills Development Facilitation".to_string()],
        sectors: vec!["CETA".to_string()],
        location: "Gauteng".to_string(),
        rating: 4.2,
        review_count: 8,
        availability,
        verified: true,
        ..SmeProfile::default()
    }
}

fn seeded_profiles() -> Vec<SmeProfile> {
    vec![
        expert("sme-1", "Thabo Nkosi", &["Assessor"], Availability::Available),
        expert("sme-2", "Lerato Molefe", &["Moderator"], Availability::Busy),
        expert("sme-3", "Anita van Wyk", &["Assessor", "Facilitator"], Availability::Available),
    ]
}

struct StaticDirectory(Vec<SmeProfile>);

impl ProfileDirectory for StaticDirectory {
    fn snapshot(&self) -> Result<Vec<SmeProfile>, DirectoryError> {
        Ok(self.0.clone())
    }
}

struct OfflineDirectory;

impl ProfileDirectory for OfflineDirectory {
    fn snapshot(&self) -> Result<Vec<SmeProfile>, DirectoryError> {
        Err(DirectoryError::Unavailable("subscription closed".to_string()))
    }
}

#[test]
fn availability_filter_yields_exactly_the_matching_profiles_in_order() {
    let mut search = DirectorySearch::with_candidates(seeded_profiles());
    search.set_filters(SearchFilters {
        availability: Some(Availability::Available),
        ..SearchFilters::default()
    });

    let ids: Vec<&str> = search.results().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["sme-1", "sme-3"]);
}

#[test]
fn feed_snapshots_drive_the_engine() {
    let (handle, feed) = profile_feed(seeded_profiles());

    let mut search = DirectorySearch::with_candidates(feed.latest());
    assert_eq!(search.results().len(), 3);

    handle.publish(vec![expert(
        "sme-9",
        "Sipho Dube",
        &["Facilitator"],
        Availability::Away,
    )]);
    search.set_candidates(feed.latest());

    let ids: Vec<&str> = search.results().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["sme-9"]);
}

#[tokio::test]
async fn search_endpoint_applies_conjunctive_filters() {
    let router = directory_router(Arc::new(StaticDirectory(seeded_profiles())));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/experts?q=assessor&availability=Available&location=Gauteng")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), 64 * 1024).await.expect("read body");
    let body: Value = serde_json::from_slice(&body).expect("json payload");

    assert_eq!(body["total"], 2);
    let names: Vec<&str> = body["experts"]
        .as_array()
        .expect("experts array")
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, ["Thabo Nkosi", "Anita van Wyk"]);
}

#[tokio::test]
async fn search_endpoint_without_params_returns_everyone() {
    let router = directory_router(Arc::new(StaticDirectory(seeded_profiles())));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/experts")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), 64 * 1024).await.expect("read body");
    let body: Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn search_endpoint_reports_directory_outage() {
    let router = directory_router(Arc::new(OfflineDirectory));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/experts")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
