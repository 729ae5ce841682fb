//! Public pages, forms and admin workflows served against the mock API.
//!
//! Run with: cargo test -p afritheatre-integration-tests

use afritheatre_integration_tests::{
    ADMIN_EMAIL, MockApi, PASSWORD, TestSite, USER_EMAIL, browser, location, sign_in,
};
use reqwest::StatusCode;

async fn setup() -> (MockApi, TestSite) {
    let api = MockApi::seeded().spawn().await;
    let site = TestSite::spawn(&api.url).await;
    (api.api, site)
}

async fn page(client: &reqwest::Client, site: &TestSite, path: &str) -> String {
    let resp = client.get(site.url(path)).send().await.expect("GET");
    assert_eq!(resp.status(), StatusCode::OK, "{path}");
    resp.text().await.expect("body")
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_and_readiness() {
    let (_api, site) = setup().await;
    let client = browser();

    let resp = client.get(site.url("/health")).send().await.expect("GET");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client.get(site.url("/health/ready")).send().await.expect("GET");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_fails_without_api() {
    let site = TestSite::spawn("http://127.0.0.1:1").await;

    let resp = browser()
        .get(site.url("/health/ready"))
        .send()
        .await
        .expect("GET");

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_security_headers_present() {
    let (_api, site) = setup().await;

    let resp = browser().get(site.url("/")).send().await.expect("GET");

    assert!(resp.headers().contains_key("content-security-policy"));
    assert_eq!(
        resp.headers()
            .get("x-content-type-options")
            .and_then(|v| v.to_str().ok()),
        Some("nosniff")
    );
    assert!(resp.headers().contains_key("x-request-id"));
}

// ============================================================================
// Public pages
// ============================================================================

#[tokio::test]
async fn test_home_shows_live_figures() {
    let (_api, site) = setup().await;

    let body = page(&browser(), &site, "/").await;

    assert!(body.contains("Venues Registered"));
    assert!(!body.contains("showing sample data"));
    assert!(body.contains("Latest Events"));
    assert!(body.contains("Lake Stories"));
    assert!(body.contains("Free Resources to Download"));
}

#[tokio::test]
async fn test_home_falls_back_when_api_is_down() {
    let site = TestSite::spawn("http://127.0.0.1:1").await;

    let body = page(&browser(), &site, "/").await;

    assert!(body.contains("showing sample data"));
    assert!(body.contains("Fallback Performance"));
}

#[tokio::test]
async fn test_events_filters() {
    let (_api, site) = setup().await;
    let client = browser();

    let all = page(&client, &site, "/events").await;
    assert!(all.contains("River Between"));
    assert!(all.contains("Lake Stories"));

    let by_location = page(&client, &site, "/events?location=kisumu").await;
    assert!(!by_location.contains("River Between"));
    assert!(by_location.contains("Lake Stories"));

    let by_date = page(&client, &site, "/events?date=2024-03-09").await;
    assert!(by_date.contains("River Between"));
    assert!(!by_date.contains("Lake Stories"));
}

#[tokio::test]
async fn test_venues_page_lists_public_venues() {
    let (_api, site) = setup().await;

    let body = page(&browser(), &site, "/venues").await;

    assert!(body.contains("Kenya National Theatre"));
    assert!(body.contains("Kisumu Players Hall"));
}

#[tokio::test]
async fn test_unknown_page_is_404() {
    let (_api, site) = setup().await;

    let resp = browser().get(site.url("/no-such-page")).send().await.expect("GET");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Forms
// ============================================================================

#[tokio::test]
async fn test_contact_form_validation_and_success() {
    let (_api, site) = setup().await;
    let client = browser();

    let resp = client
        .post(site.url("/contact"))
        .form(&[
            ("firstname", "Wanjiku"),
            ("lastname", ""),
            ("email", "not-an-email"),
            ("subject", "Hello"),
            ("message", "hi"),
        ])
        .send()
        .await
        .expect("POST");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("field-error"));

    let resp = client
        .post(site.url("/contact"))
        .form(&[
            ("firstname", "Wanjiku"),
            ("lastname", "Kamau"),
            ("email", "wanjiku@example.com"),
            ("subject", "Partnership"),
            ("message", "We would like to share our data."),
        ])
        .send()
        .await
        .expect("POST");
    assert!(location(&resp).starts_with("/contact?success="));
}

#[tokio::test]
async fn test_sign_up_then_sign_in() {
    let (api, site) = setup().await;
    let client = browser();

    let resp = client
        .post(site.url("/sign-up"))
        .form(&[
            ("name", "Njeri"),
            ("email", "njeri@example.com"),
            ("phone", "0700000000"),
            ("password", PASSWORD),
            ("confirm_password", PASSWORD),
        ])
        .send()
        .await
        .expect("POST");
    assert!(location(&resp).starts_with("/login?success="));
    assert!(api.token_of("njeri@example.com").is_some());

    let resp = sign_in(&client, &site, "njeri@example.com").await;
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn test_sign_up_rejects_mismatched_passwords() {
    let (api, site) = setup().await;

    let resp = browser()
        .post(site.url("/sign-up"))
        .form(&[
            ("name", "Njeri"),
            ("email", "njeri@example.com"),
            ("password", "secret123"),
            ("confirm_password", "secret124"),
        ])
        .send()
        .await
        .expect("POST");

    assert!(location(&resp).starts_with("/sign-up?error=Passwords%20do%20not%20match"));
    assert!(api.token_of("njeri@example.com").is_none());
}

#[tokio::test]
async fn test_data_collection_submission() {
    let (api, site) = setup().await;
    let client = browser();
    sign_in(&client, &site, USER_EMAIL).await;

    let form = page(&client, &site, "/data-collection").await;
    assert!(form.contains("Kenya National Theatre"));

    let resp = client
        .post(site.url("/data-collection"))
        .form(&[
            ("company_name", "Mombasa Arts"),
            ("event_name", "Tides"),
            ("contact_person", "Halima"),
            ("county", "Mombasa"),
            ("jobs_created", "7"),
            ("payment_methods", "M-Pesa, Cash"),
        ])
        .send()
        .await
        .expect("POST");

    assert!(location(&resp).starts_with("/data-collection?success="));
    assert!(api.activity_names().contains(&"Tides".to_string()));
}

// ============================================================================
// Admin dashboard
// ============================================================================

#[tokio::test]
async fn test_admin_tables_search() {
    let (_api, site) = setup().await;
    let client = browser();
    sign_in(&client, &site, ADMIN_EMAIL).await;

    let users = page(&client, &site, "/dashboard/users?q=bo").await;
    assert!(users.contains("Bo Otieno"));
    assert!(!users.contains("asha@afritheatre.test</td>"));
    assert!(users.contains("Showing 1 of 1"));

    let activities = page(&client, &site, "/dashboard/activities").await;
    assert!(activities.contains("Heartstrings Ensemble"));
}

#[tokio::test]
async fn test_admin_creates_venue() {
    let (api, site) = setup().await;
    let client = browser();
    sign_in(&client, &site, ADMIN_EMAIL).await;

    let resp = client
        .post(site.url("/dashboard/venues"))
        .form(&[
            ("name", "Alliance Française"),
            ("county", "Nairobi"),
            ("sub_county", "Starehe"),
            ("area", "CBD"),
            ("capacity", "220"),
            ("map_link", ""),
            ("image_url", ""),
        ])
        .send()
        .await
        .expect("POST");

    assert!(location(&resp).starts_with("/dashboard/venues?success="));
    assert!(api.venue_names().contains(&"Alliance Française".to_string()));
}

#[tokio::test]
async fn test_venue_form_rejects_bad_capacity() {
    let (api, site) = setup().await;
    let client = browser();
    sign_in(&client, &site, ADMIN_EMAIL).await;

    let resp = client
        .post(site.url("/dashboard/venues"))
        .form(&[("name", "Hall"), ("county", "Nakuru"), ("capacity", "lots")])
        .send()
        .await
        .expect("POST");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.expect("body").contains("field-error"));
    assert!(!api.venue_names().contains(&"Hall".to_string()));
}

#[tokio::test]
async fn test_admin_edits_and_deletes_user() {
    let (api, site) = setup().await;
    let client = browser();
    sign_in(&client, &site, ADMIN_EMAIL).await;
    let id = api
        .user(USER_EMAIL)
        .and_then(|u| u.id)
        .expect("seeded user has an id");
    let path = format!("/dashboard/users/{id}");

    let edit = page(&client, &site, &path).await;
    assert!(edit.contains(r#"value="Bo Otieno""#));

    let resp = client
        .post(site.url(&path))
        .form(&[
            ("name", "Bo Otieno-Mwangi"),
            ("email", USER_EMAIL),
            ("phone", "+254700000001"),
            ("role", "admin"),
        ])
        .send()
        .await
        .expect("POST");
    assert!(location(&resp).starts_with("/dashboard/users?success="));
    let updated = api.user(USER_EMAIL).expect("still there");
    assert_eq!(updated.name, "Bo Otieno-Mwangi");
    assert!(updated.is_admin());

    let resp = client
        .post(site.url(&format!("{path}/delete")))
        .send()
        .await
        .expect("POST");
    assert!(location(&resp).starts_with("/dashboard/users?success="));
    assert!(api.user(USER_EMAIL).is_none());
}

#[tokio::test]
async fn test_user_edit_rejects_invalid_email() {
    let (api, site) = setup().await;
    let client = browser();
    sign_in(&client, &site, ADMIN_EMAIL).await;
    let id = api.user(USER_EMAIL).and_then(|u| u.id).expect("id");

    let resp = client
        .post(site.url(&format!("/dashboard/users/{id}")))
        .form(&[("name", "Bo"), ("email", "not-an-email"), ("role", "user")])
        .send()
        .await
        .expect("POST");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.expect("body").contains("field-error"));
    assert_eq!(api.user(USER_EMAIL).map(|u| u.name).as_deref(), Some("Bo Otieno"));
}

#[tokio::test]
async fn test_admin_views_edits_and_deletes_venue() {
    let (api, site) = setup().await;
    let client = browser();
    sign_in(&client, &site, ADMIN_EMAIL).await;
    let id = api.venue_id("Kisumu Players Hall").expect("seeded venue");
    let path = format!("/dashboard/venues/{id}");

    let show = page(&client, &site, &path).await;
    assert!(show.contains("Kisumu Players Hall"));
    assert!(show.contains("120"));

    let edit = page(&client, &site, &format!("{path}/edit")).await;
    assert!(edit.contains(r#"value="Kisumu Players Hall""#));

    let resp = client
        .post(site.url(&path))
        .form(&[
            ("name", "Kisumu Players Hall"),
            ("county", "Kisumu"),
            ("sub_county", "Kisumu Central"),
            ("area", "Milimani"),
            ("capacity", "180 seats"),
            ("map_link", ""),
            ("image_url", "https://images.afritheatre.test/hall.png"),
        ])
        .send()
        .await
        .expect("POST");
    assert!(location(&resp).starts_with("/dashboard/venues?success="));
    let venue = api.venue(&id).expect("venue kept");
    assert_eq!(venue.capacity, Some(180));
    assert_eq!(venue.area.as_deref(), Some("Milimani"));
    assert_eq!(
        venue.image_url.as_deref(),
        Some("https://images.afritheatre.test/hall.png")
    );

    let resp = client
        .post(site.url(&format!("{path}/delete")))
        .send()
        .await
        .expect("POST");
    assert!(location(&resp).starts_with("/dashboard/venues?success="));
    assert!(api.venue(&id).is_none());
}

#[tokio::test]
async fn test_missing_venue_is_404() {
    let (_api, site) = setup().await;
    let client = browser();
    sign_in(&client, &site, ADMIN_EMAIL).await;

    let resp = client
        .get(site.url("/dashboard/venues/v9999"))
        .send()
        .await
        .expect("GET");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_views_edits_and_deletes_activity() {
    let (api, site) = setup().await;
    let client = browser();
    sign_in(&client, &site, ADMIN_EMAIL).await;
    let id = api.activity_id("Lake Stories").expect("seeded activity");
    let path = format!("/dashboard/activities/{id}");

    let show = page(&client, &site, &path).await;
    assert!(show.contains("Lake Stories"));
    assert!(show.contains("Kisumu Players"));

    let edit = page(&client, &site, &format!("{path}/edit")).await;
    assert!(edit.contains(r#"value="Lake Stories""#));

    let resp = client
        .post(site.url(&path))
        .form(&[
            ("company_name", "Kisumu Players"),
            ("event_name", "Lake Stories Revisited"),
            ("contact_person", "Stage Manager"),
            ("county", "Kisumu"),
            ("jobs_created", "20"),
            ("payment_methods", "M-Pesa"),
        ])
        .send()
        .await
        .expect("POST");
    assert!(location(&resp).starts_with("/dashboard/activities?success="));
    let activity = api.activity(&id).expect("activity kept");
    assert_eq!(activity.event_name, "Lake Stories Revisited");
    assert_eq!(activity.jobs_created, "20");
    assert_eq!(activity.payment_methods, vec!["M-Pesa".to_string()]);

    let resp = client
        .post(site.url(&format!("{path}/delete")))
        .send()
        .await
        .expect("POST");
    assert!(location(&resp).starts_with("/dashboard/activities?success="));
    assert!(api.activity(&id).is_none());
}

#[tokio::test]
async fn test_activity_edit_requires_core_fields() {
    let (api, site) = setup().await;
    let client = browser();
    sign_in(&client, &site, ADMIN_EMAIL).await;
    let id = api.activity_id("River Between").expect("seeded activity");

    let resp = client
        .post(site.url(&format!("/dashboard/activities/{id}")))
        .form(&[("company_name", ""), ("event_name", "River Between")])
        .send()
        .await
        .expect("POST");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.expect("body").contains("field-error"));
    assert_eq!(
        api.activity(&id).map(|a| a.company_name).as_deref(),
        Some("Heartstrings Ensemble")
    );
}

// ============================================================================
// Upload
// ============================================================================

#[tokio::test]
async fn test_signed_in_upload_returns_url() {
    let (api, site) = setup().await;
    let client = browser();
    sign_in(&client, &site, ADMIN_EMAIL).await;

    let part = reqwest::multipart::Part::bytes(vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3])
        .file_name("poster.png")
        .mime_str("image/png")
        .expect("mime");
    let resp = client
        .post(site.url("/upload"))
        .multipart(reqwest::multipart::Form::new().part("file", part))
        .send()
        .await
        .expect("POST");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.expect("json");
    assert_eq!(body["url"], "https://images.afritheatre.test/poster.png");
    assert_eq!(api.uploads(), vec!["poster.png".to_string()]);
}

#[tokio::test]
async fn test_upload_refuses_non_images() {
    let (api, site) = setup().await;
    let client = browser();
    sign_in(&client, &site, USER_EMAIL).await;

    let part = reqwest::multipart::Part::bytes(b"hello".to_vec())
        .file_name("notes.txt")
        .mime_str("text/plain")
        .expect("mime");
    let resp = client
        .post(site.url("/upload"))
        .multipart(reqwest::multipart::Form::new().part("file", part))
        .send()
        .await
        .expect("POST");

    assert!(resp.status().is_client_error());
    assert!(api.uploads().is_empty());
}
