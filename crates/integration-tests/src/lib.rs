//! Integration test harness for the Afritheatre site.
//!
//! Nothing here needs external services. [`MockApi`] is an in-memory axum
//! stand-in for the remote Afritheatre API and [`TestSite`] serves the real
//! site router on an ephemeral port pointed at it.
//!
//! # Example
//!
//! ```rust,ignore
//! let api = MockApi::seeded().spawn().await;
//! let site = TestSite::spawn(&api.url).await;
//! let client = browser();
//! let resp = client.get(site.url("/")).send().await.unwrap();
//! assert_eq!(resp.status(), 200);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use afritheatre_core::{ActivityId, Email, Role, UserId, UserRecord, VenueId};
use afritheatre_site::api::{TheatreActivity, UserUpdate, Venue};
use afritheatre_site::config::{ApiConfig, SiteConfig};
use afritheatre_site::state::AppState;
use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;

/// Password of every seeded account.
pub const PASSWORD: &str = "secret123";
/// Seeded admin account.
pub const ADMIN_EMAIL: &str = "asha@afritheatre.test";
/// Seeded regular account.
pub const USER_EMAIL: &str = "bo@afritheatre.test";

/// One account known to the mock API.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: UserRecord,
    pub password: String,
    pub token: String,
}

/// How `/api/auth/me` answers a valid token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentityMode {
    /// The account's user record.
    #[default]
    Normal,
    /// 200 with a body that is not JSON.
    Garbage,
    /// The given status with an error message.
    Status(u16),
}

#[derive(Debug, Default)]
struct MockData {
    accounts: Vec<Account>,
    venues: Vec<Venue>,
    activities: Vec<TheatreActivity>,
    next_id: usize,
    me_calls: usize,
    me_delay: Option<Duration>,
    me_mode: IdentityMode,
    uploads: Vec<String>,
}

impl MockData {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{:04}", self.next_id)
    }

    fn account_for(&self, headers: &HeaderMap) -> Option<&Account> {
        let token = headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        self.accounts.iter().find(|a| a.token == token)
    }
}

/// In-memory stand-in for the Afritheatre REST API.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    data: Arc<Mutex<MockData>>,
}

/// A running [`MockApi`].
#[derive(Debug, Clone)]
pub struct RunningApi {
    pub url: String,
    pub api: MockApi,
}

impl MockApi {
    /// Mock with one admin, one regular user, two venues and two activities.
    #[must_use]
    pub fn seeded() -> Self {
        let mock = Self::default();
        mock.add_account("Asha Wanjiru", ADMIN_EMAIL, Some(Role::Admin));
        mock.add_account("Bo Otieno", USER_EMAIL, Some(Role::User));
        {
            let mut data = mock.lock();
            let id = data.next_id("v");
            data.venues.push(Venue {
                id: Some(VenueId::new(id)),
                county: "Nairobi".to_string(),
                sub_county: Some("Starehe".to_string()),
                area: Some("CBD".to_string()),
                name: "Kenya National Theatre".to_string(),
                capacity: Some(350),
                ..Venue::default()
            });
            let id = data.next_id("v");
            data.venues.push(Venue {
                id: Some(VenueId::new(id)),
                county: "Kisumu".to_string(),
                name: "Kisumu Players Hall".to_string(),
                capacity: Some(120),
                ..Venue::default()
            });
            for (event, company, county, date) in [
                ("River Between", "Heartstrings Ensemble", "Nairobi", "2024-03-09"),
                ("Lake Stories", "Kisumu Players", "Kisumu", "2024-04-20"),
            ] {
                let id = data.next_id("a");
                data.activities.push(TheatreActivity {
                    id: Some(ActivityId::new(id)),
                    event_name: event.to_string(),
                    company_name: company.to_string(),
                    county: county.to_string(),
                    date: date.to_string(),
                    jobs_created: "12".to_string(),
                    contact_person: "Stage Manager".to_string(),
                    ..TheatreActivity::default()
                });
            }
        }
        mock
    }

    fn lock(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().expect("mock API state poisoned")
    }

    /// Register an account directly and return its token.
    pub fn add_account(&self, name: &str, email: &str, role: Option<Role>) -> String {
        let mut data = self.lock();
        let id = data.next_id("u");
        let token = format!("tok-{id}");
        let mut user = UserRecord::new(
            name.to_string(),
            Email::parse(email).expect("test email is valid"),
        );
        user.id = Some(UserId::new(id));
        user.role = role;
        user.created_at = Some("2024-03-01T09:30:00.000Z".to_string());
        data.accounts.push(Account {
            user,
            password: PASSWORD.to_string(),
            token: token.clone(),
        });
        token
    }

    /// Invalidate every token issued to `email`, as an expiry would.
    pub fn revoke(&self, email: &str) {
        let mut data = self.lock();
        for account in data.accounts.iter_mut().filter(|a| a.user.email.as_str() == email) {
            account.token = format!("revoked-{}", account.token);
        }
    }

    /// Delay every `/api/auth/me` answer.
    pub fn slow_identity(&self, delay: Duration) {
        self.lock().me_delay = Some(delay);
    }

    /// Change how `/api/auth/me` answers.
    pub fn identity_mode(&self, mode: IdentityMode) {
        self.lock().me_mode = mode;
    }

    /// Number of identity checks served so far.
    #[must_use]
    pub fn me_calls(&self) -> usize {
        self.lock().me_calls
    }

    /// Current token of `email`, if the account exists.
    #[must_use]
    pub fn token_of(&self, email: &str) -> Option<String> {
        self.lock()
            .accounts
            .iter()
            .find(|a| a.user.email.as_str() == email)
            .map(|a| a.token.clone())
    }

    /// Names of all venues.
    #[must_use]
    pub fn venue_names(&self) -> Vec<String> {
        self.lock().venues.iter().map(|v| v.name.clone()).collect()
    }

    /// Event names of all activities.
    #[must_use]
    pub fn activity_names(&self) -> Vec<String> {
        self.lock()
            .activities
            .iter()
            .map(|a| a.event_name.clone())
            .collect()
    }

    /// Id of the venue called `name`.
    #[must_use]
    pub fn venue_id(&self, name: &str) -> Option<String> {
        self.lock()
            .venues
            .iter()
            .find(|v| v.name == name)
            .and_then(|v| v.id.as_ref().map(|id| id.as_str().to_string()))
    }

    /// Id of the activity whose event is `event_name`.
    #[must_use]
    pub fn activity_id(&self, event_name: &str) -> Option<String> {
        self.lock()
            .activities
            .iter()
            .find(|a| a.event_name == event_name)
            .and_then(|a| a.id.as_ref().map(|id| id.as_str().to_string()))
    }

    /// Venue with the given id.
    #[must_use]
    pub fn venue(&self, id: &str) -> Option<Venue> {
        self.lock()
            .venues
            .iter()
            .find(|v| v.id.as_ref().is_some_and(|vid| vid.as_str() == id))
            .cloned()
    }

    /// Activity with the given id.
    #[must_use]
    pub fn activity(&self, id: &str) -> Option<TheatreActivity> {
        self.lock()
            .activities
            .iter()
            .find(|a| a.id.as_ref().is_some_and(|aid| aid.as_str() == id))
            .cloned()
    }

    /// Account with the given email.
    #[must_use]
    pub fn user(&self, email: &str) -> Option<UserRecord> {
        self.lock()
            .accounts
            .iter()
            .find(|a| a.user.email.as_str() == email)
            .map(|a| a.user.clone())
    }

    /// File names received by the upload endpoint.
    #[must_use]
    pub fn uploads(&self) -> Vec<String> {
        self.lock().uploads.clone()
    }

    /// The mock's router.
    pub fn router(self) -> Router {
        Router::new()
            .route("/", get(|| async { "Afritheatre API" }))
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/me", get(me))
            .route("/api/auth/users", get(list_users))
            .route(
                "/api/auth/users/{id}",
                get(get_user).put(update_user).delete(delete_user),
            )
            .route("/api/venues", get(list_venues).post(create_venue))
            .route("/api/venues/public", get(list_venues_public))
            .route(
                "/api/venues/{id}",
                get(get_venue).put(update_venue).delete(delete_venue),
            )
            .route("/api/theatre-activities", get(list_activities))
            .route("/api/theatre-activities/public", get(list_activities_public))
            .route(
                "/api/theatre-activities/{id}",
                get(get_activity).put(update_activity).delete(delete_activity),
            )
            .route("/api/theatre/submit", post(submit_activity))
            .route("/api/upload", post(upload))
            .with_state(self)
    }

    /// Serve on an ephemeral port.
    pub async fn spawn(self) -> RunningApi {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API");
        let addr = listener.local_addr().expect("mock API has an address");
        let router = self.clone().router();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock API crashed");
        });
        RunningApi {
            url: format!("http://{addr}"),
            api: self,
        }
    }
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn require_admin(data: &MockData, headers: &HeaderMap) -> Result<(), Response> {
    match data.account_for(headers) {
        Some(account) if account.user.is_admin() => Ok(()),
        Some(_) => Err(message(StatusCode::FORBIDDEN, "Admin access required")),
        None => Err(message(StatusCode::UNAUTHORIZED, "Not authorized")),
    }
}

fn require_user(data: &MockData, headers: &HeaderMap) -> Result<(), Response> {
    data.account_for(headers)
        .map(|_| ())
        .ok_or_else(|| message(StatusCode::UNAUTHORIZED, "Not authorized"))
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login(State(mock): State<MockApi>, Json(body): Json<Credentials>) -> Response {
    let data = mock.lock();
    data.accounts
        .iter()
        .find(|a| a.user.email.as_str() == body.email && a.password == body.password)
        .map_or_else(
            || message(StatusCode::UNAUTHORIZED, "Invalid credentials"),
            |a| Json(json!({ "token": a.token, "user": a.user })).into_response(),
        )
}

#[derive(Deserialize)]
struct Registration {
    name: String,
    email: String,
    password: String,
}

async fn register(State(mock): State<MockApi>, Json(body): Json<Registration>) -> Response {
    if mock.token_of(&body.email).is_some() {
        return message(StatusCode::BAD_REQUEST, "User already exists");
    }
    let Ok(email) = Email::parse(&body.email) else {
        return message(StatusCode::BAD_REQUEST, "Invalid email");
    };
    mock.add_account(&body.name, email.as_str(), Some(Role::User));
    if let Some(account) = mock
        .lock()
        .accounts
        .iter_mut()
        .find(|a| a.user.email.as_str() == body.email)
    {
        account.password = body.password;
    }
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User registered" })),
    )
        .into_response()
}

async fn me(State(mock): State<MockApi>, headers: HeaderMap) -> Response {
    let delay = {
        let mut data = mock.lock();
        data.me_calls += 1;
        data.me_delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let data = mock.lock();
    let Some(account) = data.account_for(&headers) else {
        return message(StatusCode::UNAUTHORIZED, "Token expired");
    };
    match data.me_mode {
        IdentityMode::Normal => Json(&account.user).into_response(),
        IdentityMode::Garbage => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        IdentityMode::Status(code) => message(
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            "Identity check refused",
        ),
    }
}

async fn list_users(State(mock): State<MockApi>, headers: HeaderMap) -> Response {
    let data = mock.lock();
    if let Err(denied) = require_admin(&data, &headers) {
        return denied;
    }
    let users: Vec<&UserRecord> = data.accounts.iter().map(|a| &a.user).collect();
    Json(users).into_response()
}

async fn get_user(
    State(mock): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let data = mock.lock();
    if let Err(denied) = require_admin(&data, &headers) {
        return denied;
    }
    data.accounts
        .iter()
        .find(|a| a.user.id.as_ref().is_some_and(|uid| uid.as_str() == id))
        .map_or_else(
            || message(StatusCode::NOT_FOUND, "User not found"),
            |a| Json(&a.user).into_response(),
        )
}

async fn update_user(
    State(mock): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<UserUpdate>,
) -> Response {
    let mut data = mock.lock();
    if let Err(denied) = require_admin(&data, &headers) {
        return denied;
    }
    let Ok(email) = Email::parse(&update.email) else {
        return message(StatusCode::BAD_REQUEST, "Invalid email");
    };
    let Some(account) = data
        .accounts
        .iter_mut()
        .find(|a| a.user.id.as_ref().is_some_and(|uid| uid.as_str() == id))
    else {
        return message(StatusCode::NOT_FOUND, "User not found");
    };
    account.user.name = update.name;
    account.user.email = email;
    account.user.phone = update.phone;
    if update.role.is_some() {
        account.user.role = update.role;
    }
    message(StatusCode::OK, "User updated")
}

async fn delete_user(
    State(mock): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut data = mock.lock();
    if let Err(denied) = require_admin(&data, &headers) {
        return denied;
    }
    data.accounts
        .retain(|a| a.user.id.as_ref().is_none_or(|uid| uid.as_str() != id));
    message(StatusCode::OK, "User deleted")
}

async fn list_venues(State(mock): State<MockApi>, headers: HeaderMap) -> Response {
    let data = mock.lock();
    if let Err(denied) = require_user(&data, &headers) {
        return denied;
    }
    Json(&data.venues).into_response()
}

async fn list_venues_public(State(mock): State<MockApi>) -> Response {
    Json(&mock.lock().venues).into_response()
}

async fn create_venue(
    State(mock): State<MockApi>,
    headers: HeaderMap,
    Json(mut venue): Json<Venue>,
) -> Response {
    let mut data = mock.lock();
    if let Err(denied) = require_admin(&data, &headers) {
        return denied;
    }
    venue.id = Some(VenueId::new(data.next_id("v")));
    data.venues.push(venue);
    message(StatusCode::CREATED, "Venue created")
}

fn venue_index(data: &MockData, id: &str) -> Option<usize> {
    data.venues
        .iter()
        .position(|v| v.id.as_ref().is_some_and(|vid| vid.as_str() == id))
}

async fn get_venue(
    State(mock): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let data = mock.lock();
    if let Err(denied) = require_user(&data, &headers) {
        return denied;
    }
    venue_index(&data, &id)
        .and_then(|i| data.venues.get(i))
        .map_or_else(
            || message(StatusCode::NOT_FOUND, "Venue not found"),
            |v| Json(v).into_response(),
        )
}

async fn update_venue(
    State(mock): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(mut venue): Json<Venue>,
) -> Response {
    let mut data = mock.lock();
    if let Err(denied) = require_admin(&data, &headers) {
        return denied;
    }
    let Some(slot) = venue_index(&data, &id).and_then(|i| data.venues.get_mut(i)) else {
        return message(StatusCode::NOT_FOUND, "Venue not found");
    };
    venue.id = slot.id.clone();
    *slot = venue;
    message(StatusCode::OK, "Venue updated")
}

async fn delete_venue(
    State(mock): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut data = mock.lock();
    if let Err(denied) = require_admin(&data, &headers) {
        return denied;
    }
    match venue_index(&data, &id) {
        Some(i) => {
            data.venues.remove(i);
            message(StatusCode::OK, "Venue deleted")
        }
        None => message(StatusCode::NOT_FOUND, "Venue not found"),
    }
}

async fn list_activities(State(mock): State<MockApi>, headers: HeaderMap) -> Response {
    let data = mock.lock();
    if let Err(denied) = require_admin(&data, &headers) {
        return denied;
    }
    Json(json!({ "data": data.activities })).into_response()
}

async fn list_activities_public(State(mock): State<MockApi>) -> Response {
    Json(json!({ "data": mock.lock().activities })).into_response()
}

fn activity_index(data: &MockData, id: &str) -> Option<usize> {
    data.activities
        .iter()
        .position(|a| a.id.as_ref().is_some_and(|aid| aid.as_str() == id))
}

async fn get_activity(
    State(mock): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let data = mock.lock();
    if let Err(denied) = require_admin(&data, &headers) {
        return denied;
    }
    activity_index(&data, &id)
        .and_then(|i| data.activities.get(i))
        .map_or_else(
            || message(StatusCode::NOT_FOUND, "Activity not found"),
            |a| Json(a).into_response(),
        )
}

async fn update_activity(
    State(mock): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(mut activity): Json<TheatreActivity>,
) -> Response {
    let mut data = mock.lock();
    if let Err(denied) = require_admin(&data, &headers) {
        return denied;
    }
    let Some(slot) = activity_index(&data, &id).and_then(|i| data.activities.get_mut(i)) else {
        return message(StatusCode::NOT_FOUND, "Activity not found");
    };
    activity.id = slot.id.clone();
    *slot = activity;
    message(StatusCode::OK, "Activity updated")
}

async fn delete_activity(
    State(mock): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut data = mock.lock();
    if let Err(denied) = require_admin(&data, &headers) {
        return denied;
    }
    match activity_index(&data, &id) {
        Some(i) => {
            data.activities.remove(i);
            message(StatusCode::OK, "Activity deleted")
        }
        None => message(StatusCode::NOT_FOUND, "Activity not found"),
    }
}

async fn upload(
    State(mock): State<MockApi>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(denied) = require_user(&mock.lock(), &headers) {
        return denied;
    }
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload").to_string();
        if field.bytes().await.is_err() {
            return message(StatusCode::BAD_REQUEST, "Unreadable file");
        }
        mock.lock().uploads.push(name.clone());
        return Json(json!({ "url": format!("https://images.afritheatre.test/{name}") }))
            .into_response();
    }
    message(StatusCode::BAD_REQUEST, "No file uploaded")
}

async fn submit_activity(
    State(mock): State<MockApi>,
    headers: HeaderMap,
    Json(mut activity): Json<TheatreActivity>,
) -> Response {
    let mut data = mock.lock();
    if let Err(denied) = require_user(&data, &headers) {
        return denied;
    }
    activity.id = Some(ActivityId::new(data.next_id("a")));
    data.activities.push(activity);
    message(StatusCode::CREATED, "Activity submitted")
}

/// The site router served on an ephemeral port.
#[derive(Debug, Clone)]
pub struct TestSite {
    pub addr: SocketAddr,
}

impl TestSite {
    /// Start the site against the API at `api_url`, with rate limiting off.
    pub async fn spawn(api_url: &str) -> Self {
        Self::spawn_with_timeout(api_url, Duration::from_secs(5)).await
    }

    /// Start the site with a custom API timeout.
    pub async fn spawn_with_timeout(api_url: &str, timeout: Duration) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind site");
        let addr = listener.local_addr().expect("site has an address");

        let config = SiteConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: format!("http://{addr}"),
            session_secret: SecretString::from(uuid::Uuid::new_v4().simple().to_string().repeat(2)),
            rate_limit: false,
            api: ApiConfig::new(api_url, timeout).expect("valid API URL"),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config).expect("Failed to build app state");
        let app = afritheatre_site::app(state);

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("site crashed");
        });

        Self { addr }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

/// A cookie-keeping client that does not follow redirects.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// `Location` header of a redirect response.
#[must_use]
pub fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Sign in through the site's login form.
pub async fn sign_in(client: &reqwest::Client, site: &TestSite, email: &str) -> reqwest::Response {
    client
        .post(site.url("/login"))
        .form(&[("email", email), ("password", PASSWORD)])
        .send()
        .await
        .expect("login request failed")
}
