use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{Genre, Platform, ProfileUpdate, Title, User};
use crate::services::{
    dashboard::{self, DashboardSummary},
    filter_and_sort, purchase, session, CatalogQuery, LibraryStore, Profile, PurchaseIntent,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Default, Deserialize)]
pub struct TitleParams {
    pub q: Option<String>,
    pub genre: Option<String>,
    pub platform: Option<String>,
    #[serde(rename = "type")]
    pub title_type: Option<String>,
    pub sort: Option<String>,
}

/// An empty string means "no filter", the same as leaving the parameter out
fn parse_filter<T>(value: Option<&str>) -> AppResult<Option<T>>
where
    T: std::str::FromStr<Err = AppError>,
{
    match value {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

impl TryFrom<TitleParams> for CatalogQuery {
    type Error = AppError;

    fn try_from(params: TitleParams) -> AppResult<Self> {
        Ok(Self {
            search: params.q.unwrap_or_default(),
            genre: parse_filter(params.genre.as_deref())?,
            platform: parse_filter(params.platform.as_deref())?,
            title_type: parse_filter(params.title_type.as_deref())?.unwrap_or_default(),
            sort: parse_filter(params.sort.as_deref())?.unwrap_or_default(),
        })
    }
}

/// A title as shown on a card, with the signed-in user's relation to it
#[derive(Debug, Serialize)]
pub struct TitleCard {
    #[serde(flatten)]
    pub title: Title,
    pub runtime: String,
    pub in_watchlist: bool,
    pub purchased: bool,
}

impl TitleCard {
    fn new(title: &Title, library: &LibraryStore) -> Self {
        Self {
            title: title.clone(),
            runtime: dashboard::runtime_label(title),
            in_watchlist: library.is_in_watchlist(&title.id),
            purchased: library.is_purchased(&title.id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TitleListResponse {
    pub count: usize,
    pub total: usize,
    pub filtered: bool,
    pub titles: Vec<TitleCard>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TitleRef {
    pub title_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WatchlistParams {
    pub q: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WatchlistResponse {
    pub count: usize,
    pub genres: Vec<Genre>,
    pub titles: Vec<TitleCard>,
}

#[derive(Debug, Serialize)]
pub struct PurchasesResponse {
    pub count: usize,
    pub total_spent: f64,
    pub titles: Vec<Title>,
}

fn require_user(profile: &Profile) -> AppResult<&User> {
    profile.current_user().ok_or(AppError::Unauthorized)
}

fn watchlist_response(
    library: &LibraryStore,
    params: WatchlistParams,
) -> AppResult<WatchlistResponse> {
    let genre = parse_filter::<Genre>(params.genre.as_deref())?;
    let search = params.q.unwrap_or_default();
    let watchlist = library.watchlist();

    let titles: Vec<TitleCard> = dashboard::filter_watchlist(watchlist, &search, genre)
        .into_iter()
        .map(|title| TitleCard::new(title, library))
        .collect();

    Ok(WatchlistResponse {
        count: watchlist.len(),
        genres: dashboard::watchlist_genres(watchlist),
        titles,
    })
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Browse the catalog
pub async fn list_titles(
    State(state): State<AppState>,
    Query(params): Query<TitleParams>,
) -> AppResult<Json<TitleListResponse>> {
    let query = CatalogQuery::try_from(params)?;
    let profile = state.profile.read().await;

    let titles: Vec<TitleCard> = filter_and_sort(state.catalog.titles(), &query)
        .into_iter()
        .map(|title| TitleCard::new(title, &profile.library))
        .collect();

    Ok(Json(TitleListResponse {
        count: titles.len(),
        total: state.catalog.len(),
        filtered: query.is_filtered(),
        titles,
    }))
}

/// Title details
pub async fn get_title(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TitleCard>> {
    let title = state.catalog.require(&id)?;
    let profile = state.profile.read().await;
    Ok(Json(TitleCard::new(title, &profile.library)))
}

pub async fn list_genres() -> Json<Vec<Genre>> {
    Json(Genre::ALL.to_vec())
}

pub async fn list_platforms() -> Json<Vec<Platform>> {
    Json(Platform::ALL.to_vec())
}

/// Mock login. The simulated latency only holds up this request.
pub async fn login(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<User>> {
    tracing::info!(request_id = %request_id, email = %request.email, "Processing login");

    let delay = state.profile.read().await.session.auth_delay();
    let user = session::authenticate(&request.email, &request.password, delay).await?;
    let user = state.profile.write().await.activate(user).await;

    Ok(Json(user))
}

/// Mock signup
pub async fn signup(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    tracing::info!(request_id = %request_id, email = %request.email, "Processing signup");

    let delay = state.profile.read().await.session.auth_delay();
    let user =
        session::register(&request.email, &request.password, &request.name, delay).await?;
    let user = state.profile.write().await.activate(user).await;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.profile.write().await.logout().await;
    StatusCode::NO_CONTENT
}

/// The signed-in user
pub async fn get_me(State(state): State<AppState>) -> AppResult<Json<User>> {
    let profile = state.profile.read().await;
    Ok(Json(require_user(&profile)?.clone()))
}

/// Merge a partial profile update into the signed-in user
pub async fn update_me(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> AppResult<Json<User>> {
    let mut profile = state.profile.write().await;
    let user = profile
        .update_profile(update)
        .await
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(user))
}

pub async fn get_watchlist(
    State(state): State<AppState>,
    Query(params): Query<WatchlistParams>,
) -> AppResult<Json<WatchlistResponse>> {
    let profile = state.profile.read().await;
    require_user(&profile)?;
    Ok(Json(watchlist_response(&profile.library, params)?))
}

pub async fn add_to_watchlist(
    State(state): State<AppState>,
    Json(request): Json<TitleRef>,
) -> AppResult<(StatusCode, Json<WatchlistResponse>)> {
    let title = state.catalog.require(&request.title_id)?.clone();
    let mut profile = state.profile.write().await;
    require_user(&profile)?;

    profile.library.add_to_watchlist(title).await;

    let response = watchlist_response(&profile.library, WatchlistParams::default())?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<WatchlistResponse>> {
    let mut profile = state.profile.write().await;
    require_user(&profile)?;

    profile.library.remove_from_watchlist(&id).await;

    Ok(Json(watchlist_response(
        &profile.library,
        WatchlistParams::default(),
    )?))
}

pub async fn clear_watchlist(State(state): State<AppState>) -> AppResult<StatusCode> {
    let mut profile = state.profile.write().await;
    require_user(&profile)?;
    profile.library.clear_watchlist().await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_purchases(
    State(state): State<AppState>,
) -> AppResult<Json<PurchasesResponse>> {
    let profile = state.profile.read().await;
    require_user(&profile)?;

    let titles = profile.library.purchased().to_vec();
    Ok(Json(PurchasesResponse {
        count: titles.len(),
        total_spent: profile.library.total_spent(),
        titles,
    }))
}

/// Start a simulated purchase. Works without a session.
pub async fn create_purchase(
    State(state): State<AppState>,
    Json(request): Json<TitleRef>,
) -> AppResult<Json<PurchaseIntent>> {
    let title = state.catalog.require(&request.title_id)?;
    let mut profile = state.profile.write().await;
    let intent = purchase(&mut profile, title, state.record_purchases).await;
    Ok(Json(intent))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> AppResult<Json<DashboardSummary>> {
    let profile = state.profile.read().await;
    let user = require_user(&profile)?;
    Ok(Json(DashboardSummary::build(user, &profile.library)))
}
