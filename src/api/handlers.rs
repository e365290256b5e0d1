use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{
        ChipKind, ChipOption, FontSize, FontSizeOption, RequestDescriptor, Song, Tab, FONT_SIZES,
        GENRES, MOODS,
    },
    services::SessionSnapshot,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub moods: &'static [ChipOption],
    pub genres: &'static [ChipOption],
    pub font_sizes: &'static [FontSizeOption],
}

#[derive(Debug, Deserialize)]
pub struct ChangeTabRequest {
    pub tab: Tab,
}

#[derive(Debug, Deserialize)]
pub struct SelectChipRequest {
    pub kind: ChipKind,
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchFocusRequest {
    pub focused: bool,
}

/// Without `term` the current search text is submitted
#[derive(Debug, Deserialize)]
pub struct SubmitSearchRequest {
    #[serde(default)]
    pub term: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileBody {
    pub profile: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleFavoriteRequest {
    pub song: Song,
}

#[derive(Debug, Serialize)]
pub struct ToggleFavoriteResponse {
    pub song: Song,
    pub is_favorite: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetFontSizeRequest {
    pub index: usize,
}

#[derive(Debug, Serialize)]
pub struct FontSizeResponse {
    pub index: usize,
    pub label: &'static str,
    pub px: u8,
}

impl From<FontSize> for FontSizeResponse {
    fn from(font_size: FontSize) -> Self {
        let option = font_size.option();
        Self {
            index: font_size.index(),
            label: option.label,
            px: option.px,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub category: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub force_refresh: bool,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Mood, genre and font size options
pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        moods: &MOODS,
        genres: &GENRES,
        font_sizes: &FONT_SIZES,
    })
}

pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot().await)
}

pub async fn change_tab(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ChangeTabRequest>,
) -> Json<SessionSnapshot> {
    tracing::info!(request_id = %request_id, tab = ?request.tab, "Changing tab");
    Json(state.session.change_tab(request.tab).await)
}

pub async fn select_chip(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SelectChipRequest>,
) -> AppResult<Json<SessionSnapshot>> {
    tracing::info!(
        request_id = %request_id,
        kind = ?request.kind,
        id = %request.id,
        "Selecting chip"
    );
    let snapshot = state.session.select_chip(request.kind, &request.id).await?;
    Ok(Json(snapshot))
}

pub async fn set_search_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchTextRequest>,
) -> Json<SessionSnapshot> {
    Json(state.session.set_search_query(&request.text).await)
}

pub async fn set_search_focus(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchFocusRequest>,
) -> Json<SessionSnapshot> {
    Json(state.session.set_search_focus(request.focused).await)
}

pub async fn submit_search(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SubmitSearchRequest>,
) -> Json<SessionSnapshot> {
    tracing::info!(
        request_id = %request_id,
        from_history = request.term.is_some(),
        "Submitting artist search"
    );
    Json(state.session.submit_search(request.term.as_deref()).await)
}

pub async fn submit_profile(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ProfileBody>,
) -> Json<SessionSnapshot> {
    tracing::info!(request_id = %request_id, "Submitting taste profile");
    Json(state.session.submit_profile(&request.profile).await)
}

pub async fn load_more(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> Json<SessionSnapshot> {
    tracing::info!(request_id = %request_id, "Loading more songs");
    Json(state.session.load_more().await)
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> Json<SessionSnapshot> {
    tracing::info!(request_id = %request_id, "Refreshing songs");
    Json(state.session.refresh().await)
}

pub async fn get_favorites(State(state): State<Arc<AppState>>) -> Json<Vec<Song>> {
    Json(state.preferences.favorites().await)
}

pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ToggleFavoriteRequest>,
) -> Json<ToggleFavoriteResponse> {
    let is_favorite = state.preferences.toggle_favorite(request.song.clone()).await;
    Json(ToggleFavoriteResponse {
        song: request.song,
        is_favorite,
    })
}

pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.preferences.search_history().await)
}

/// Removes one term and returns the remaining history
pub async fn remove_history_term(
    State(state): State<Arc<AppState>>,
    Path(term): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    state.preferences.remove_search(&term).await?;
    Ok(Json(state.preferences.search_history().await))
}

pub async fn get_profile(State(state): State<Arc<AppState>>) -> Json<ProfileBody> {
    Json(ProfileBody {
        profile: state.preferences.profile().await,
    })
}

/// Saves the profile text without fetching recommendations
pub async fn set_profile(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProfileBody>,
) -> Json<ProfileBody> {
    state.preferences.set_profile(&request.profile).await;
    Json(request)
}

pub async fn get_font_size(State(state): State<Arc<AppState>>) -> Json<FontSizeResponse> {
    Json(state.preferences.font_size().await.into())
}

pub async fn set_font_size(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetFontSizeRequest>,
) -> AppResult<Json<FontSizeResponse>> {
    let font_size = state.preferences.set_font_size(request.index).await?;
    Ok(Json(font_size.into()))
}

/// Stateless access to the recommendation service
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<Song>>> {
    let descriptor = RequestDescriptor::from_parts(&request.category, request.query)?;

    tracing::info!(
        request_id = %request_id,
        request = %descriptor,
        excluded = request.exclude.len(),
        force_refresh = request.force_refresh,
        "Processing recommendation request"
    );

    let songs = state
        .recommendations
        .fetch_recommendations(&descriptor, &request.exclude, request.force_refresh)
        .await;

    Ok(Json(songs))
}
