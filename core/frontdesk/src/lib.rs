use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
    Router,
};
use house_schemas::{
    FriendId, GoalId, Memory, MemoryId, MemoryPatch, Mode, MoodboardItemId, NewFriend, NewGoal,
    NewMemory, NewMoodboardItem, NewPlace, NewTale, Place, PlaceId, PlacePatch, StoreSnapshot,
    TaleId, TalePatch, TasteProfile,
};
use house_store::{taste, views, Store};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const DEFAULT_ADDR: &str = "127.0.0.1:21960";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
}

/// Every route the view layer talks to. Handlers only call store operations
/// and read helpers; nothing here holds state of its own.
pub fn router(store: Arc<Store>) -> Router {
    let state = AppState { store };

    // CORS layer for the browser view layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/state", get(get_state))
        // Session
        .route("/session", get(get_session))
        .route("/session/login", post(login))
        .route("/session/logout", post(logout))
        // Passport
        .route("/places", post(add_place))
        .route("/places/:id", patch(update_place).delete(delete_place))
        // Scrapbook
        .route("/memories", post(add_memory))
        .route("/memories/by-month", get(get_memories_by_month))
        .route("/memories/:id", patch(update_memory).delete(delete_memory))
        // Friends & tales
        .route("/friends", post(add_friend))
        .route("/friends/:id", delete(delete_friend))
        .route("/tales", post(add_tale))
        .route("/tales/:id", patch(update_tale).delete(delete_tale))
        // Goals
        .route("/goals", post(add_goal))
        .route("/goals/:id", delete(delete_goal))
        .route("/goals/:id/toggle", post(toggle_goal))
        // Moodboard
        .route("/moodboard", post(add_moodboard_item))
        .route("/moodboard/:id", delete(delete_moodboard_item))
        // Singletons
        .route("/taste-profile", put(set_taste_profile))
        .route("/taste-profile/quiz", get(quiz_questions).post(take_quiz))
        .route("/mode", put(set_mode))
        // Derived views
        .route("/dashboard", get(get_dashboard))
        .route("/modes/:mode/places", get(get_mode_places))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "frontdesk",
        "status": "healthy",
        "version": "0.1.0"
    }))
}

async fn get_state(State(state): State<AppState>) -> Json<StoreSnapshot> {
    Json(StoreSnapshot::clone(&state.store.snapshot()))
}

// ========== SESSION ==========

async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "authenticated": state.store.is_authenticated(),
        "user": state.store.current_user(),
    }))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    #[serde(default)]
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if !state.store.login(&request.email, &request.password).await {
        warn!("Login rejected for {}", request.email);
        return Err((StatusCode::UNAUTHORIZED, "invalid credentials".to_string()));
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "user": state.store.current_user(),
    })))
}

async fn logout(State(state): State<AppState>) -> StatusCode {
    state.store.logout();
    StatusCode::NO_CONTENT
}

// ========== PLACES ==========

async fn add_place(
    State(state): State<AppState>,
    Json(place): Json<NewPlace>,
) -> impl IntoResponse {
    let id = state.store.add_place(place);
    info!("Added place {}", id);
    (StatusCode::CREATED, Json(serde_json::json!({ "id": id })))
}

async fn update_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<PlacePatch>,
) -> StatusCode {
    state.store.update_place(&PlaceId(id), patch);
    StatusCode::NO_CONTENT
}

async fn delete_place(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.store.delete_place(&PlaceId(id));
    StatusCode::NO_CONTENT
}

// ========== MEMORIES ==========

async fn add_memory(
    State(state): State<AppState>,
    Json(memory): Json<NewMemory>,
) -> impl IntoResponse {
    let id = state.store.add_memory(memory);
    (StatusCode::CREATED, Json(serde_json::json!({ "id": id })))
}

async fn update_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<MemoryPatch>,
) -> StatusCode {
    state.store.update_memory(&MemoryId(id), patch);
    StatusCode::NO_CONTENT
}

async fn delete_memory(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.store.delete_memory(&MemoryId(id));
    StatusCode::NO_CONTENT
}

#[derive(Debug, Serialize)]
struct MemoryMonth {
    month: String,
    memories: Vec<Memory>,
}

async fn get_memories_by_month(State(state): State<AppState>) -> Json<Vec<MemoryMonth>> {
    let snapshot = state.store.snapshot();
    let months = views::memories_by_month(&snapshot)
        .into_iter()
        .map(|(month, memories)| MemoryMonth {
            month: month.to_string(),
            memories: memories.into_iter().cloned().collect(),
        })
        .collect();
    Json(months)
}

// ========== FRIENDS & TALES ==========

async fn add_friend(
    State(state): State<AppState>,
    Json(friend): Json<NewFriend>,
) -> impl IntoResponse {
    let id = state.store.add_friend(friend);
    (StatusCode::CREATED, Json(serde_json::json!({ "id": id })))
}

async fn delete_friend(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.store.delete_friend(&FriendId(id));
    StatusCode::NO_CONTENT
}

async fn add_tale(
    State(state): State<AppState>,
    Json(tale): Json<NewTale>,
) -> impl IntoResponse {
    let id = state.store.add_tale(tale);
    (StatusCode::CREATED, Json(serde_json::json!({ "id": id })))
}

async fn update_tale(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TalePatch>,
) -> StatusCode {
    state.store.update_tale(&TaleId(id), patch);
    StatusCode::NO_CONTENT
}

async fn delete_tale(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.store.delete_tale(&TaleId(id));
    StatusCode::NO_CONTENT
}

// ========== GOALS ==========

async fn add_goal(
    State(state): State<AppState>,
    Json(goal): Json<NewGoal>,
) -> impl IntoResponse {
    let id = state.store.add_goal(goal);
    (StatusCode::CREATED, Json(serde_json::json!({ "id": id })))
}

async fn toggle_goal(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.store.toggle_goal(&GoalId(id));
    StatusCode::NO_CONTENT
}

async fn delete_goal(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.store.delete_goal(&GoalId(id));
    StatusCode::NO_CONTENT
}

// ========== MOODBOARD ==========

async fn add_moodboard_item(
    State(state): State<AppState>,
    Json(item): Json<NewMoodboardItem>,
) -> impl IntoResponse {
    let id = state.store.add_moodboard_item(item);
    (StatusCode::CREATED, Json(serde_json::json!({ "id": id })))
}

async fn delete_moodboard_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> StatusCode {
    state.store.delete_moodboard_item(&MoodboardItemId(id));
    StatusCode::NO_CONTENT
}

// ========== SINGLETONS ==========

async fn set_taste_profile(
    State(state): State<AppState>,
    Json(profile): Json<TasteProfile>,
) -> StatusCode {
    state.store.set_taste_profile(profile);
    StatusCode::NO_CONTENT
}

async fn quiz_questions() -> impl IntoResponse {
    Json(serde_json::json!({ "questions": taste::questions() }))
}

#[derive(Debug, Deserialize)]
struct QuizAnswers {
    #[serde(default)]
    answers: BTreeMap<String, String>,
}

async fn take_quiz(
    State(state): State<AppState>,
    Json(quiz): Json<QuizAnswers>,
) -> Json<TasteProfile> {
    let profile = taste::resolve_profile(quiz.answers);
    info!("Quiz resolved to {}", profile.persona);
    state.store.set_taste_profile(profile.clone());
    Json(profile)
}

#[derive(Debug, Deserialize)]
struct ModeRequest {
    mode: Mode,
}

async fn set_mode(State(state): State<AppState>, Json(request): Json<ModeRequest>) -> StatusCode {
    state.store.set_current_mode(request.mode);
    StatusCode::NO_CONTENT
}

// ========== DERIVED VIEWS ==========

async fn get_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.snapshot();
    Json(views::dashboard_stats(&snapshot))
}

async fn get_mode_places(
    State(state): State<AppState>,
    Path(mode): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mode: Mode = mode
        .parse()
        .map_err(|e: house_schemas::UnknownMode| (StatusCode::NOT_FOUND, e.to_string()))?;

    let snapshot = state.store.snapshot();
    let places: Vec<Place> = views::recommended_places(&snapshot, mode)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(serde_json::json!({
        "mode": views::mode_profile(mode),
        "places": places,
    })))
}
