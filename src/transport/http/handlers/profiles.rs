use crate::domain::directory;
use crate::domain::directory::Profile;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/profiles",
    responses(
        (status = 200, description = "The static profile roster", body = [Profile])
    )
)]
pub async fn profiles_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(directory::roster()))
}
