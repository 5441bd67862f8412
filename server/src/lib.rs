use axum::async_trait;
use axum::extract::{FromRequest, Request, State};
use axum::http::{header::CONTENT_TYPE, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, RequestExt, Router};
use dapur_core::recommend::Recommendation;
use dapur_core::service::RecommendationService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecommendationService>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub query: String,
    #[serde(default)]
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub took_s: f64,
    pub extracted_ingredients: Vec<String>,
    pub recommendations: Vec<RecommendationDto>,
}

#[derive(Serialize)]
pub struct RecommendationDto {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub similarity_score: f32,
    pub extracted_ingredients: Vec<String>,
}

impl From<Recommendation> for RecommendationDto {
    fn from(r: Recommendation) -> Self {
        Self {
            name: r.recipe.name,
            ingredients: r.recipe.ingredients,
            instructions: r.recipe.instructions,
            similarity_score: r.score,
            extracted_ingredients: r.extracted_ingredients,
        }
    }
}

#[derive(Serialize)]
pub struct IngredientsResponse {
    pub ingredients: Vec<String>,
}

/// JSON error body for rejected requests.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Accepts the same payload as `application/json` or an urlencoded form, so
/// both transports hit one handler and produce identical response data.
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    Json<T>: FromRequest<()>,
    Form<T>: FromRequest<()>,
    T: 'static,
{
    type Rejection = Response;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        if content_type.starts_with("application/json") {
            let Json(payload) = req.extract().await.map_err(IntoResponse::into_response)?;
            return Ok(Self(payload));
        }
        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(payload) = req.extract().await.map_err(IntoResponse::into_response)?;
            return Ok(Self(payload));
        }

        Err((
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(ErrorBody {
                error: "expected application/json or form data".to_string(),
            }),
        )
            .into_response())
    }
}

pub fn build_app(service: Arc<RecommendationService>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recommend", post(recommend_handler))
        .route("/ingredients", get(ingredients_handler))
        .with_state(AppState { service })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    JsonOrForm(req): JsonOrForm<RecommendRequest>,
) -> Json<RecommendResponse> {
    let start = std::time::Instant::now();
    let k = req.k.map(|k| k.max(1).min(100));
    let result = state.service.recommend(&req.query, k);
    let took_s = start.elapsed().as_secs_f64();

    tracing::debug!(
        query = %req.query,
        hits = result.recommendations.len(),
        extracted = result.extracted_ingredients.len(),
        "served recommendation"
    );
    Json(RecommendResponse {
        query: req.query,
        took_s,
        extracted_ingredients: result.extracted_ingredients,
        recommendations: result.recommendations.into_iter().map(Into::into).collect(),
    })
}

pub async fn ingredients_handler(State(state): State<AppState>) -> Json<IngredientsResponse> {
    Json(IngredientsResponse {
        ingredients: state.service.known_ingredients().map(String::from).collect(),
    })
}
