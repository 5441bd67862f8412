use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use dapur_core::corpus::{Corpus, Recipe};
use dapur_core::model::VectorSpaceModel;
use dapur_core::recommend::RecommenderConfig;
use dapur_core::service::RecommendationService;
use dapur_server::build_app;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn recipe(name: &str, ingredients: &[&str]) -> Recipe {
    Recipe {
        name: name.to_string(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        instructions: "cook it".to_string(),
    }
}

fn test_app() -> Router {
    let corpus = Corpus::new(vec![
        recipe("Fried Rice", &["rice", "egg", "soy sauce"]),
        recipe("Garlic Bread", &["bread", "garlic", "butter"]),
    ])
    .unwrap();
    let model = VectorSpaceModel::fit(&corpus).unwrap();
    let service = RecommendationService::new(corpus, model, RecommenderConfig::default());
    build_app(Arc::new(service))
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let app = test_app();
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn json_and_form_transports_are_equivalent() {
    let app = test_app();

    let json_req = Request::post("/recommend")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"query":"I have rice and egg"}"#))
        .unwrap();
    let resp = app.clone().oneshot(json_req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let from_json = body_json(resp).await;

    let form_req = Request::post("/recommend")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("query=I+have+rice+and+egg"))
        .unwrap();
    let resp = app.oneshot(form_req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let from_form = body_json(resp).await;

    // Identical data; only the transport encoding differed.
    assert_eq!(from_json["recommendations"], from_form["recommendations"]);
    assert_eq!(from_json["extracted_ingredients"], from_form["extracted_ingredients"]);

    assert_eq!(from_json["extracted_ingredients"], serde_json::json!(["rice", "egg"]));
    assert_eq!(from_json["recommendations"][0]["name"], "Fried Rice");
    assert!(from_json["recommendations"][0]["similarity_score"].as_f64().unwrap() > 0.05);
}

#[tokio::test]
async fn k_is_clamped_and_respected() {
    let app = test_app();
    let req = Request::post("/recommend")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"query":"rice, egg, garlic, bread","k":1}"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let json = body_json(resp).await;
    assert!(json["recommendations"].as_array().unwrap().len() <= 1);
}

#[tokio::test]
async fn nonsense_query_returns_the_empty_result_not_an_error() {
    let app = test_app();
    let req = Request::post("/recommend")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"query":"xyz123"}"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["recommendations"], serde_json::json!([]));
    assert_eq!(json["extracted_ingredients"], serde_json::json!([]));
}

#[tokio::test]
async fn unsupported_media_type_is_rejected() {
    let app = test_app();
    let req = Request::post("/recommend")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("query=rice"))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn ingredients_listing_is_sorted() {
    let app = test_app();
    let resp = app
        .oneshot(Request::get("/ingredients").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(
        json["ingredients"],
        serde_json::json!(["bread", "butter", "egg", "garlic", "rice", "soy sauce"])
    );
}
