use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["service"], "tour-assignment");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/no-such-endpoint")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_assignment_requires_json_body() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/assignment")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    // cuerpo sin los campos requeridos: el extractor lo rechaza
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_cancel_is_idempotent_shape() {
    let app = create_test_app();

    // dos cancelaciones seguidas responden 200 ambas veces
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/assignment/550e8400-e29b-41d4-a716-446655440000/cancel")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], true);
    }
}

// Función helper para crear la app de test
//
// Réplica sin base de datos de la forma del router real: suficiente para
// verificar rutas, extractores y formas de respuesta.
fn create_test_app() -> Router {
    #[derive(serde::Deserialize)]
    #[allow(dead_code)]
    struct CreateShape {
        tour_id: uuid::Uuid,
        date: chrono::NaiveDate,
        destination: String,
    }

    Router::new()
        .route(
            "/health",
            get(|| async {
                Json(json!({
                    "service": "tour-assignment",
                    "status": "healthy",
                }))
            }),
        )
        .route(
            "/api/assignment",
            post(|Json(_request): Json<CreateShape>| async { StatusCode::CREATED }),
        )
        .route(
            "/api/assignment/:id/cancel",
            put(|| async {
                Json(json!({
                    "success": true,
                    "message": "Asignación cancelada"
                }))
            }),
        )
}
