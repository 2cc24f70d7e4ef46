mod cache;
mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{middleware as axum_middleware, response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use cache::redis_client::RedisClient;
use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::auth::auth_middleware;
use middleware::cors::cors_middleware;
use middleware::rate_limit::{rate_limit_middleware, RateLimitState};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚌 Tour Assignment API - Consola de asignaciones");
    info!("================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    // Aplicar migraciones pendientes
    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        error!("❌ Error aplicando migraciones: {}", e);
        return Err(anyhow::anyhow!("Error de migraciones: {}", e));
    }

    // Inicializar Redis y cache
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

    let redis_config = cache::CacheConfig {
        redis_url,
        default_ttl: 3600,
        max_connections: 10,
    };

    let redis_client = match RedisClient::new(redis_config).await {
        Ok(client) => client,
        Err(e) => {
            error!("❌ Error conectando a Redis: {}", e);
            return Err(anyhow::anyhow!("Error de Redis: {}", e));
        }
    };

    // Crear router de la API
    let config = EnvironmentConfig::default();
    let rate_limit_state = RateLimitState::new(&config);
    let app_state = AppState::new(pool, config, redis_client);

    // Rutas protegidas por JWT y rate limiting
    let api_router = Router::new()
        .nest("/assignment", routes::assignment_routes::create_assignment_router())
        .nest("/availability", routes::availability_routes::create_availability_router())
        .nest("/vehicle", routes::vehicle_driver_routes::create_vehicle_driver_router())
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            rate_limit_state,
            rate_limit_middleware,
        ));

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api", api_router)
        .layer(cors_middleware())
        .with_state(app_state);

    // Puerto del servidor
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("📋 Endpoints - Assignment:");
    info!("   POST /api/assignment - Crear asignación");
    info!("   POST /api/assignment/batch - Crear asignaciones en lote");
    info!("   GET  /api/assignment - Listado paginado");
    info!("   GET  /api/assignment/:id - Obtener asignación");
    info!("   GET  /api/assignment/date/:date - Asignaciones por fecha");
    info!("   GET  /api/assignment/range - Asignaciones por rango de fechas");
    info!("   GET  /api/assignment/destination/:destination - Asignaciones por destino");
    info!("   GET  /api/assignment/guide/:guide_id - Asignaciones por guía");
    info!("   GET  /api/assignment/vehicle/:vehicle_id - Asignaciones por vehículo");
    info!("   GET  /api/assignment/stats - Estadísticas por fecha");
    info!("   PUT  /api/assignment/:id - Actualizar asignación");
    info!("   PUT  /api/assignment/:id/confirm - Confirmar asignación");
    info!("   PUT  /api/assignment/:id/cancel - Cancelar asignación");
    info!("   DELETE /api/assignment/:id - Purgar asignación");
    info!("📅 Endpoints - Availability:");
    info!("   GET  /api/availability - Consultar disponibilidad");
    info!("   POST /api/availability - Fijar disponibilidad");
    info!("   POST /api/availability/batch - Fijar disponibilidad en rango");
    info!("   GET  /api/availability/stats - Estadísticas de disponibilidad");
    info!("   DELETE /api/availability/:kind/:id/:date - Eliminar disponibilidad");
    info!("🚗 Endpoints - Vehicle drivers:");
    info!("   GET  /api/vehicle/:id/driver - Listar conductores");
    info!("   POST /api/vehicle/:id/driver - Vincular conductor");
    info!("   DELETE /api/vehicle/:id/driver/:employee_id - Desvincular conductor");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "tour-assignment",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
