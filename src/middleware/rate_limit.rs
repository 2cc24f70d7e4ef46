//! Middleware de Rate Limiting
//!
//! Este módulo maneja la limitación de velocidad de requests
//! para prevenir abuso de la API.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::config::EnvironmentConfig;
use crate::utils::errors::AppError;

/// Estructura para almacenar información de rate limiting por IP
#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

/// Estado global del rate limiting
#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
}

impl RateLimitState {
    /// Crear nuevo estado de rate limiting
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests: config.rate_limit_requests,
            window_duration: Duration::from_secs(config.rate_limit_window),
        }
    }

    /// Verificar si una IP ha excedido el límite
    pub async fn check_rate_limit(&self, ip: &str) -> Result<(), AppError> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        // Limpiar entradas expiradas
        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        // Obtener o crear información de rate limiting para esta IP
        let info = requests.entry(ip.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        // Verificar si la ventana de tiempo ha expirado
        if now.duration_since(info.window_start) >= self.window_duration {
            info.requests = 1;
            info.window_start = now;
            return Ok(());
        }

        // Verificar si se ha excedido el límite
        if info.requests >= self.max_requests {
            return Err(AppError::RateLimitExceeded);
        }

        // Incrementar contador de requests
        info.requests += 1;
        Ok(())
    }
}

/// Middleware de rate limiting por IP
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // La API corre detrás de un reverse proxy: la IP real viene en X-Forwarded-For
    let ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    rate_limit.check_rate_limit(&ip).await?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state(max_requests: u32, window_secs: u64) -> RateLimitState {
        RateLimitState {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration: Duration::from_secs(window_secs),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_allows_under_limit() {
        let state = test_state(3, 60);
        assert!(state.check_rate_limit("1.2.3.4").await.is_ok());
        assert!(state.check_rate_limit("1.2.3.4").await.is_ok());
        assert!(state.check_rate_limit("1.2.3.4").await.is_ok());
    }

    #[tokio::test]
    async fn test_rate_limit_blocks_over_limit() {
        let state = test_state(2, 60);
        assert!(state.check_rate_limit("1.2.3.4").await.is_ok());
        assert!(state.check_rate_limit("1.2.3.4").await.is_ok());
        assert!(state.check_rate_limit("1.2.3.4").await.is_err());
        // otra IP no se ve afectada
        assert!(state.check_rate_limit("5.6.7.8").await.is_ok());
    }
}
