//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de operadores autenticados. Los tokens los emite el
//! componente externo de gestión de usuarios; aquí solo se verifican.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    state::AppState,
    utils::errors::AppError,
    utils::jwt::{extract_token_from_header, verify_token, JwtConfig},
};

/// Operador autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedOperator {
    pub operator_id: Uuid,
    pub role: String,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_token_from_header(auth_header)?;

    // Decodificar y validar JWT
    let jwt_config = JwtConfig::from(&state.config);
    let claims = verify_token(token, &jwt_config)?;

    let operator_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Token con subject inválido".to_string()))?;

    // Inyectar el operador autenticado en la request
    request.extensions_mut().insert(AuthenticatedOperator {
        operator_id,
        role: claims.role,
    });

    Ok(next.run(request).await)
}
