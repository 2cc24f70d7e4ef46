//! Utilidades JWT
//!
//! Este módulo contiene funciones helper para verificar los tokens JWT
//! emitidos por el componente de gestión de usuarios. Aquí no se emiten
//! tokens: solo se decodifican y validan.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

/// Claims del JWT token
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,  // operator_id
    pub role: String, // rol del operador (admin, dispatcher, ...)
    pub exp: usize,   // expiration timestamp
    pub iat: usize,   // issued at timestamp
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration: config.jwt_expiration,
        }
    }
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

    Ok(token_data.claims)
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    if !auth_header.starts_with("Bearer ") {
        return Err(AppError::Jwt(
            "Header Authorization debe comenzar con 'Bearer '".to_string(),
        ));
    }

    let token = &auth_header[7..]; // Remover "Bearer "
    if token.is_empty() {
        return Err(AppError::Jwt("Token no puede estar vacío".to_string()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        }
    }

    // Emitir un token como lo haría el componente de gestión de usuarios
    fn issue_token(operator_id: Uuid, role: &str, secret: &str) -> String {
        let now = chrono::Utc::now();
        let claims = JwtClaims {
            sub: operator_id.to_string(),
            role: role.to_string(),
            exp: (now + chrono::Duration::hours(1)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_token() {
        let config = test_config();
        let operator_id = Uuid::new_v4();

        let token = issue_token(operator_id, "admin", &config.secret);
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, operator_id.to_string());
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = test_config();
        let token = issue_token(Uuid::new_v4(), "admin", "other-secret");

        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_token_from_header("Basic abc").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
    }
}
