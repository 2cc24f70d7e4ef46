//! Servicio de directorio de vehículos
//!
//! Consulta el directorio externo de vehículos para conocer el cupo de
//! conductores (max_drivers). A diferencia del estado de los guías, el cupo
//! respalda una restricción dura: si el directorio no responde, la operación
//! de vínculo falla en lugar de chequear a ciegas.

use reqwest::{Client, StatusCode};
use uuid::Uuid;

use crate::cache::cache_config::CacheOperations;
use crate::cache::redis_client::RedisClient;
use crate::models::employee::VehicleInfo;
use crate::utils::errors::AppError;

pub struct VehicleDirectoryService {
    http_client: Client,
    base_url: String,
    redis: RedisClient,
}

impl VehicleDirectoryService {
    pub fn new(http_client: Client, base_url: String, redis: RedisClient) -> Self {
        Self {
            http_client,
            base_url,
            redis,
        }
    }

    /// Obtener la información de un vehículo (cache primero, luego directorio)
    pub async fn get_vehicle_info(&self, vehicle_id: Uuid) -> Result<Option<VehicleInfo>, AppError> {
        let key = self.redis.vehicle_key(&vehicle_id.to_string());
        if let Ok(Some(info)) = self.redis.get::<VehicleInfo>(&key).await {
            return Ok(Some(info));
        }

        let url = format!("{}/api/vehicle/{}", self.base_url, vehicle_id);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Directorio de vehículos: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Directorio de vehículos respondió {}",
                response.status()
            )));
        }

        let info: VehicleInfo = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Respuesta de directorio inválida: {}", e)))?;

        if let Err(e) = self.redis.set(&key, &info, self.redis.default_ttl()).await {
            log::warn!("⚠️ No se pudo cachear la información del vehículo {}: {}", vehicle_id, e);
        }

        Ok(Some(info))
    }
}
