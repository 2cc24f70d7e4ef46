//! Cache de información de guías
//!
//! Cache read-through sobre el directorio de empleados: el `work_status`
//! de un guía se consulta muchas veces durante la asignación diaria y el
//! directorio es un servicio externo. Toda mutación de asignaciones que
//! toque a un guía invalida su entrada.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::cache_config::CacheOperations;
use super::redis_client::RedisClient;
use crate::models::employee::EmployeeInfo;

/// Entrada cacheada del directorio de empleados
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedGuideInfo {
    pub info: EmployeeInfo,
    pub cached_at: u64,
}

/// Cache de información de guías con invalidación explícita
#[derive(Clone)]
pub struct GuideInfoCache {
    redis: RedisClient,
    ttl: u64,
}

impl GuideInfoCache {
    /// Crear nuevo cache de guías
    pub fn new(redis: RedisClient, ttl: u64) -> Self {
        Self { redis, ttl }
    }

    /// Obtener información de un guía del cache
    pub async fn get_guide(&self, guide_id: Uuid) -> Result<Option<EmployeeInfo>> {
        let key = self.redis.guide_key(&guide_id.to_string());

        match self.redis.get::<CachedGuideInfo>(&key).await? {
            Some(cached) => {
                debug!("🧭 Guide cache HIT para {}", guide_id);
                Ok(Some(cached.info))
            }
            None => {
                debug!("❌ Guide cache MISS para {}", guide_id);
                Ok(None)
            }
        }
    }

    /// Guardar información de un guía en el cache
    pub async fn set_guide(&self, info: &EmployeeInfo) -> Result<()> {
        let key = self.redis.guide_key(&info.id.to_string());
        let cached = CachedGuideInfo {
            info: info.clone(),
            cached_at: chrono::Utc::now().timestamp() as u64,
        };

        self.redis.set(&key, &cached, self.ttl).await
    }

    /// Invalidar la entrada de un guía
    ///
    /// Se llama en cada mutación de asignaciones que involucre al guía:
    /// su work_status en el directorio puede cambiar como consecuencia.
    pub async fn invalidate_guide(&self, guide_id: Uuid) -> Result<()> {
        let key = self.redis.guide_key(&guide_id.to_string());

        info!("🗑️ Invalidando guide cache para {}", guide_id);
        self.redis.delete(&key).await
    }
}
