use anyhow::Result;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info, warn};

use super::cache_config::{CacheConfig, CacheOperations};

/// Cliente Redis con connection pooling y operaciones async
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
    config: CacheConfig,
}

impl RedisClient {
    /// Crear nuevo cliente Redis
    pub async fn new(config: CacheConfig) -> Result<Self> {
        info!("🔗 Conectando a Redis: {}", config.redis_url);

        let client = redis::Client::open(config.redis_url.clone())?;
        let manager = ConnectionManager::new(client).await?;

        // Test de conexión usando un comando simple
        let mut conn = manager.clone();
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;

        info!("✅ Redis conectado exitosamente");

        Ok(Self { manager, config })
    }

    /// TTL por defecto configurado para este cliente
    pub fn default_ttl(&self) -> u64 {
        self.config.default_ttl
    }

    /// Generar clave de cache con prefijo
    fn make_key(&self, prefix: &str, identifier: &str) -> String {
        format!("tour_assignment:{}:{}", prefix, identifier)
    }

    /// Generar clave de cache de información de guía
    pub fn guide_key(&self, guide_id: &str) -> String {
        self.make_key("guide_info", guide_id)
    }

    /// Generar clave de cache de información de vehículo
    pub fn vehicle_key(&self, vehicle_id: &str) -> String {
        self.make_key("vehicle_info", vehicle_id)
    }
}

#[async_trait::async_trait]
impl CacheOperations for RedisClient {
    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.manager.clone();

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(value)) => {
                debug!("📥 Cache HIT para clave: {}", key);
                let deserialized: T = serde_json::from_str(&value)?;
                Ok(Some(deserialized))
            }
            Ok(None) => {
                debug!("❌ Cache MISS para clave: {}", key);
                Ok(None)
            }
            Err(e) => {
                warn!("⚠️ Error leyendo cache para clave {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: u64) -> Result<()> {
        let mut conn = self.manager.clone();

        let serialized = serde_json::to_string(value)?;

        let result: RedisResult<()> = conn.set_ex(key, serialized, ttl).await;

        match result {
            Ok(()) => {
                debug!("💾 Cache SET para clave: {} (TTL: {}s)", key, ttl);
                Ok(())
            }
            Err(e) => {
                error!("❌ Error guardando en cache para clave {}: {}", key, e);
                Err(anyhow::anyhow!("Error de Redis: {}", e))
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.manager.clone();

        let result: RedisResult<i64> = conn.del(key).await;

        match result {
            Ok(count) => {
                debug!("🗑️ Cache DELETE para clave: {} ({} eliminadas)", key, count);
                Ok(())
            }
            Err(e) => {
                error!("❌ Error eliminando cache para clave {}: {}", key, e);
                Err(anyhow::anyhow!("Error de Redis: {}", e))
            }
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.manager.clone();

        let result: RedisResult<bool> = conn.exists(key).await;

        match result {
            Ok(exists) => Ok(exists),
            Err(e) => {
                warn!("⚠️ Error verificando existencia de clave {}: {}", key, e);
                Ok(false)
            }
        }
    }
}
