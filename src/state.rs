//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use reqwest::Client;
use sqlx::PgPool;

use crate::cache::guide_cache::GuideInfoCache;
use crate::cache::redis_client::RedisClient;
use crate::config::environment::EnvironmentConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub redis: RedisClient,
    pub http_client: Client,
    pub guide_cache: GuideInfoCache,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, redis: RedisClient) -> Self {
        let guide_cache = GuideInfoCache::new(redis.clone(), config.guide_cache_ttl);
        Self {
            pool,
            config,
            redis,
            http_client: Client::new(),
            guide_cache,
        }
    }
}
