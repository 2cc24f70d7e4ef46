//! Servicio de directorio de guías
//!
//! Consulta el componente externo de gestión de empleados para conocer el
//! work_status de un guía. Las lecturas pasan por el cache read-through de
//! Redis; el estado es una señal consultiva, así que un directorio caído no
//! bloquea la asignación (se registra y se continúa sin advertencia).

use reqwest::{Client, StatusCode};
use uuid::Uuid;

use crate::cache::guide_cache::GuideInfoCache;
use crate::models::employee::{EmployeeInfo, WorkStatus};
use crate::utils::errors::AppError;

pub struct GuideDirectoryService {
    http_client: Client,
    base_url: String,
    cache: GuideInfoCache,
}

impl GuideDirectoryService {
    pub fn new(http_client: Client, base_url: String, cache: GuideInfoCache) -> Self {
        Self {
            http_client,
            base_url,
            cache,
        }
    }

    /// Obtener la información de un guía (cache primero, luego directorio)
    pub async fn get_guide_info(&self, guide_id: Uuid) -> Result<Option<EmployeeInfo>, AppError> {
        if let Ok(Some(info)) = self.cache.get_guide(guide_id).await {
            return Ok(Some(info));
        }

        let url = format!("{}/api/employee/{}", self.base_url, guide_id);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Directorio de empleados: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Directorio de empleados respondió {}",
                response.status()
            )));
        }

        let info: EmployeeInfo = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Respuesta de directorio inválida: {}", e)))?;

        if let Err(e) = self.cache.set_guide(&info).await {
            log::warn!("⚠️ No se pudo cachear la información del guía {}: {}", guide_id, e);
        }

        Ok(Some(info))
    }

    /// Obtener el work_status de un guía como señal consultiva
    ///
    /// Si el directorio no responde se devuelve None: la advertencia de
    /// estado es blanda y no debe impedir operar la consola.
    pub async fn get_work_status(&self, guide_id: Uuid) -> Option<WorkStatus> {
        match self.get_guide_info(guide_id).await {
            Ok(Some(info)) => Some(info.work_status),
            Ok(None) => {
                log::warn!("⚠️ Guía {} no figura en el directorio de empleados", guide_id);
                None
            }
            Err(e) => {
                log::warn!(
                    "⚠️ Directorio de empleados inaccesible para el guía {}: {}",
                    guide_id,
                    e
                );
                None
            }
        }
    }

    /// Invalidar la entrada cacheada de un guía
    pub async fn invalidate(&self, guide_id: Uuid) {
        if let Err(e) = self.cache.invalidate_guide(guide_id).await {
            log::warn!("⚠️ No se pudo invalidar el cache del guía {}: {}", guide_id, e);
        }
    }
}
