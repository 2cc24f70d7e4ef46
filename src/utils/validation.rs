//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de rangos de
//! fechas y de horarios intra-día.

use chrono::{NaiveDate, NaiveTime};
use validator::ValidationError;

/// Validar un rango de fechas inclusivo (inicio <= fin)
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if start > end {
        let mut error = ValidationError::new("date_range");
        error.add_param("start".into(), &start.to_string());
        error.add_param("end".into(), &end.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar un rango horario intra-día (inicio < fin, extremos estrictos)
pub fn validate_time_range(start: NaiveTime, end: NaiveTime) -> Result<(), ValidationError> {
    if start >= end {
        let mut error = ValidationError::new("time_range");
        error.add_param("start".into(), &start.to_string());
        error.add_param("end".into(), &end.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date_range() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert!(validate_date_range(start, end).is_ok());
        // un solo día es un rango válido
        assert!(validate_date_range(start, start).is_ok());
        assert!(validate_date_range(end, start).is_err());
    }

    #[test]
    fn test_validate_time_range() {
        let start = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert!(validate_time_range(start, end).is_ok());
        assert!(validate_time_range(end, start).is_err());
        // rango vacío no es válido
        assert!(validate_time_range(start, start).is_err());
    }
}
