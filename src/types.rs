use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

use crate::error::UpdateError;

/// Único tipo de outage que conta contra a disponibilidade.
pub const UNPLANNED: &str = "Unplanned";
/// Status de problema que invalida o outage associado.
pub const CANCELLED: &str = "Cancelled";

/// Registro bruto de outage vindo do banco de incidentes.
#[derive(Debug, Clone, PartialEq)]
pub struct OutageRecord {
    /// Serviço técnico resolvido (COALESCE de problema e item de configuração).
    pub tech_service: Option<String>,
    pub outage_start: NaiveDateTime,
    pub outage_end: NaiveDateTime,
    pub outage_type: String,
    pub problem_status: Option<String>,
}

impl OutageRecord {
    /// Não planejado, problema não cancelado e serviço resolvido.
    pub fn is_eligible(&self) -> bool {
        self.outage_type == UNPLANNED
            && self.problem_status.as_deref() != Some(CANCELLED)
            && self.tech_service.is_some()
    }

    /// Duração em minutos, com fração preservada.
    pub fn duration_minutes(&self) -> f64 {
        let delta = self.outage_end - self.outage_start;
        match delta.num_microseconds() {
            Some(us) => us as f64 / 60_000_000.0,
            None => delta.num_milliseconds() as f64 / 60_000.0,
        }
    }

    /// Período ao qual o outage é atribuído: sempre o mês de início.
    pub fn period(&self) -> Period {
        Period::new(self.outage_start.year(), self.outage_start.month())
    }

    /// Monta o registro a partir das colunas já decodificadas.
    ///
    /// Outage sem início ou fim não tem duração e é erro de dado.
    pub fn from_columns(
        tech_service: Option<String>,
        outage_start: Option<NaiveDateTime>,
        outage_end: Option<NaiveDateTime>,
        outage_type: String,
        problem_status: Option<String>,
    ) -> Result<Self, UpdateError> {
        let (Some(outage_start), Some(outage_end)) = (outage_start, outage_end) else {
            return Err(UpdateError::data_source(
                "outage records",
                format!("outage for {tech_service:?} without start or end time"),
            ));
        };
        Ok(Self {
            tech_service,
            outage_start,
            outage_end,
            outage_type,
            problem_status,
        })
    }
}

fn column<'a, T: FromSql<'a>>(row: &'a Row, name: &str) -> Result<T, UpdateError> {
    row.try_get(name).map_err(|e| UpdateError::data_source("outage records", e))
}

impl TryFrom<Row> for OutageRecord {
    type Error = UpdateError;

    fn try_from(row: Row) -> Result<Self, Self::Error> {
        Self::from_columns(
            column(&row, "tech_service")?,
            column(&row, "outage_start")?,
            column(&row, "outage_end")?,
            column(&row, "outage_type")?,
            column(&row, "problem_status")?,
        )
    }
}

/// Linha do catálogo de serviços monitorados.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCatalogEntry {
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Service")]
    pub service: String,
    #[serde(rename = "Target")]
    pub target: f64,
}

/// Bucket mensal de relatório.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }
}

/// Chave de agregação: (serviço, ano, mês).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutageKey {
    pub service: String,
    pub period: Period,
}

impl OutageKey {
    pub fn new(service: impl Into<String>, period: Period) -> Self {
        Self {
            service: service.into(),
            period,
        }
    }
}

/// Combinação serviço × período da grade completa.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodServicePair {
    pub entry: ServiceCatalogEntry,
    pub period: Period,
}

/// Linha do relatório de disponibilidade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityRecord {
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Service")]
    pub service: String,
    #[serde(rename = "Target")]
    pub target: f64,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
    pub outage_mins: f64,
    pub month_mins: u32,
    pub pct_up: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn outage(service: Option<&str>, kind: &str, status: Option<&str>) -> OutageRecord {
        OutageRecord {
            tech_service: service.map(str::to_string),
            outage_start: at(2023, 5, 10, 0, 0, 0),
            outage_end: at(2023, 5, 10, 1, 0, 0),
            outage_type: kind.to_string(),
            problem_status: status.map(str::to_string),
        }
    }

    #[test]
    fn eligibility_rules() {
        assert!(outage(Some("Email"), "Unplanned", None).is_eligible());
        assert!(outage(Some("Email"), "Unplanned", Some("Closed")).is_eligible());
        assert!(!outage(Some("Email"), "Unplanned", Some("Cancelled")).is_eligible());
        assert!(!outage(Some("Email"), "Planned", None).is_eligible());
        assert!(!outage(None, "Unplanned", None).is_eligible());
    }

    #[test]
    fn duration_keeps_sub_minute_precision() {
        let mut rec = outage(Some("Email"), "Unplanned", None);
        rec.outage_end = at(2023, 5, 10, 0, 1, 30);
        assert!((rec.duration_minutes() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn period_is_start_month() {
        let mut rec = outage(Some("Email"), "Unplanned", None);
        rec.outage_start = at(2023, 1, 31, 23, 0, 0);
        rec.outage_end = at(2023, 2, 1, 1, 0, 0);
        assert_eq!(rec.period(), Period::new(2023, 1));
    }

    #[test]
    fn columns_build_a_record() {
        let rec = OutageRecord::from_columns(
            Some("Email".to_string()),
            Some(at(2023, 5, 10, 0, 0, 0)),
            Some(at(2023, 5, 10, 1, 0, 0)),
            "Unplanned".to_string(),
            None,
        )
        .unwrap();
        assert_eq!(rec, outage(Some("Email"), "Unplanned", None));
    }

    #[test]
    fn null_timestamps_are_a_data_source_error() {
        let missing_start = OutageRecord::from_columns(
            Some("Email".to_string()),
            None,
            Some(at(2023, 5, 10, 1, 0, 0)),
            "Unplanned".to_string(),
            None,
        );
        assert!(matches!(
            missing_start,
            Err(UpdateError::DataSource { what: "outage records", .. })
        ));

        let missing_end = OutageRecord::from_columns(
            Some("Email".to_string()),
            Some(at(2023, 5, 10, 0, 0, 0)),
            None,
            "Unplanned".to_string(),
            None,
        );
        assert!(missing_end.is_err());
    }

    #[test]
    fn period_navigation_wraps_year() {
        assert_eq!(Period::new(2023, 12).next(), Period::new(2024, 1));
        assert_eq!(Period::new(2024, 1).previous(), Period::new(2023, 12));
        assert!(Period::new(2023, 12) < Period::new(2024, 1));
    }
}
