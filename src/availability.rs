//! Junção da grade com os totais de outage e cálculo do uptime.

use chrono::NaiveDate;

use crate::calendar::total_minutes_in_month;
use crate::grid::build_period_grid;
use crate::outage::{OutageTotals, aggregate_outages};
use crate::types::{
    AvailabilityRecord, OutageKey, OutageRecord, PeriodServicePair, ServiceCatalogEntry,
};

/// Left join da grade com os totais: chave ausente vale zero minutos.
///
/// `pct_up = 1 - outage_mins / month_mins`, sem clamp. Valor negativo indica
/// janelas de outage sobrepostas ou erradas na origem.
pub fn compute_availability(
    grid: &[PeriodServicePair],
    aggregated: &OutageTotals,
) -> Vec<AvailabilityRecord> {
    grid.iter()
        .map(|pair| {
            let key = OutageKey::new(pair.entry.service.as_str(), pair.period);
            let outage_mins = aggregated.get(&key).copied().unwrap_or(0.0);
            let month_mins = total_minutes_in_month(pair.period.year, pair.period.month);
            AvailabilityRecord {
                department: pair.entry.department.clone(),
                service: pair.entry.service.clone(),
                target: pair.entry.target,
                year: pair.period.year,
                month: pair.period.month,
                outage_mins,
                month_mins,
                pct_up: 1.0 - outage_mins / f64::from(month_mins),
            }
        })
        .collect()
}

/// Pipeline completo: catálogo + outages + data de referência → relatório.
pub fn build_report(
    catalog: &[ServiceCatalogEntry],
    outages: &[OutageRecord],
    as_of: NaiveDate,
) -> Vec<AvailabilityRecord> {
    let grid = build_period_grid(catalog, as_of);
    let aggregated = aggregate_outages(outages, catalog);
    compute_availability(&grid, &aggregated)
}

/// Linhas com mais minutos de outage do que o mês tem.
pub fn anomalies(records: &[AvailabilityRecord]) -> impl Iterator<Item = &AvailabilityRecord> {
    records.iter().filter(|r| r.pct_up < 0.0)
}
