use chrono::NaiveDate;

use crate::calendar::reporting_periods;
use crate::types::{PeriodServicePair, ServiceCatalogEntry};

/// Produto cartesiano catálogo × períodos da janela de relatório.
///
/// Ordem: catálogo, depois períodos em ordem cronológica.
pub fn build_period_grid(
    catalog: &[ServiceCatalogEntry],
    as_of: NaiveDate,
) -> Vec<PeriodServicePair> {
    let periods = reporting_periods(as_of);
    let mut grid = Vec::with_capacity(catalog.len() * periods.len());
    for entry in catalog {
        for period in &periods {
            grid.push(PeriodServicePair {
                entry: entry.clone(),
                period: *period,
            });
        }
    }
    grid
}
