use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::types::{OutageKey, OutageRecord, ServiceCatalogEntry};

/// Minutos de outage somados por (serviço, ano, mês).
pub type OutageTotals = HashMap<OutageKey, f64>;

/// Soma a duração dos outages elegíveis por serviço e mês de início.
///
/// Só entram outages cujo serviço resolvido está no catálogo. Um outage que
/// atravessa a virada do mês conta inteiro no mês em que começou. Chaves sem
/// outage ficam ausentes do mapa.
pub fn aggregate_outages(
    outages: &[OutageRecord],
    catalog: &[ServiceCatalogEntry],
) -> OutageTotals {
    let services: HashSet<&str> = catalog.iter().map(|e| e.service.as_str()).collect();
    let mut totals = OutageTotals::new();
    let mut skipped = 0usize;

    for outage in outages {
        let service = match outage.tech_service.as_deref() {
            Some(s) if outage.is_eligible() && services.contains(s) => s,
            _ => {
                skipped += 1;
                continue;
            }
        };
        *totals
            .entry(OutageKey::new(service, outage.period()))
            .or_insert(0.0) += outage.duration_minutes();
    }

    debug!(
        "{} outages agregados em {} chaves, {} ignorados",
        outages.len() - skipped,
        totals.len(),
        skipped
    );
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Period;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn outage(service: &str, start: &str, end: &str) -> OutageRecord {
        OutageRecord {
            tech_service: Some(service.to_string()),
            outage_start: ts(start),
            outage_end: ts(end),
            outage_type: "Unplanned".to_string(),
            problem_status: None,
        }
    }

    fn catalog(services: &[&str]) -> Vec<ServiceCatalogEntry> {
        services
            .iter()
            .map(|s| ServiceCatalogEntry {
                department: "IT".to_string(),
                service: s.to_string(),
                target: 99.9,
            })
            .collect()
    }

    fn total(totals: &OutageTotals, service: &str, year: i32, month: u32) -> Option<f64> {
        totals
            .get(&OutageKey::new(service, Period::new(year, month)))
            .copied()
    }

    #[test]
    fn sums_per_service_and_month() {
        let outages = vec![
            outage("Email", "2023-05-10 00:00", "2023-05-10 01:00"),
            outage("Email", "2023-05-20 12:00", "2023-05-20 12:30"),
            outage("Email", "2023-06-01 00:00", "2023-06-01 00:10"),
            outage("VPN", "2023-05-02 08:00", "2023-05-02 08:45"),
        ];
        let totals = aggregate_outages(&outages, &catalog(&["Email", "VPN"]));

        assert_eq!(totals.len(), 3);
        assert_eq!(total(&totals, "Email", 2023, 5), Some(90.0));
        assert_eq!(total(&totals, "Email", 2023, 6), Some(10.0));
        assert_eq!(total(&totals, "VPN", 2023, 5), Some(45.0));
    }

    #[test]
    fn ignores_services_outside_catalog() {
        let outages = vec![
            outage("Email", "2023-05-10 00:00", "2023-05-10 01:00"),
            outage("Printing", "2023-05-10 00:00", "2023-05-10 01:00"),
        ];
        let totals = aggregate_outages(&outages, &catalog(&["Email"]));
        assert_eq!(totals.len(), 1);
        assert_eq!(total(&totals, "Printing", 2023, 5), None);
    }

    #[test]
    fn ignores_ineligible_records() {
        let mut planned = outage("Email", "2023-05-10 00:00", "2023-05-10 01:00");
        planned.outage_type = "Planned".to_string();
        let mut cancelled = outage("Email", "2023-05-11 00:00", "2023-05-11 01:00");
        cancelled.problem_status = Some("Cancelled".to_string());
        let mut unresolved = outage("Email", "2023-05-12 00:00", "2023-05-12 01:00");
        unresolved.tech_service = None;

        let totals = aggregate_outages(&[planned, cancelled, unresolved], &catalog(&["Email"]));
        assert!(totals.is_empty());
    }

    #[test]
    fn month_spanning_outage_stays_in_start_month() {
        let outages = vec![outage("Email", "2023-01-31 23:00", "2023-02-01 02:00")];
        let totals = aggregate_outages(&outages, &catalog(&["Email"]));
        assert_eq!(total(&totals, "Email", 2023, 1), Some(180.0));
        assert_eq!(total(&totals, "Email", 2023, 2), None);
    }

    #[test]
    fn fractional_minutes_are_not_truncated() {
        let start = NaiveDate::from_ymd_opt(2023, 5, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let rec = OutageRecord {
            tech_service: Some("Email".to_string()),
            outage_start: start,
            outage_end: start + chrono::Duration::seconds(20),
            outage_type: "Unplanned".to_string(),
            problem_status: None,
        };
        let totals = aggregate_outages(&[rec.clone(), rec], &catalog(&["Email"]));
        let mins = total(&totals, "Email", 2023, 5).unwrap();
        assert!((mins - 40.0 / 60.0).abs() < 1e-9);
    }
}
