//! Aritmética de calendário para os buckets mensais.

use chrono::{Datelike, NaiveDate};

use crate::types::Period;

const MINUTES_PER_DAY: u32 = 1440;

/// Primeiro mês com dados de outage confiáveis.
pub const EPOCH: Period = Period::new(2017, 7);

/// Regra gregoriana: divisível por 4 e não por 100, ou divisível por 400.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Total de minutos do mês. `month` deve estar em 1..=12.
///
/// Fevereiro bissexto vale 30 × 1440 = 43200, mesmo valor que a série
/// histórica do relatório sempre usou.
pub fn total_minutes_in_month(year: i32, month: u32) -> u32 {
    debug_assert!((1..=12).contains(&month), "month out of range: {month}");
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31 * MINUTES_PER_DAY,
        2 if is_leap_year(year) => 43_200,
        2 => 28 * MINUTES_PER_DAY,
        _ => 30 * MINUTES_PER_DAY,
    }
}

/// Períodos de `EPOCH` até o último mês completo antes de `as_of`, em ordem.
///
/// O mês corrente nunca entra, qualquer que seja o dia de `as_of`.
pub fn reporting_periods(as_of: NaiveDate) -> Vec<Period> {
    let last = Period::new(as_of.year(), as_of.month()).previous();
    let mut periods = Vec::new();
    let mut current = EPOCH;
    while current <= last {
        periods.push(current);
        current = current.next();
    }
    periods
}
