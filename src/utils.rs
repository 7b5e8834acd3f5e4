//! Parsers auxiliares de datas e valores e utilitários de calendário.

use crate::error::ConciliaError;
use crate::types::Money;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// Formatos de data aceitos pelas plataformas, em ordem de prioridade.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y %H:%M:%S", "%m/%d/%Y"];

static SHORT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((.*?)\)").expect("valid short code regex"));

/// Interpreta um valor monetário com vírgula decimal, tratando vazio como zero.
///
/// # Errors
///
/// `ConciliaError::Amount` quando o valor não é numérico.
pub fn parse_comma_amount(value: &str, field: &'static str) -> Result<Money, ConciliaError> {
    let normalized = value.trim().replace(',', ".");
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(&normalized).map_err(|_| ConciliaError::Amount {
        value: value.trim().to_string(),
        field,
    })
}

/// Interpreta um valor monetário com ponto decimal.
///
/// # Errors
///
/// `ConciliaError::Amount` quando o valor não é numérico.
pub fn parse_dot_amount(value: &str, field: &'static str) -> Result<Money, ConciliaError> {
    Decimal::from_str(value.trim()).map_err(|_| ConciliaError::Amount {
        value: value.trim().to_string(),
        field,
    })
}

/// Arredonda para centavos (duas casas, ponto médio para o par).
#[must_use]
pub fn round_cents(value: Money) -> Money {
    value.round_dp(2)
}

/// Formata um valor com exatamente duas casas decimais.
#[must_use]
pub fn fmt_amount(value: Money) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Interpreta uma data ISO (`YYYY-MM-DD`).
///
/// # Errors
///
/// `ConciliaError::Date` quando o valor não está no formato ISO.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, ConciliaError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ConciliaError::Date {
        value: value.trim().to_string(),
    })
}

/// Interpreta uma data em qualquer dos formatos aceitos, na ordem de
/// prioridade definida; o primeiro que casar vence.
///
/// # Errors
///
/// `ConciliaError::Date` quando nenhum formato casa.
pub fn parse_flexible_datetime(value: &str) -> Result<NaiveDateTime, ConciliaError> {
    let trimmed = value.trim();
    for format in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }
    Err(ConciliaError::Date {
        value: trimmed.to_string(),
    })
}

/// Primeiro e último dia do mês de `today`.
#[must_use]
pub fn current_month_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).expect("day 1 always exists");
    (start, last_day_of_month(today))
}

/// Primeiro e último dia do mês anterior ao de `today`.
#[must_use]
pub fn previous_month_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = today.with_day(1).expect("day 1 always exists") - Days::new(1);
    let start = end.with_day(1).expect("day 1 always exists");
    (start, end)
}

/// Último dia do mês: avança para o dia primeiro do mês seguinte e recua um.
fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let next_month = (date.with_day(28).expect("day 28 always exists") + Days::new(4))
        .with_day(1)
        .expect("day 1 always exists");
    next_month - Days::new(1)
}

/// Extrai a sigla entre parênteses do nome do condomínio.
///
/// `"Jatobá 1 (JT)"` vira `"JT"`; sem parênteses retorna `None`.
#[must_use]
pub fn extract_short_code(condo_name: &str) -> Option<String> {
    SHORT_CODE_RE
        .captures(condo_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
