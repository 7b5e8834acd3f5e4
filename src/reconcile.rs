//! Análise do resultado de conciliação: totais por data de cada lado,
//! diferenças materiais e o status apresentado no relatório.

use crate::error::ConciliaError;
use crate::types::{Money, PairedItem};
use crate::utils::{parse_comma_amount, round_cents};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// Formato das datas que as duas plataformas emitem nos itens pareados.
const ITEM_DATE_FORMAT: &str = "%m/%d/%Y";

/// Diferença acima deste valor entre os lados é material.
const CENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Lançamento individual que contribuiu para o total de uma data.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDetail {
    /// Valor do lançamento.
    pub amount: Money,
    /// Descrição informada pela plataforma.
    pub description: Option<String>,
}

/// Evidência de uma data cujos totais não fecham.
#[derive(Debug, Clone, PartialEq)]
pub struct DateDifference {
    /// Data na representação bruta (`MM/DD/YYYY`; vazia quando o item não
    /// trouxe data alguma).
    pub date: String,
    /// Total do lado banco arredondado a centavos.
    pub bank_total: Money,
    /// Total do lado software arredondado a centavos.
    pub software_total: Money,
    /// Lançamentos bancários da data.
    pub bank_items: Vec<ItemDetail>,
    /// Lançamentos do software na data.
    pub software_items: Vec<ItemDetail>,
}

/// Acumulador de totais por data, montado do zero a cada análise.
#[derive(Debug, Default)]
struct DailyTotals {
    bank: BTreeMap<String, Money>,
    software: BTreeMap<String, Money>,
    details: BTreeMap<String, DayDetails>,
}

#[derive(Debug, Default, Clone)]
struct DayDetails {
    bank: Vec<ItemDetail>,
    software: Vec<ItemDetail>,
}

impl DailyTotals {
    fn add_bank(&mut self, date: String, amount: Money, description: Option<String>) {
        *self.bank.entry(date.clone()).or_insert(Decimal::ZERO) += amount;
        self.details
            .entry(date)
            .or_default()
            .bank
            .push(ItemDetail { amount, description });
    }

    fn add_software(&mut self, date: String, amount: Money, description: Option<String>) {
        *self.software.entry(date.clone()).or_insert(Decimal::ZERO) += amount;
        self.details
            .entry(date)
            .or_default()
            .software
            .push(ItemDetail { amount, description });
    }
}

/// Resultado da análise de conciliação de um período.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// `true` somente quando nenhuma data foi marcada com diferença.
    pub reconciled: bool,
    /// Datas divergentes em ordem lexicográfica crescente.
    pub differences: Vec<DateDifference>,
    /// Soma de todos os lançamentos bancários, arredondada.
    pub total_bank: Money,
    /// Soma de todos os lançamentos do software, arredondada.
    pub total_software: Money,
}

impl Reconciliation {
    /// Agrupa os itens pareados por data, compara os totais dos dois lados
    /// e marca as datas divergentes.
    ///
    /// Datas futuras ainda não são discrepância; data que não interpreta
    /// como `MM/DD/YYYY` é conservadoramente tratada como vencida e entra
    /// no relatório. Os totais refletem todas as datas, marcadas ou não.
    ///
    /// # Errors
    ///
    /// `ConciliaError::Amount` quando algum valor informado não é um número
    /// com vírgula decimal.
    pub fn analyze(items: &[PairedItem], today: NaiveDate) -> Result<Self, ConciliaError> {
        let mut totals = DailyTotals::default();

        for item in items {
            if let Some(raw) = present(&item.bank_amount) {
                let amount = parse_comma_amount(raw, "valor_banco")?;
                let date = date_key(&item.bank_date, &item.date);
                totals.add_bank(date, amount, item.bank_description.clone());
            }
            if let Some(raw) = present(&item.software_amount) {
                let amount = parse_comma_amount(raw, "valor_software")?;
                let date = date_key(&item.software_date, &item.date);
                totals.add_software(date, amount, item.software_description.clone());
            }
        }

        let all_dates: BTreeSet<&String> =
            totals.bank.keys().chain(totals.software.keys()).collect();

        let mut differences = Vec::new();
        for date in all_dates {
            let bank = round_cents(totals.bank.get(date).copied().unwrap_or(Decimal::ZERO));
            let software =
                round_cents(totals.software.get(date).copied().unwrap_or(Decimal::ZERO));
            if (bank - software).abs() <= CENT_TOLERANCE {
                continue;
            }
            // Data que não interpreta conta como vencida e permanece no
            // relatório.
            let due = NaiveDate::parse_from_str(date, ITEM_DATE_FORMAT)
                .map_or(true, |parsed| parsed <= today);
            if !due {
                continue;
            }
            let details = totals.details.get(date).cloned().unwrap_or_default();
            differences.push(DateDifference {
                date: date.clone(),
                bank_total: bank,
                software_total: software,
                bank_items: details.bank,
                software_items: details.software,
            });
        }

        let total_bank = round_cents(totals.bank.values().copied().sum());
        let total_software = round_cents(totals.software.values().copied().sum());

        Ok(Self {
            reconciled: differences.is_empty(),
            differences,
            total_bank,
            total_software,
        })
    }

    /// Linha de status do relatório: marca de sucesso quando conciliado,
    /// senão a lista das datas divergentes em `dd/mm/yyyy` (mantendo a
    /// representação bruta quando a conversão falha).
    #[must_use]
    pub fn status(&self) -> String {
        if self.reconciled {
            return "✅ Conciliado".to_string();
        }

        let dates: Vec<String> = self
            .differences
            .iter()
            .filter(|diff| !diff.date.is_empty())
            .map(|diff| {
                NaiveDate::parse_from_str(&diff.date, ITEM_DATE_FORMAT).map_or_else(
                    |_| diff.date.clone(),
                    |parsed| parsed.format("%d/%m/%Y").to_string(),
                )
            })
            .collect();

        if dates.is_empty() {
            return "⚠️ Diferenças encontradas, mas sem datas específicas.".to_string();
        }

        let listing: Vec<String> = dates.iter().map(|date| format!("- {date}")).collect();
        format!("❌ Não conciliado nas datas:\n{}", listing.join("\n"))
    }
}

/// Campo presente e não vazio, no sentido do payload da plataforma.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Data específica do lado, com fallback para a data compartilhada; sem
/// nenhuma das duas o lançamento cai no balde de chave vazia.
fn date_key(side_date: &Option<String>, shared_date: &Option<String>) -> String {
    side_date
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| shared_date.as_deref().filter(|s| !s.is_empty()))
        .unwrap_or_default()
        .to_string()
}
