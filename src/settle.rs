//! Casamento de despesas pendentes de concessionárias com os débitos do
//! extrato e emissão das instruções de liquidação.

use crate::error::ConciliaError;
use crate::types::{
    BankTransaction, Direction, PendingExpense, SettlementInstruction, UtilityCategory,
};
use crate::utils::parse_flexible_datetime;
use chrono::{NaiveDate, TimeDelta};
use rust_decimal::Decimal;

/// Janela de tolerância entre vencimento e pagamento, em dias.
const TOLERANCE_DAYS: i64 = 5;

/// Diferença de valor estritamente abaixo de um centavo casa.
const CENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Débitos do extrato separados por concessionária.
///
/// Um mesmo débito pode aparecer nas duas listas quando descrição e título
/// citam ambas as concessionárias.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UtilityPayments {
    /// Débitos atribuídos à CEMIG.
    pub electricity: Vec<BankTransaction>,
    /// Débitos atribuídos à COPASA.
    pub water: Vec<BankTransaction>,
}

impl UtilityPayments {
    /// Varre o extrato e separa os débitos que citam cada concessionária
    /// na descrição ou no título (comparação sem caixa). Créditos são
    /// ignorados.
    #[must_use]
    pub fn locate(transactions: &[BankTransaction]) -> Self {
        let mut payments = Self::default();
        for trn in transactions {
            if trn.direction != Direction::Debit {
                continue;
            }
            let description = trn.description.to_uppercase();
            let title = trn.title.to_uppercase();
            for category in UtilityCategory::ROUTING_ORDER {
                let keyword = category.keyword();
                if description.contains(keyword) || title.contains(keyword) {
                    payments.bucket_mut(category).push(trn.clone());
                }
            }
        }
        payments
    }

    /// Candidatos de uma categoria, na ordem do extrato.
    #[must_use]
    pub fn for_category(&self, category: UtilityCategory) -> &[BankTransaction] {
        match category {
            UtilityCategory::Electricity => &self.electricity,
            UtilityCategory::Water => &self.water,
        }
    }

    fn bucket_mut(&mut self, category: UtilityCategory) -> &mut Vec<BankTransaction> {
        match category {
            UtilityCategory::Electricity => &mut self.electricity,
            UtilityCategory::Water => &mut self.water,
        }
    }
}

/// Casa cada despesa pendente com no máximo um pagamento e monta as
/// instruções de liquidação.
///
/// A despesa é roteada para a primeira categoria cuja conta aparece em suas
/// apropriações (energia antes de água); sem categoria, é pulada em
/// silêncio. Dentro da categoria vale o primeiro pagamento cuja diferença de
/// valor fica abaixo de um centavo e cuja data respeita a tolerância; o
/// pagamento casado não sai da lista de candidatos, então um mesmo débito
/// pode liquidar mais de uma despesa.
///
/// # Errors
///
/// `ConciliaError::Date` quando vencimento ou data de pagamento não estão
/// em nenhum dos formatos aceitos.
pub fn match_expenses(
    expenses: &[PendingExpense],
    payments: &UtilityPayments,
    today: NaiveDate,
) -> Result<Vec<SettlementInstruction>, ConciliaError> {
    let mut instructions = Vec::new();

    for expense in expenses {
        let Some(category) = route_category(expense) else {
            continue;
        };
        for payment in payments.for_category(category) {
            if (payment.amount - expense.amount).abs() < CENT_TOLERANCE
                && dates_compatible(&expense.due_date, &payment.posted_date)?
            {
                instructions.push(build_instruction(
                    expense,
                    category,
                    &payment.posted_date,
                    today,
                ));
                break;
            }
        }
    }

    Ok(instructions)
}

/// Primeira categoria cuja conta aparece nas apropriações da despesa.
fn route_category(expense: &PendingExpense) -> Option<UtilityCategory> {
    UtilityCategory::ROUTING_ORDER
        .into_iter()
        .find(|category| {
            expense
                .category_accounts
                .iter()
                .any(|account| account == category.account_code())
        })
}

/// Pagamento dentro de `[vencimento, vencimento + tolerância]`, inclusivo.
///
/// As duas datas passam pela lista priorizada de formatos aceitos.
///
/// # Errors
///
/// `ConciliaError::Date` quando alguma das datas não interpreta.
pub fn dates_compatible(due_date: &str, payment_date: &str) -> Result<bool, ConciliaError> {
    let due = parse_flexible_datetime(due_date)?;
    let paid = parse_flexible_datetime(payment_date)?;
    Ok(due <= paid && paid <= due + TimeDelta::days(TOLERANCE_DAYS))
}

/// Monta a instrução com os campos que a chamada de liquidação envia.
fn build_instruction(
    expense: &PendingExpense,
    category: UtilityCategory,
    payment_date: &str,
    today: NaiveDate,
) -> SettlementInstruction {
    SettlementInstruction {
        category,
        expense_id: expense.expense_id.clone(),
        installment_id: expense.installment_id.clone(),
        contact_id: expense.contact_id.clone(),
        contact_name: expense.contact_name.clone(),
        settlement_date: settlement_date(payment_date, today),
        payment_method_id: expense.payment_method_id.clone(),
        bank_account_id: expense.bank_account_id.clone(),
        amount: expense.amount,
        condo_id: expense.condo_id.clone(),
    }
}

/// Reformata a data do pagamento de ISO para `MM/DD/YYYY`, caindo para a
/// data de hoje quando o formato não é o esperado.
fn settlement_date(payment_date: &str, today: NaiveDate) -> String {
    NaiveDate::parse_from_str(payment_date, "%Y-%m-%d").map_or_else(
        |_| today.format("%m/%d/%Y").to_string(),
        |parsed| parsed.format("%m/%d/%Y").to_string(),
    )
}
