//! Orquestração por condomínio e agregação dos resultados da rodada.
//!
//! As chamadas externas (upload do OFX, liquidação, e-mail) ficam fora do
//! core; este módulo processa um snapshot já buscado e monta os corpos de
//! relatório que a camada de envio usa.

use crate::error::ConciliaError;
use crate::ofx::encode_statement;
use crate::reconcile::Reconciliation;
use crate::settle::{UtilityPayments, match_expenses};
use crate::types::{BankTransaction, Money, PairedItem, PendingExpense, SettlementInstruction};
use crate::utils::fmt_amount;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Dados já buscados de um condomínio para uma rodada.
#[derive(Debug, Clone, Default)]
pub struct CondoSnapshot {
    /// Nome da pasta do condomínio.
    pub name: String,
    /// Transações do extrato no período.
    pub transactions: Vec<BankTransaction>,
    /// Saldo disponível no fim do período.
    pub closing_balance: Option<Money>,
    /// Itens pareados do resultado de conciliação.
    pub paired_items: Vec<PairedItem>,
    /// Despesas pendentes de concessionárias.
    pub expenses: Vec<PendingExpense>,
}

/// Resultado do processamento de um condomínio.
#[derive(Debug, Clone)]
pub struct CondoResult {
    /// Documento OFX pronto para upload.
    pub statement: String,
    /// Análise de conciliação completa, com evidências por data.
    pub reconciliation: Reconciliation,
    /// Resumo que alimenta o relatório da rodada.
    pub outcome: CondoOutcome,
}

/// Resumo de um condomínio para o relatório da rodada.
#[derive(Debug, Clone, PartialEq)]
pub struct CondoOutcome {
    /// Nome do condomínio.
    pub name: String,
    /// Linha de status da conciliação.
    pub reconciliation_status: String,
    /// Instruções de liquidação emitidas.
    pub settlements: Vec<SettlementInstruction>,
}

/// Executa o core completo sobre o snapshot de um condomínio: codifica o
/// extrato, analisa a conciliação e casa as despesas de concessionárias.
///
/// Um erro aborta o condomínio inteiro; quem decide pular ou interromper a
/// rodada é o chamador.
///
/// # Errors
///
/// Propaga os erros de data e valor dos três componentes.
pub fn process_condo(
    snapshot: &CondoSnapshot,
    window_start: NaiveDate,
    window_end: NaiveDate,
    today: NaiveDate,
) -> Result<CondoResult, ConciliaError> {
    let statement = encode_statement(
        &snapshot.transactions,
        snapshot.closing_balance,
        window_start,
        window_end,
        today,
    )?;
    let reconciliation = Reconciliation::analyze(&snapshot.paired_items, today)?;
    let payments = UtilityPayments::locate(&snapshot.transactions);
    let settlements = match_expenses(&snapshot.expenses, &payments, today)?;

    let outcome = CondoOutcome {
        name: snapshot.name.clone(),
        reconciliation_status: reconciliation.status(),
        settlements,
    };

    Ok(CondoResult {
        statement,
        reconciliation,
        outcome,
    })
}

/// Resultados da rodada, em ordem determinística de nome.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    outcomes: BTreeMap<String, CondoOutcome>,
}

impl RunSummary {
    /// Cria um resumo vazio.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra o resultado de um condomínio.
    pub fn record(&mut self, outcome: CondoOutcome) {
        self.outcomes.insert(outcome.name.clone(), outcome);
    }

    /// Itera os resultados em ordem de nome.
    pub fn outcomes(&self) -> impl Iterator<Item = &CondoOutcome> {
        self.outcomes.values()
    }

    /// Corpo do alerta de conciliação, listando apenas os condomínios com
    /// status de falha. `None` quando todos conciliaram.
    #[must_use]
    pub fn reconciliation_alert_body(&self) -> Option<String> {
        let failing: Vec<&CondoOutcome> = self
            .outcomes
            .values()
            .filter(|outcome| outcome.reconciliation_status.starts_with('❌'))
            .collect();
        if failing.is_empty() {
            return None;
        }

        let mut body = String::from("Condomínios com conciliação não finalizada:\n\n");
        for outcome in failing {
            body.push_str(&format!(
                "- {}:\n{}\n\n",
                outcome.name, outcome.reconciliation_status
            ));
        }
        Some(body)
    }

    /// Corpo do relatório de liquidações realizadas. `None` quando nenhuma
    /// despesa foi liquidada na rodada.
    #[must_use]
    pub fn settlement_report_body(&self) -> Option<String> {
        let settled: Vec<&CondoOutcome> = self
            .outcomes
            .values()
            .filter(|outcome| !outcome.settlements.is_empty())
            .collect();
        if settled.is_empty() {
            return None;
        }

        let mut body = String::from("Condomínios com liquidações realizadas:\n\n");
        for outcome in settled {
            body.push_str(&format!("🏢 {}:\n", outcome.name));
            for instruction in &outcome.settlements {
                body.push_str(&format!(
                    "   ✅ {}: R${} em {} (ID {})\n",
                    instruction.category,
                    fmt_amount(instruction.amount),
                    instruction.settlement_date,
                    instruction.expense_id
                ));
            }
            body.push('\n');
        }
        Some(body)
    }
}
