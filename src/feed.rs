//! Payloads JSON das duas plataformas (extrato do Banco Inter e endpoints
//! da Superlógica) e a conversão para os tipos de domínio.
//!
//! O core nunca toca a rede: recebe estes payloads já buscados e validados
//! pela camada de orquestração.

use crate::error::ConciliaError;
use crate::types::{
    BankTransaction, Direction, Money, PairedItem, PendingExpense, TransactionKind,
};
use crate::utils::parse_dot_amount;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Resposta do extrato enriquecido do Banco Inter.
#[derive(Debug, Clone, Deserialize)]
pub struct InterStatement {
    /// Transações do período.
    #[serde(default)]
    pub transacoes: Vec<InterTransaction>,
}

/// Resposta do endpoint de saldo do Banco Inter.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InterBalance {
    /// Saldo disponível na data consultada.
    #[serde(default)]
    pub disponivel: Option<Money>,
}

/// Transação como o extrato do Inter a reporta.
///
/// O extrato enriquecido traz `dataTransacao`; o extrato simples, usado na
/// liquidação, traz `dataEntrada`. Os demais campos coincidem.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterTransaction {
    /// Tipo da transação (`PIX`, `DEBITO_AUTOMATICO`, ...).
    #[serde(default)]
    pub tipo_transacao: String,
    /// `C` para crédito, `D` para débito.
    #[serde(default)]
    pub tipo_operacao: String,
    /// Valor absoluto da movimentação.
    pub valor: Money,
    /// Data no extrato enriquecido (`YYYY-MM-DD`).
    #[serde(default)]
    pub data_transacao: Option<String>,
    /// Data no extrato simples (`YYYY-MM-DD`).
    #[serde(default)]
    pub data_entrada: Option<String>,
    /// Descrição livre.
    #[serde(default)]
    pub descricao: String,
    /// Título da linha.
    #[serde(default)]
    pub titulo: String,
    /// Detalhes adicionais, presentes em transferências Pix.
    #[serde(default)]
    pub detalhes: Option<InterTransactionDetails>,
}

/// Bloco `detalhes` de uma transação Pix.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterTransactionDetails {
    /// Identificador fim-a-fim da transferência.
    #[serde(default)]
    pub end_to_end_id: Option<String>,
}

impl InterTransaction {
    /// Converte para a transação normalizada de domínio.
    ///
    /// # Errors
    ///
    /// `ConciliaError::Value` para `tipoOperacao` desconhecido e
    /// `ConciliaError::MissingField` quando nenhuma das datas veio.
    pub fn into_domain(self) -> Result<BankTransaction, ConciliaError> {
        let direction = match self.tipo_operacao.as_str() {
            "C" => Direction::Credit,
            "D" => Direction::Debit,
            _ => {
                return Err(ConciliaError::Value {
                    value: self.tipo_operacao,
                    field: "tipoOperacao",
                });
            }
        };
        let posted_date = self
            .data_transacao
            .or(self.data_entrada)
            .ok_or(ConciliaError::MissingField {
                field: "dataTransacao",
            })?;

        Ok(BankTransaction {
            kind: transaction_kind(&self.tipo_transacao),
            direction,
            amount: self.valor,
            posted_date,
            description: self.descricao,
            title: self.titulo,
            end_to_end_id: self.detalhes.and_then(|d| d.end_to_end_id),
        })
    }
}

/// Mapeia o tipo textual do extrato para o enum fechado de domínio.
fn transaction_kind(raw: &str) -> TransactionKind {
    match raw {
        "DEBITO_AUTOMATICO" => TransactionKind::AutoDebit,
        "PIX" => TransactionKind::Pix,
        "PAGAMENTO" => TransactionKind::Payment,
        "COMPRA_DEBITO" => TransactionKind::CardDebit,
        "OUTROS" => TransactionKind::Other,
        "DARF" => TransactionKind::TaxDoc,
        _ => TransactionKind::Unknown,
    }
}

/// Interpreta o JSON do extrato e converte as transações para o domínio.
///
/// # Errors
///
/// `ConciliaError::Json` para payload malformado, além dos erros de
/// conversão de cada transação.
pub fn parse_bank_statement(json: &str) -> Result<Vec<BankTransaction>, ConciliaError> {
    let statement: InterStatement = serde_json::from_str(json)?;
    statement
        .transacoes
        .into_iter()
        .map(InterTransaction::into_domain)
        .collect()
}

/// Lê o arquivo JSON de um extrato salvo e converte as transações.
///
/// # Errors
///
/// `ConciliaError::Io` para falha de leitura, além dos erros de
/// [`parse_bank_statement`].
pub fn load_bank_statement<P: AsRef<Path>>(path: P) -> Result<Vec<BankTransaction>, ConciliaError> {
    let json = fs::read_to_string(path)?;
    parse_bank_statement(&json)
}

/// Item pareado como o endpoint de conciliação o devolve.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPairedItem {
    /// Valor do lado banco, vírgula decimal.
    #[serde(default)]
    pub valor_banco: Option<String>,
    /// Valor do lado software, vírgula decimal.
    #[serde(default)]
    pub valor_software: Option<String>,
    /// Data específica do lado banco.
    #[serde(default)]
    pub data_banco: Option<String>,
    /// Data específica do lado software.
    #[serde(default)]
    pub data_software: Option<String>,
    /// Data compartilhada.
    #[serde(default)]
    pub data: Option<String>,
    /// Descrição do lançamento bancário.
    #[serde(default)]
    pub descricao_banco: Option<String>,
    /// Descrição do lançamento no software.
    #[serde(default)]
    pub descricao_software: Option<String>,
}

impl From<RawPairedItem> for PairedItem {
    fn from(raw: RawPairedItem) -> Self {
        Self {
            bank_amount: raw.valor_banco,
            software_amount: raw.valor_software,
            bank_date: raw.data_banco,
            software_date: raw.data_software,
            date: raw.data,
            bank_description: raw.descricao_banco,
            software_description: raw.descricao_software,
        }
    }
}

/// O endpoint ora devolve a lista diretamente, ora embrulhada em `itens`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PairedItemsPayload {
    List(Vec<RawPairedItem>),
    Wrapped {
        #[serde(default)]
        itens: Vec<RawPairedItem>,
    },
}

/// Interpreta o JSON do resultado de conciliação.
///
/// # Errors
///
/// `ConciliaError::Json` para payload malformado.
pub fn parse_paired_items(json: &str) -> Result<Vec<PairedItem>, ConciliaError> {
    let payload: PairedItemsPayload = serde_json::from_str(json)?;
    let items = match payload {
        PairedItemsPayload::List(items) | PairedItemsPayload::Wrapped { itens: items } => items,
    };
    Ok(items.into_iter().map(PairedItem::from).collect())
}

/// Lê o arquivo JSON de um resultado de conciliação salvo.
///
/// # Errors
///
/// `ConciliaError::Io` para falha de leitura, além dos erros de
/// [`parse_paired_items`].
pub fn load_paired_items<P: AsRef<Path>>(path: P) -> Result<Vec<PairedItem>, ConciliaError> {
    let json = fs::read_to_string(path)?;
    parse_paired_items(&json)
}

/// Despesa pendente como o endpoint de despesas a devolve.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExpense {
    /// Identificador da despesa.
    #[serde(default)]
    pub id_despesa_des: Option<String>,
    /// Identificador da parcela.
    #[serde(default)]
    pub id_parcela_pdes: Option<String>,
    /// Identificador do contato.
    #[serde(default)]
    pub id_contato_con: Option<String>,
    /// Nome do contato.
    #[serde(default)]
    pub st_nome_con: Option<String>,
    /// Vencimento da parcela.
    #[serde(default)]
    pub dt_vencimento_pdes: Option<String>,
    /// Forma de pagamento.
    #[serde(default)]
    pub id_forma_pag: Option<String>,
    /// Conta bancária.
    #[serde(default)]
    pub id_contabanco_cb: Option<String>,
    /// Valor da parcela, ponto decimal.
    #[serde(default)]
    pub vl_valor_pdes: Option<String>,
    /// Condomínio dono da despesa.
    #[serde(default)]
    pub id_condominio_cond: Option<String>,
    /// Apropriações por conta-categoria.
    #[serde(default)]
    pub apropriacao: Vec<RawAppropriation>,
}

/// Uma apropriação da despesa em uma conta-categoria.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAppropriation {
    /// Conta-categoria (`2.2.1`, `2.2.2`, ...).
    #[serde(default)]
    pub st_conta_cont: Option<String>,
}

impl RawExpense {
    /// Converte para a despesa pendente de domínio.
    ///
    /// Identificador, vencimento e valor são obrigatórios para o casamento;
    /// os demais campos viajam como vieram, vazios quando ausentes.
    ///
    /// # Errors
    ///
    /// `ConciliaError::MissingField` para os campos obrigatórios e
    /// `ConciliaError::Amount` para valor malformado.
    pub fn into_domain(self) -> Result<PendingExpense, ConciliaError> {
        let expense_id = self.id_despesa_des.ok_or(ConciliaError::MissingField {
            field: "id_despesa_des",
        })?;
        let due_date = self.dt_vencimento_pdes.ok_or(ConciliaError::MissingField {
            field: "dt_vencimento_pdes",
        })?;
        let raw_amount = self.vl_valor_pdes.ok_or(ConciliaError::MissingField {
            field: "vl_valor_pdes",
        })?;
        let amount = parse_dot_amount(&raw_amount, "vl_valor_pdes")?;

        let category_accounts = self
            .apropriacao
            .into_iter()
            .filter_map(|a| a.st_conta_cont)
            .collect();

        Ok(PendingExpense {
            expense_id,
            installment_id: self.id_parcela_pdes.unwrap_or_default(),
            contact_id: self.id_contato_con.unwrap_or_default(),
            contact_name: self.st_nome_con.unwrap_or_default(),
            due_date,
            payment_method_id: self.id_forma_pag.unwrap_or_default(),
            bank_account_id: self.id_contabanco_cb.unwrap_or_default(),
            amount,
            condo_id: self.id_condominio_cond.unwrap_or_default(),
            category_accounts,
        })
    }
}

/// Interpreta o JSON de despesas pendentes e converte para o domínio.
///
/// # Errors
///
/// `ConciliaError::Json` para payload malformado, além dos erros de
/// conversão de cada despesa.
pub fn parse_pending_expenses(json: &str) -> Result<Vec<PendingExpense>, ConciliaError> {
    let raw: Vec<RawExpense> = serde_json::from_str(json)?;
    raw.into_iter().map(RawExpense::into_domain).collect()
}

/// Lê o arquivo JSON de despesas pendentes salvas.
///
/// # Errors
///
/// `ConciliaError::Io` para falha de leitura, além dos erros de
/// [`parse_pending_expenses`].
pub fn load_pending_expenses<P: AsRef<Path>>(path: P) -> Result<Vec<PendingExpense>, ConciliaError> {
    let json = fs::read_to_string(path)?;
    parse_pending_expenses(&json)
}
