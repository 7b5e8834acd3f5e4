//! Tipos de domínio compartilhados entre o codificador de extrato,
//! a análise de conciliação e a liquidação de despesas.

use rust_decimal::Decimal;

/// Valor monetário, usamos `Decimal` para cálculos exatos.
pub type Money = Decimal;

/// Tipo de transação reportado pelo extrato do Banco Inter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Débito automático em conta.
    AutoDebit,
    /// Transferência Pix (enviada ou recebida).
    Pix,
    /// Pagamento de boleto ou convênio.
    Payment,
    /// Compra no cartão de débito.
    CardDebit,
    /// Linha genérica "OUTROS" do extrato.
    Other,
    /// Recolhimento de tributo (DARF).
    TaxDoc,
    /// Tipo não reconhecido pelo feed.
    Unknown,
}

/// Sentido da movimentação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Entrada de dinheiro.
    Credit,
    /// Saída de dinheiro.
    Debit,
}

/// Transação normalizada do extrato bancário.
///
/// A data permanece como string ISO (`YYYY-MM-DD`); quem consome decide
/// quando interpretar e reporta erro de formato no ponto de uso.
#[derive(Debug, Clone, PartialEq)]
pub struct BankTransaction {
    /// Tipo da transação.
    pub kind: TransactionKind,
    /// Crédito ou débito.
    pub direction: Direction,
    /// Valor sempre positivo; o sinal é derivado de `direction`.
    pub amount: Money,
    /// Data de lançamento no formato `YYYY-MM-DD`.
    pub posted_date: String,
    /// Descrição livre do extrato.
    pub description: String,
    /// Título da linha do extrato.
    pub title: String,
    /// Identificador fim-a-fim de transferências Pix.
    pub end_to_end_id: Option<String>,
}

/// Item pareado do resultado de conciliação da Superlógica.
///
/// Cada lado (banco/software) pode estar presente ou não; valores chegam
/// como strings com vírgula decimal e datas como `MM/DD/YYYY`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairedItem {
    /// Valor do lado banco.
    pub bank_amount: Option<String>,
    /// Valor do lado software.
    pub software_amount: Option<String>,
    /// Data específica do lado banco.
    pub bank_date: Option<String>,
    /// Data específica do lado software.
    pub software_date: Option<String>,
    /// Data compartilhada, usada quando a específica falta.
    pub date: Option<String>,
    /// Descrição do lançamento bancário.
    pub bank_description: Option<String>,
    /// Descrição do lançamento no software.
    pub software_description: Option<String>,
}

/// Despesa pendente da Superlógica aguardando liquidação.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingExpense {
    /// Identificador da despesa.
    pub expense_id: String,
    /// Identificador da parcela.
    pub installment_id: String,
    /// Identificador do contato (fornecedor).
    pub contact_id: String,
    /// Nome do contato.
    pub contact_name: String,
    /// Vencimento da parcela, conforme enviado pela plataforma.
    pub due_date: String,
    /// Forma de pagamento cadastrada.
    pub payment_method_id: String,
    /// Conta bancária vinculada.
    pub bank_account_id: String,
    /// Valor da parcela.
    pub amount: Money,
    /// Condomínio dono da despesa.
    pub condo_id: String,
    /// Contas-categoria apropriadas à despesa.
    pub category_accounts: Vec<String>,
}

/// Concessionária reconhecida pela liquidação automática.
///
/// A ordem dos variantes é a ordem fixa de roteamento: energia antes de água.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UtilityCategory {
    /// CEMIG, conta-categoria 2.2.1.
    Electricity,
    /// COPASA, conta-categoria 2.2.2.
    Water,
}

impl UtilityCategory {
    /// Ordem fixa de verificação das categorias.
    pub const ROUTING_ORDER: [Self; 2] = [Self::Electricity, Self::Water];

    /// Palavra-chave procurada na descrição/título do extrato.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Electricity => "CEMIG",
            Self::Water => "COPASA",
        }
    }

    /// Conta-categoria correspondente no plano de contas.
    #[must_use]
    pub const fn account_code(self) -> &'static str {
        match self {
            Self::Electricity => "2.2.1",
            Self::Water => "2.2.2",
        }
    }
}

impl std::fmt::Display for UtilityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Instrução de liquidação emitida para uma despesa casada com um pagamento.
///
/// Carrega exatamente os campos que a chamada externa de liquidação envia.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementInstruction {
    /// Concessionária que originou o casamento.
    pub category: UtilityCategory,
    /// Identificador da despesa.
    pub expense_id: String,
    /// Identificador da parcela.
    pub installment_id: String,
    /// Identificador do contato.
    pub contact_id: String,
    /// Nome do contato.
    pub contact_name: String,
    /// Data de liquidação no formato `MM/DD/YYYY`.
    pub settlement_date: String,
    /// Forma de pagamento.
    pub payment_method_id: String,
    /// Conta bancária.
    pub bank_account_id: String,
    /// Valor liquidado.
    pub amount: Money,
    /// Condomínio dono da despesa.
    pub condo_id: String,
}
