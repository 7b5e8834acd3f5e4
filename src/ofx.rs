//! Codificador do extrato bancário para o documento OFX legado que o
//! importador da Superlógica consome.
//!
//! O formato é o OFX/SGML 1.02 com elementos planos sem fechamento, e a
//! saída precisa ser reproduzida byte a byte para manter compatibilidade
//! com o importador.

use crate::error::ConciliaError;
use crate::types::{BankTransaction, Direction, Money, TransactionKind};
use crate::utils::{fmt_amount, parse_iso_date};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Identidade fixa da conta no Banco Inter.
///
/// O número da conta é emitido vazio; limitação conhecida do fluxo original
/// que o importador já tolera.
#[derive(Debug, Clone, Copy)]
pub struct BankProfile {
    /// Nome da instituição.
    pub org: &'static str,
    /// Código do banco, também usado como prefixo de FITID.
    pub bank_id: &'static str,
    /// Agência.
    pub branch_id: &'static str,
    /// Número da conta.
    pub account_id: &'static str,
}

/// Perfil único suportado: Banco Inter.
pub const INTER: BankProfile = BankProfile {
    org: "Banco Intermedium S/A",
    bank_id: "077",
    branch_id: "0001-9",
    account_id: "",
};

/// Converte a lista de transações em um documento OFX.
///
/// `window_start`/`window_end` são as datas do filtro usado na busca do
/// extrato (vão para `DTSTART`/`DTEND`, independentemente das datas das
/// transações). `as_of` alimenta `DTSERVER` e `DTASOF`; com o mesmo `as_of`
/// e a mesma lista, a saída é idêntica byte a byte, FITIDs inclusive.
///
/// # Errors
///
/// `ConciliaError::Date` quando a data de lançamento de alguma transação
/// não está em `YYYY-MM-DD`; nenhum documento parcial é retornado.
pub fn encode_statement(
    transactions: &[BankTransaction],
    closing_balance: Option<Money>,
    window_start: NaiveDate,
    window_end: NaiveDate,
    as_of: NaiveDate,
) -> Result<String, ConciliaError> {
    let mut doc = String::new();
    let stamp = as_of.format("%Y%m%d");
    let _ = write!(
        doc,
        "OFXHEADER:100\n\n\
         DATA:OFXSGML\n\
         VERSION:102\n\
         SECURITY:NONE\n\
         ENCODING:USASCII\n\
         CHARSET:1252\n\
         COMPRESSION:NONE\n\
         OLDFILEUID:NONE\n\
         NEWFILEUID:NONE\n\n\
         <OFX>\n\
         <SIGNONMSGSRSV1>\n\
         <SONRS>\n\
         <STATUS>\n\
         <CODE>0</CODE>\n\
         <SEVERITY>INFO</SEVERITY>\n\
         </STATUS>\n\
         <DTSERVER>{stamp}</DTSERVER>\n\
         <LANGUAGE>POR</LANGUAGE>\n\
         <FI>\n\
         <ORG>{org}</ORG>\n\
         <FID>{bank}</FID>\n\
         </FI>\n\
         </SONRS>\n\
         </SIGNONMSGSRSV1>\n\
         <BANKMSGSRSV1>\n\
         <STMTTRNRS>\n\
         <TRNUID>1001</TRNUID>\n\
         <STATUS>\n\
         <CODE>0</CODE>\n\
         <SEVERITY>INFO</SEVERITY>\n\
         </STATUS>\n\
         <STMTRS>\n\
         <CURDEF>BRL</CURDEF>\n\
         <BANKACCTFROM>\n\
         <BANKID>{bank}</BANKID>\n\
         <BRANCHID>{branch}</BRANCHID>\n\
         <ACCTID>{acct}</ACCTID>\n\
         <ACCTTYPE>CHECKING</ACCTTYPE>\n\
         </BANKACCTFROM>\n\
         <BANKTRANLIST>\n\
         <DTSTART>{start}</DTSTART>\n\
         <DTEND>{end}</DTEND>\n",
        stamp = stamp,
        org = INTER.org,
        bank = INTER.bank_id,
        branch = INTER.branch_id,
        acct = INTER.account_id,
        start = window_start.format("%Y%m%d"),
        end = window_end.format("%Y%m%d"),
    );

    // Sequencial de FITID por dia, na ordem em que as transações chegaram.
    let mut fitid_counters: BTreeMap<String, u32> = BTreeMap::new();

    for trn in transactions {
        let posted = parse_iso_date(&trn.posted_date)?.format("%Y%m%d").to_string();
        let counter = fitid_counters.entry(posted.clone()).or_insert(0);
        *counter += 1;
        let fitid = format!("{posted}{}{:03}", INTER.bank_id, *counter);

        let amount = match trn.direction {
            Direction::Debit => -trn.amount,
            Direction::Credit => trn.amount,
        };

        let _ = write!(
            doc,
            "<STMTTRN>\n\
             <TRNTYPE>{trn_type}</TRNTYPE>\n\
             <DTPOSTED>{posted}</DTPOSTED>\n\
             <TRNAMT>{amount}</TRNAMT>\n\
             <FITID>{fitid}</FITID>\n\
             <CHECKNUM>{bank}</CHECKNUM>\n\
             <REFNUM>{bank}</REFNUM>\n\
             <MEMO>{memo}</MEMO>\n\
             </STMTTRN>\n",
            trn_type = trn_type(trn.kind, trn.direction),
            amount = fmt_amount(amount),
            memo = memo_for(trn),
            bank = INTER.bank_id,
        );
    }

    let balance = closing_balance.unwrap_or(Decimal::ZERO);
    let _ = write!(
        doc,
        "</BANKTRANLIST>\n\
         <LEDGERBAL>\n\
         <BALAMT>{balance}</BALAMT>\n\
         <DTASOF>{stamp}</DTASOF>\n\
         </LEDGERBAL>\n\
         </STMTRS>\n\
         </STMTTRNRS>\n\
         </BANKMSGSRSV1>\n\
         </OFX>",
        balance = fmt_amount(balance),
    );

    Ok(doc)
}

/// Mapeia tipo e sentido da transação para o `TRNTYPE` do OFX.
///
/// Pix é o único tipo cujo mapeamento depende do sentido; tipos não
/// reconhecidos viram o genérico `OTHER`.
const fn trn_type(kind: TransactionKind, direction: Direction) -> &'static str {
    match kind {
        TransactionKind::Pix => match direction {
            Direction::Credit => "CREDIT",
            Direction::Debit => "PAYMENT",
        },
        TransactionKind::AutoDebit
        | TransactionKind::Payment
        | TransactionKind::CardDebit
        | TransactionKind::Other
        | TransactionKind::TaxDoc => "PAYMENT",
        TransactionKind::Unknown => "OTHER",
    }
}

/// Monta o memo da transação seguindo a ordem fixa de prioridade:
/// débito automático, Pix, compra no débito, pagamento, marcador DARF no
/// título e por fim o modelo genérico `título: descrição`.
fn memo_for(trn: &BankTransaction) -> String {
    match trn.kind {
        TransactionKind::AutoDebit => {
            format!("Debito automatico: \"{}\"", trn.description)
        }
        TransactionKind::Pix => {
            let pix_id = pix_identifier(trn.end_to_end_id.as_deref());
            let verb = match trn.direction {
                Direction::Credit => "recebido",
                Direction::Debit => "enviado",
            };
            format!("Pix {verb}: \"Cp :{pix_id}-{}\"", trn.description)
        }
        TransactionKind::CardDebit => {
            format!(
                "Compra no debito: \"No estabelecimento {}\"",
                trn.description.trim()
            )
        }
        TransactionKind::Payment => {
            format!("Pagamento efetuado: \"{}\"", trn.description)
        }
        TransactionKind::Other | TransactionKind::TaxDoc | TransactionKind::Unknown => {
            if trn.title.to_uppercase().contains("DARF") {
                "DARF NUMERADO".to_string()
            } else {
                format!("{}: {}", trn.title, trn.description)
            }
        }
    }
}

/// Extrai o código do identificador fim-a-fim do Pix: descarta o primeiro
/// caractere e toma os oito seguintes. Identificador ausente ou curto
/// demais vira string vazia.
fn pix_identifier(end_to_end_id: Option<&str>) -> String {
    match end_to_end_id {
        Some(id) if id.chars().count() > 9 => id.chars().skip(1).take(8).collect(),
        _ => String::new(),
    }
}
