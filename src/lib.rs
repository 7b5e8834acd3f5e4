#![warn(missing_docs)]
//! Conciliação bancária automática de condomínios: codifica o extrato do
//! Banco Inter em OFX para o importador da Superlógica, analisa o resultado
//! de conciliação por data e casa despesas de concessionárias (CEMIG e
//! COPASA) com os débitos do extrato para liquidação automática.

mod error;
mod feed;
mod ofx;
mod reconcile;
mod settle;
mod summary;
mod types;
mod utils;

pub use crate::error::ConciliaError;
pub use crate::feed::{
    InterBalance, InterStatement, InterTransaction, InterTransactionDetails, RawAppropriation,
    RawExpense, RawPairedItem, load_bank_statement, load_paired_items, load_pending_expenses,
    parse_bank_statement, parse_paired_items, parse_pending_expenses,
};
pub use crate::ofx::{BankProfile, INTER, encode_statement};
pub use crate::reconcile::{DateDifference, ItemDetail, Reconciliation};
pub use crate::settle::{UtilityPayments, dates_compatible, match_expenses};
pub use crate::summary::{CondoOutcome, CondoResult, CondoSnapshot, RunSummary, process_condo};
pub use crate::types::*;
pub use crate::utils::{
    current_month_window, extract_short_code, parse_comma_amount, parse_dot_amount,
    parse_flexible_datetime, parse_iso_date, previous_month_window,
};
