//! CLI de exemplo: converte um extrato JSON do Banco Inter em OFX e,
//! opcionalmente, imprime o status de conciliação de um resultado salvo.

use std::env;

use chrono::Local;
use inter_condo_concilia::{
    Reconciliation, current_month_window, encode_statement, load_bank_statement,
    load_paired_items,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let Some(statement_path) = args.next() else {
        println!("Usage: inter-condo-concilia <extrato.json> [conciliacao.json]");
        return Ok(());
    };

    let today = Local::now().date_naive();
    let (window_start, window_end) = current_month_window(today);

    let transactions = load_bank_statement(&statement_path)?;
    let document = encode_statement(&transactions, None, window_start, window_end, today)?;
    println!("{document}");

    if let Some(reconciliation_path) = args.next() {
        let items = load_paired_items(&reconciliation_path)?;
        let analysis = Reconciliation::analyze(&items, today)?;
        eprintln!("{}", analysis.status());
    }

    Ok(())
}
