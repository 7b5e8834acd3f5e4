use chrono::NaiveDate;
use inter_condo_concilia::{
    BankTransaction, ConciliaError, Direction, Money, TransactionKind, encode_statement,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

fn transaction(kind: TransactionKind, direction: Direction, amount: &str) -> BankTransaction {
    BankTransaction {
        kind,
        direction,
        amount: money(amount),
        posted_date: "2024-03-05".to_string(),
        description: "Condomino Unidade 12".to_string(),
        title: "Pix recebido".to_string(),
        end_to_end_id: None,
    }
}

#[test]
fn pix_credit_document_is_byte_exact() {
    let trn = BankTransaction {
        end_to_end_id: Some("E00416968202505202050bX9x5sS8lY9".to_string()),
        ..transaction(TransactionKind::Pix, Direction::Credit, "100.00")
    };
    let doc = encode_statement(
        &[trn],
        Some(money("250.00")),
        date(2024, 3, 1),
        date(2024, 3, 31),
        date(2024, 3, 31),
    )
    .unwrap();

    let expected = "OFXHEADER:100\n\n\
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
        <DTSERVER>20240331</DTSERVER>\n\
        <LANGUAGE>POR</LANGUAGE>\n\
        <FI>\n\
        <ORG>Banco Intermedium S/A</ORG>\n\
        <FID>077</FID>\n\
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
        <BANKID>077</BANKID>\n\
        <BRANCHID>0001-9</BRANCHID>\n\
        <ACCTID></ACCTID>\n\
        <ACCTTYPE>CHECKING</ACCTTYPE>\n\
        </BANKACCTFROM>\n\
        <BANKTRANLIST>\n\
        <DTSTART>20240301</DTSTART>\n\
        <DTEND>20240331</DTEND>\n\
        <STMTTRN>\n\
        <TRNTYPE>CREDIT</TRNTYPE>\n\
        <DTPOSTED>20240305</DTPOSTED>\n\
        <TRNAMT>100.00</TRNAMT>\n\
        <FITID>20240305077001</FITID>\n\
        <CHECKNUM>077</CHECKNUM>\n\
        <REFNUM>077</REFNUM>\n\
        <MEMO>Pix recebido: \"Cp :00416968-Condomino Unidade 12\"</MEMO>\n\
        </STMTTRN>\n\
        </BANKTRANLIST>\n\
        <LEDGERBAL>\n\
        <BALAMT>250.00</BALAMT>\n\
        <DTASOF>20240331</DTASOF>\n\
        </LEDGERBAL>\n\
        </STMTRS>\n\
        </STMTTRNRS>\n\
        </BANKMSGSRSV1>\n\
        </OFX>";
    assert_eq!(doc, expected);
}

#[test]
fn fitid_sequence_follows_supplied_order_per_day() {
    let mut first = transaction(TransactionKind::Payment, Direction::Debit, "10.00");
    first.posted_date = "2024-03-04".to_string();
    let second = transaction(TransactionKind::Payment, Direction::Debit, "20.00");
    let third = transaction(TransactionKind::Payment, Direction::Debit, "30.00");
    let mut fourth = transaction(TransactionKind::Payment, Direction::Debit, "40.00");
    fourth.posted_date = "2024-03-04".to_string();

    let doc = encode_statement(
        &[first, second, third, fourth],
        None,
        date(2024, 3, 1),
        date(2024, 3, 31),
        date(2024, 3, 31),
    )
    .unwrap();

    let fitids: Vec<&str> = doc
        .lines()
        .filter(|line| line.starts_with("<FITID>"))
        .collect();
    assert_eq!(
        fitids,
        [
            "<FITID>20240304077001</FITID>",
            "<FITID>20240305077001</FITID>",
            "<FITID>20240305077002</FITID>",
            "<FITID>20240304077002</FITID>",
        ]
    );
}

#[test]
fn encoding_twice_with_same_as_of_is_identical() {
    let transactions = vec![
        transaction(TransactionKind::Pix, Direction::Credit, "100.00"),
        transaction(TransactionKind::CardDebit, Direction::Debit, "55.30"),
    ];
    let encode = || {
        encode_statement(
            &transactions,
            Some(money("10.00")),
            date(2024, 3, 1),
            date(2024, 3, 31),
            date(2024, 3, 15),
        )
        .unwrap()
    };
    assert_eq!(encode(), encode());
}

#[test]
fn debit_amounts_are_negative() {
    let trn = transaction(TransactionKind::Payment, Direction::Debit, "87.65");
    let doc = encode_statement(&[trn], None, date(2024, 3, 1), date(2024, 3, 31), date(2024, 3, 31))
        .unwrap();
    assert!(doc.contains("<TRNAMT>-87.65</TRNAMT>"));
    assert!(doc.contains("<TRNTYPE>PAYMENT</TRNTYPE>"));
}

#[test]
fn pix_debit_maps_to_payment_with_sent_memo() {
    let trn = BankTransaction {
        end_to_end_id: Some("E00416968202505202050bX9x5sS8lY9".to_string()),
        ..transaction(TransactionKind::Pix, Direction::Debit, "42.00")
    };
    let doc = encode_statement(&[trn], None, date(2024, 3, 1), date(2024, 3, 31), date(2024, 3, 31))
        .unwrap();
    assert!(doc.contains("<TRNTYPE>PAYMENT</TRNTYPE>"));
    assert!(doc.contains("<MEMO>Pix enviado: \"Cp :00416968-Condomino Unidade 12\"</MEMO>"));
}

#[test]
fn short_end_to_end_id_yields_empty_pix_code() {
    let trn = BankTransaction {
        end_to_end_id: Some("E12345678".to_string()),
        ..transaction(TransactionKind::Pix, Direction::Credit, "42.00")
    };
    let doc = encode_statement(&[trn], None, date(2024, 3, 1), date(2024, 3, 31), date(2024, 3, 31))
        .unwrap();
    assert!(doc.contains("<MEMO>Pix recebido: \"Cp :-Condomino Unidade 12\"</MEMO>"));
}

#[test]
fn memo_templates_per_kind() {
    let mut auto = transaction(TransactionKind::AutoDebit, Direction::Debit, "10.00");
    auto.description = "CEMIG DISTRIBUICAO".to_string();
    let mut card = transaction(TransactionKind::CardDebit, Direction::Debit, "20.00");
    card.description = " PADARIA CENTRAL ".to_string();
    let mut payment = transaction(TransactionKind::Payment, Direction::Debit, "30.00");
    payment.description = "BOLETO CONDOMINIO".to_string();

    let doc = encode_statement(
        &[auto, card, payment],
        None,
        date(2024, 3, 1),
        date(2024, 3, 31),
        date(2024, 3, 31),
    )
    .unwrap();
    assert!(doc.contains("<MEMO>Debito automatico: \"CEMIG DISTRIBUICAO\"</MEMO>"));
    assert!(doc.contains("<MEMO>Compra no debito: \"No estabelecimento PADARIA CENTRAL\"</MEMO>"));
    assert!(doc.contains("<MEMO>Pagamento efetuado: \"BOLETO CONDOMINIO\"</MEMO>"));
}

#[test]
fn darf_title_overrides_generic_memo() {
    let mut tax = transaction(TransactionKind::TaxDoc, Direction::Debit, "99.00");
    tax.title = "Darf previdenciario".to_string();
    tax.description = "Recolhimento".to_string();
    let mut other = transaction(TransactionKind::Other, Direction::Debit, "12.00");
    other.title = "Tarifa".to_string();
    other.description = "Manutencao de conta".to_string();

    let doc = encode_statement(
        &[tax, other],
        None,
        date(2024, 3, 1),
        date(2024, 3, 31),
        date(2024, 3, 31),
    )
    .unwrap();
    assert!(doc.contains("<MEMO>DARF NUMERADO</MEMO>"));
    assert!(doc.contains("<MEMO>Tarifa: Manutencao de conta</MEMO>"));
}

#[test]
fn pix_template_takes_precedence_over_darf_title() {
    let mut pix = transaction(TransactionKind::Pix, Direction::Debit, "10.00");
    pix.title = "DARF".to_string();
    let doc = encode_statement(&[pix], None, date(2024, 3, 1), date(2024, 3, 31), date(2024, 3, 31))
        .unwrap();
    assert!(doc.contains("<MEMO>Pix enviado: \"Cp :-Condomino Unidade 12\"</MEMO>"));
}

#[test]
fn unknown_kind_maps_to_other_type() {
    let trn = transaction(TransactionKind::Unknown, Direction::Credit, "5.00");
    let doc = encode_statement(&[trn], None, date(2024, 3, 1), date(2024, 3, 31), date(2024, 3, 31))
        .unwrap();
    assert!(doc.contains("<TRNTYPE>OTHER</TRNTYPE>"));
}

#[test]
fn missing_balance_defaults_to_zero() {
    let doc = encode_statement(&[], None, date(2024, 3, 1), date(2024, 3, 31), date(2024, 3, 31))
        .unwrap();
    assert!(doc.contains("<BALAMT>0.00</BALAMT>"));
}

#[test]
fn malformed_posted_date_fails_without_partial_output() {
    let mut trn = transaction(TransactionKind::Payment, Direction::Debit, "10.00");
    trn.posted_date = "05/03/2024".to_string();
    let err = encode_statement(&[trn], None, date(2024, 3, 1), date(2024, 3, 31), date(2024, 3, 31))
        .unwrap_err();
    assert!(matches!(err, ConciliaError::Date { value } if value == "05/03/2024"));
}
