use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use thu_chi::{
    LedgerConfig, create_sqlite_ledger,
    models::{NewAccount, Transaction, TransactionKind, TransactionStatus, TransactionTypeName},
    query::aggregate,
};

/// A utility for creating a test database for the thu chi ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const USERNAME: &str = "test";
const PASSWORD: &str = "quietpelicanmarblehorizon42";

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let ledger = create_sqlite_ledger(conn, LedgerConfig::default())?;

    println!("Creating test user {USERNAME:?} with password {PASSWORD:?}...");
    ledger.register_first_account(NewAccount {
        username: USERNAME.to_owned(),
        password: PASSWORD.to_owned(),
        display_name: "Người Dùng Thử".to_owned(),
    })?;
    let session = ledger
        .log_in(USERNAME, PASSWORD)?
        .ok_or("could not log in as the test user")?;

    println!("Creating transaction types...");
    let mut types = Vec::new();
    for (name, kind) in [
        ("Lương", TransactionKind::Income),
        ("Thưởng", TransactionKind::Income),
        ("Ăn uống", TransactionKind::Expense),
        ("Đi lại", TransactionKind::Expense),
        ("Hóa đơn", TransactionKind::Expense),
    ] {
        let name = TransactionTypeName::new(name)?;
        types.push(ledger.create_transaction_type(&session, name, kind)?);
    }
    let [salary, bonus, food, travel, bills] = types.as_slice() else {
        return Err("expected five transaction types".into());
    };

    println!("Creating transactions...");
    let today = OffsetDateTime::now_utc().date();
    let mut new_transactions = Vec::new();

    for month in 0..3 {
        let month_start = today - Duration::days(30 * month);

        new_transactions.push(
            Transaction::build(
                Decimal::from(15_000_000),
                month_start,
                "Lương tháng",
                salary.clone(),
            )
            .status(TransactionStatus::Completed),
        );
        new_transactions.push(
            Transaction::build(
                Decimal::from(1_200_000),
                month_start - Duration::days(3),
                "Tiền điện nước",
                bills.clone(),
            )
            .status(TransactionStatus::Completed),
        );

        for day in 0..10 {
            let date = month_start - Duration::days(day * 2 + 1);
            new_transactions.push(Transaction::build(
                Decimal::new(45_000 + day * 5_000, 0),
                date,
                "Ăn trưa",
                food.clone(),
            ));
            new_transactions.push(Transaction::build(
                Decimal::new(125_500, 1),
                date,
                "Xe buýt",
                travel.clone(),
            ));
        }
    }

    new_transactions.push(Transaction::build(
        Decimal::from(2_000_000),
        today,
        "Thưởng dự án",
        bonus.clone(),
    ));

    let transactions = ledger.create_transactions(&session, new_transactions)?;
    let balance = aggregate(&transactions).balance;

    println!(
        "Created {} transactions with a balance of {balance}.",
        transactions.len()
    );
    println!("Success!");

    Ok(())
}
