//! The command line front end for the thu chi ledger.

mod cli;
mod output;

use std::{error::Error, process::ExitCode};

use clap::Parser;
use rusqlite::Connection;
use time::UtcOffset;

use thu_chi::{
    LedgerConfig, SQLiteLedger, Session, create_sqlite_ledger,
    models::{
        AccountChanges, AccountId, NewAccount, Transaction, TransactionChanges,
        TransactionTypeChanges, TransactionTypeName, Username,
    },
    query::FilterParams,
    setup_logging,
};

use crate::{
    cli::{AccountCommand, Cli, Command, TransactionCommand, TransactionTypeCommand},
    output::{
        Output, account_table, dashboard_table, print_error, prompt_new_password,
        prompt_password, statistics_table, transaction_type_table, view_table,
    },
};

fn main() -> ExitCode {
    // The local offset can only be read while the process has a single thread.
    let local_offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    let args = Cli::parse();

    if let Err(error) = setup_logging(args.log_file.as_deref()) {
        print_error(format!("Could not open the log file: {error}"));
        return ExitCode::FAILURE;
    }

    match run(args, local_offset) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            print_error(error);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Cli, local_offset: UtcOffset) -> Result<(), Box<dyn Error>> {
    let connection = Connection::open(&args.db_path)?;
    let ledger = create_sqlite_ledger(
        connection,
        LedgerConfig {
            password_cost: args.password_cost,
            ..Default::default()
        },
    )?;
    let output = Output {
        json: args.json,
        local_offset,
    };

    let Some(username) = args.username else {
        return Err("No username given. Use --username or set THU_CHI_USER.".into());
    };

    match args.command {
        Command::Init { display_name } => {
            let Some(password) = prompt_new_password()? else {
                return Ok(());
            };
            let account = ledger.register_first_account(NewAccount {
                username,
                password,
                display_name,
            })?;

            output.done(
                &format!("Registered {} at {:?}.", account.username, args.db_path),
                &account,
            )?;

            Ok(())
        }
        command => {
            let Some(password) = prompt_password(&format!("Password for {username}: "))? else {
                return Ok(());
            };
            let Some(session) = ledger.log_in(&username, &password)? else {
                return Err("Incorrect username or password.".into());
            };

            run_command(&ledger, &session, output, command)
        }
    }
}

fn run_command(
    ledger: &SQLiteLedger,
    session: &Session,
    output: Output,
    command: Command,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Init { .. } => Err(thu_chi::Error::AlreadyRegistered.into()),
        Command::Transaction(command) => run_transaction_command(ledger, session, output, command),
        Command::Stats(filter_args) => {
            let spec = FilterParams::from(filter_args).into_spec();
            let view = ledger.view(&spec)?;

            output.print(&view.statistics, statistics_table)?;
            Ok(())
        }
        Command::Dashboard => {
            output.print(&ledger.dashboard()?, dashboard_table)?;
            Ok(())
        }
        Command::Type(command) => run_transaction_type_command(ledger, session, output, command),
        Command::Account(command) => run_account_command(ledger, session, output, command),
        Command::History { user, kind } => {
            let records = match (user, kind) {
                (Some(user), Some(kind)) => ledger
                    .activity_by_username(&user)?
                    .into_iter()
                    .filter(|record| record.kind == kind)
                    .collect(),
                (Some(user), None) => ledger.activity_by_username(&user)?,
                (None, Some(kind)) => ledger.activity_by_kind(kind)?,
                (None, None) => ledger.list_activity()?,
            };

            output.print(&records, |records| output.activity_table(records))?;
            Ok(())
        }
    }
}

fn run_transaction_command(
    ledger: &SQLiteLedger,
    session: &Session,
    output: Output,
    command: TransactionCommand,
) -> Result<(), Box<dyn Error>> {
    match command {
        TransactionCommand::Add {
            amount,
            date,
            description,
            type_id,
            status,
        } => {
            let transaction_type = match ledger.get_transaction_type(type_id) {
                Err(thu_chi::Error::NotFound) => {
                    return Err(thu_chi::Error::InvalidTransactionType(type_id).into());
                }
                result => result?,
            };
            let transaction = ledger.create_transaction(
                session,
                Transaction::build(amount, date, &description, transaction_type).status(status),
            )?;

            output.done(
                &format!("Created transaction {}.", transaction.id),
                &transaction,
            )?;
        }
        TransactionCommand::Edit {
            id,
            amount,
            date,
            description,
            type_id,
            status,
        } => {
            let transaction = ledger.update_transaction(
                session,
                id,
                TransactionChanges {
                    date,
                    amount,
                    description,
                    status,
                    category_id: type_id,
                },
            )?;

            output.done(&format!("Updated transaction {id}."), &transaction)?;
        }
        TransactionCommand::Delete { id } => {
            ledger.delete_transaction(session, id)?;
            output.done(&format!("Deleted transaction {id}."), &id)?;
        }
        TransactionCommand::List(filter_args) => {
            let spec = FilterParams::from(filter_args).into_spec();
            let view = ledger.view(&spec)?;

            tracing::debug!("{} transactions match", view.transactions.len());
            output.print(&view, view_table)?;
        }
    }

    Ok(())
}

fn run_transaction_type_command(
    ledger: &SQLiteLedger,
    session: &Session,
    output: Output,
    command: TransactionTypeCommand,
) -> Result<(), Box<dyn Error>> {
    match command {
        TransactionTypeCommand::Add { name, kind } => {
            let transaction_type =
                ledger.create_transaction_type(session, TransactionTypeName::new(&name)?, kind)?;

            output.done(
                &format!("Created transaction type {}.", transaction_type.id),
                &transaction_type,
            )?;
        }
        TransactionTypeCommand::Edit { id, name, kind } => {
            let changes = TransactionTypeChanges {
                name: name.as_deref().map(TransactionTypeName::new).transpose()?,
                kind,
            };
            let transaction_type = ledger.update_transaction_type(session, id, changes)?;

            output.done(&format!("Updated transaction type {id}."), &transaction_type)?;
        }
        TransactionTypeCommand::Delete { id } => {
            ledger.delete_transaction_type(session, id)?;
            output.done(&format!("Deleted transaction type {id}."), &id)?;
        }
        TransactionTypeCommand::List { kind } => {
            let transaction_types = match kind {
                Some(kind) => ledger.list_transaction_types_by_kind(kind)?,
                None => ledger.list_transaction_types()?,
            };

            output.print(&transaction_types, |types| transaction_type_table(types))?;
        }
    }

    Ok(())
}

fn run_account_command(
    ledger: &SQLiteLedger,
    session: &Session,
    output: Output,
    command: AccountCommand,
) -> Result<(), Box<dyn Error>> {
    match command {
        AccountCommand::Add {
            username,
            display_name,
        } => {
            let Some(password) = prompt_new_password()? else {
                return Ok(());
            };
            let account = ledger.create_account(
                session,
                NewAccount {
                    username,
                    password,
                    display_name,
                },
            )?;

            output.done(&format!("Created account {}.", account.id), &account)?;
        }
        AccountCommand::Edit {
            id,
            new_username,
            display_name,
        } => {
            let changes = AccountChanges {
                username: new_username.as_deref().map(Username::new).transpose()?,
                display_name,
            };
            let account = ledger.update_account(session, AccountId::new(id), changes)?;

            output.done(&format!("Updated account {id}."), &account)?;
        }
        AccountCommand::Passwd { account } => {
            let account_id = match account {
                Some(username) => {
                    ledger
                        .get_account_by_username(&username)?
                        .ok_or(thu_chi::Error::NotFound)?
                        .id
                }
                None => session.account_id(),
            };
            let Some(password) = prompt_new_password()? else {
                return Ok(());
            };

            ledger.change_password(session, account_id, &password)?;
            output.done("Password updated successfully!", &account_id)?;
        }
        AccountCommand::Delete { id } => {
            ledger.delete_account(session, AccountId::new(id))?;
            output.done(&format!("Deleted account {id}."), &id)?;
        }
        AccountCommand::List => {
            output.print(&ledger.list_accounts()?, |accounts| account_table(accounts))?;
        }
    }

    Ok(())
}
