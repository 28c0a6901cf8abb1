// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use expense_ledger_rs::{
    ExpenseBook, ExpenseRecord, InvalidExpenseError, Money, ParticipantId, Roster,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Expense Ledger - Work out who owes whom
///
/// Reads shared expenses from a CSV or JSON file and prints balances,
/// settling payments or a spending summary as CSV on stdout.
#[derive(Parser, Debug)]
#[command(name = "expense-ledger")]
#[command(about = "Computes balances and settling payments for shared expenses", long_about = None)]
struct Args {
    /// Path to the expense file
    ///
    /// `.json` files hold the stored expense list; anything else is read as
    /// CSV with columns: id,title,amount,paid_by,participants,date
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Participant taking part in the ledger (repeatable)
    ///
    /// Defaults to everyone named in the input.
    #[arg(
        short,
        long = "participant",
        value_name = "NAME",
        env = "EXPENSE_LEDGER_PARTICIPANTS",
        value_delimiter = ','
    )]
    participants: Vec<String>,

    /// Report to print
    #[arg(short, long, value_enum, default_value_t = Report::Balances)]
    report: Report,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Report {
    /// participant,balance
    Balances,
    /// from,to,amount
    Settlements,
    /// participant,paid,balance
    Summary,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Expense(#[from] InvalidExpenseError),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let expenses = if is_json(&args.input) {
        read_json_expenses(BufReader::new(file))
    } else {
        match read_csv_expenses(BufReader::new(file)) {
            Ok(expenses) => expenses,
            Err(e) => {
                eprintln!("Error reading expenses: {}", e);
                process::exit(1);
            }
        }
    };

    let book = build_book(&args.participants, expenses);

    let result = match args.report {
        Report::Balances => write_balances(&book, io::stdout()),
        Report::Settlements => write_settlements(&book, io::stdout()),
        Report::Summary => write_summary(&book, io::stdout()),
    };
    if let Err(e) = result {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Raw CSV record matching the input format.
///
/// Fields: `id, title, amount, paid_by, participants, date`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    id: String,
    #[serde(default)]
    title: String,
    amount: String,
    paid_by: String,
    participants: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    date: Option<DateTime<Utc>>,
}

impl CsvRecord {
    /// Converts the row to an expense. Participants are `;`-separated.
    ///
    /// The amount is parsed strictly: more than two decimals is an error.
    fn into_expense(self) -> Result<ExpenseRecord, InvalidExpenseError> {
        let amount: Money = self.amount.parse()?;
        let participants = self
            .participants
            .split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ParticipantId::from);

        let mut expense = ExpenseRecord::new(self.id, amount, self.paid_by, participants)
            .with_title(self.title);
        expense.date = self.date;
        Ok(expense)
    }
}

/// Read expenses from a CSV reader.
///
/// # CSV Format
///
/// ```csv
/// id,title,amount,paid_by,participants,date
/// 1,Dinner,90.00,Juan,Juan;María;Pedro,2025-03-01T20:15:00Z
/// 2,Taxi,12.50,María,María;Pedro,
/// ```
///
/// Malformed rows are skipped with a warning.
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the header is unreadable.
fn read_csv_expenses<R: Read>(reader: R) -> Result<Vec<ExpenseRecord>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true) // Allow a missing date column
        .has_headers(true)
        .from_reader(reader);

    let mut expenses = Vec::new();
    for (line, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        let expense = result
            .map_err(CliError::from)
            .and_then(|record| record.into_expense().map_err(CliError::from));
        match expense {
            Ok(expense) => expenses.push(expense),
            Err(e) => warn!(row = line + 1, "skipping malformed row: {e}"),
        }
    }
    Ok(expenses)
}

/// Decode a stored expense list.
///
/// A file that is not a JSON array is treated as an empty list, the same way
/// the store itself treats it. Records inside the array that do not decode
/// are skipped with a warning.
fn read_json_expenses<R: Read>(reader: R) -> Vec<ExpenseRecord> {
    let records: Vec<serde_json::Value> = match serde_json::from_reader(reader) {
        Ok(records) => records,
        Err(e) => {
            warn!("stored expense list is unreadable, treating as empty: {e}");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(expense) => Some(expense),
            Err(e) => {
                warn!(record = index, "skipping malformed record: {e}");
                None
            }
        })
        .collect()
}

/// Record `expenses` in a book for the given roster, skipping the ones that
/// do not validate.
///
/// An empty `participants` list means "everyone named in the expenses".
fn build_book(participants: &[String], expenses: Vec<ExpenseRecord>) -> ExpenseBook {
    let roster = if participants.is_empty() {
        Roster::from_expenses(&expenses)
    } else {
        Roster::new(participants.iter().map(String::as_str))
    };

    let mut book = ExpenseBook::new(roster);
    for expense in expenses {
        let id = expense.id.clone();
        if let Err(e) = book.add(expense) {
            warn!(expense = %id, "skipping expense: {e}");
        }
    }
    book
}

#[derive(Serialize)]
struct BalanceRow<'a> {
    participant: &'a ParticipantId,
    balance: Money,
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    participant: &'a ParticipantId,
    paid: Money,
    balance: Money,
}

#[derive(Serialize)]
struct TotalsRow {
    total: Money,
    average: Money,
    expenses: usize,
}

/// Write one `participant,balance` row per roster member.
fn write_balances<W: Write>(book: &ExpenseBook, writer: W) -> Result<(), CliError> {
    let balances = book.balances()?;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(["participant", "balance"])?;
    for (participant, balance) in balances.iter() {
        wtr.serialize(BalanceRow {
            participant,
            balance,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the settling payments as `from,to,amount` rows, in payment order.
fn write_settlements<W: Write>(book: &ExpenseBook, writer: W) -> Result<(), CliError> {
    let transactions = book.settlement()?;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(["from", "to", "amount"])?;
    for tx in &transactions {
        wtr.serialize(tx)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write `participant,paid,balance` rows, then a `total,average,expenses`
/// section with the group totals.
fn write_summary<W: Write>(book: &ExpenseBook, writer: W) -> Result<(), CliError> {
    let summary = book.summary()?;
    let balances = book.balances()?;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(["participant", "paid", "balance"])?;
    for (participant, paid) in &summary.paid_by_participant {
        wtr.serialize(SummaryRow {
            participant,
            paid: *paid,
            balance: balances.get(participant).unwrap_or(Money::ZERO),
        })?;
    }

    wtr.write_record(["total", "average", "expenses"])?;
    wtr.serialize(TotalsRow {
        total: summary.total,
        average: summary.average_per_participant,
        expenses: summary.expense_count,
    })?;

    wtr.flush()?;
    Ok(())
}
