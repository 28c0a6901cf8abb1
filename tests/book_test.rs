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

//! Expense book public API integration tests.

use chrono::{TimeZone, Utc};
use expense_ledger_rs::{
    ExpenseBook, ExpenseId, ExpenseRecord, InvalidExpenseError, LedgerError, Money,
    ParticipantId, Roster,
};

fn make_book() -> ExpenseBook {
    ExpenseBook::new(Roster::new(["Juan", "María", "Pedro"]))
}

fn make_expense(id: &str, cents: i64, paid_by: &str) -> ExpenseRecord {
    ExpenseRecord::new(id, Money::from_cents(cents), paid_by, ["Juan", "María", "Pedro"])
}

#[test]
fn new_book_is_empty_and_settled() {
    let book = make_book();

    assert!(book.is_empty());
    assert!(book.balances().unwrap().is_settled());
    assert!(book.settlement().unwrap().is_empty());
}

#[test]
fn add_then_settle() {
    let mut book = make_book();
    book.add(make_expense("1", 9000, "Juan")).unwrap();

    let payments = book.settlement().unwrap();

    assert_eq!(payments.len(), 2);
    assert!(payments.iter().all(|tx| tx.to == ParticipantId::from("Juan")));
}

#[test]
fn add_rejects_empty_participants() {
    let mut book = make_book();
    let expense = ExpenseRecord::new("1", Money::from_cents(100), "Juan", Vec::<&str>::new());

    let result = book.add(expense);

    assert_eq!(
        result,
        Err(LedgerError::InvalidExpense(
            InvalidExpenseError::EmptyParticipants(ExpenseId::from("1"))
        ))
    );
    assert!(book.is_empty());
}

#[test]
fn add_rejects_stranger() {
    let mut book = make_book();
    let expense = ExpenseRecord::new("1", Money::from_cents(100), "Ana", ["Juan"]);

    assert!(matches!(
        book.add(expense),
        Err(LedgerError::InvalidExpense(InvalidExpenseError::UnknownParticipant(..)))
    ));
}

#[test]
fn update_changes_balances() {
    let mut book = make_book();
    book.add(make_expense("1", 9000, "Juan")).unwrap();

    book.update(make_expense("1", 9000, "María")).unwrap();

    let balances = book.balances().unwrap();
    assert_eq!(
        balances.get(&ParticipantId::from("María")),
        Some(Money::from_cents(6000))
    );
    assert_eq!(
        balances.get(&ParticipantId::from("Juan")),
        Some(Money::from_cents(-3000))
    );
}

#[test]
fn update_rejects_invalid_version() {
    let mut book = make_book();
    book.add(make_expense("1", 9000, "Juan")).unwrap();

    let result = book.update(make_expense("1", 0, "Juan"));

    assert!(matches!(result, Err(LedgerError::InvalidExpense(_))));
    assert_eq!(book.expenses()[0].amount, Money::from_cents(9000));
}

#[test]
fn remove_settles_book() {
    let mut book = make_book();
    book.add(make_expense("1", 9000, "Juan")).unwrap();

    book.remove(&ExpenseId::from("1")).unwrap();

    assert!(book.settlement().unwrap().is_empty());
}

#[test]
fn recent_orders_newest_first() {
    let mut book = make_book();
    let day = |d| Utc.with_ymd_and_hms(2025, 3, d, 12, 0, 0).unwrap();
    book.add(make_expense("old", 100, "Juan").with_date(day(1))).unwrap();
    book.add(make_expense("undated", 100, "Juan")).unwrap();
    book.add(make_expense("new", 100, "Juan").with_date(day(9))).unwrap();

    let ids: Vec<&str> = book.recent().iter().map(|e| e.id.0.as_str()).collect();

    assert_eq!(ids, ["new", "old", "undated"]);
}

#[test]
fn summary_reports_spending() {
    let mut book = make_book();
    book.add(make_expense("1", 9000, "Juan")).unwrap();
    book.add(make_expense("2", 3000, "Pedro")).unwrap();

    let summary = book.summary().unwrap();

    assert_eq!(summary.total, Money::from_cents(12_000));
    assert_eq!(summary.average_per_participant, Money::from_cents(4000));
    assert_eq!(
        summary.paid_by_participant[&ParticipantId::from("María")],
        Money::ZERO
    );
}

#[test]
fn book_records_carry_metadata() {
    let mut book = make_book();
    let expense = make_expense("1", 2500, "Juan")
        .with_title("Supermercado")
        .with_description("Compra semanal")
        .with_notes("ticket en la guantera");
    book.add(expense).unwrap();

    let recorded = book.get(&ExpenseId::from("1")).unwrap();

    assert_eq!(recorded.title, "Supermercado");
    assert_eq!(recorded.description, "Compra semanal");
    assert_eq!(recorded.notes.as_deref(), Some("ticket en la guantera"));
}

#[test]
fn huge_expenses_report_overflow_instead_of_panicking() {
    let mut book = ExpenseBook::new(Roster::new(["A", "B"]));
    let max = Money::from_cents(i64::MAX);
    book.add(ExpenseRecord::new("1", max, "A", ["B"])).unwrap();
    book.add(ExpenseRecord::new("2", max, "B", ["A"])).unwrap();

    assert!(book.balances().unwrap().is_settled());
    assert!(book.settlement().unwrap().is_empty());
    assert_eq!(
        book.summary(),
        Err(InvalidExpenseError::TotalOverflow(ExpenseId::from("2")))
    );
}
