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

//! # Expense Ledger
//!
//! This library keeps track of expenses shared by a group of people and
//! works out who owes whom.
//!
//! ## Core Components
//!
//! - [`compute_balances`]: Folds expenses into a net balance per participant
//! - [`settle`]: Reduces balances to a short list of pairwise payments
//! - [`ExpenseBook`]: Owned expense state with add/update/remove commands
//! - [`Money`]: Fixed-point currency amount in whole cents
//! - [`InvalidExpenseError`]: Why an expense cannot be split
//!
//! ## Example
//!
//! ```
//! use expense_ledger_rs::{ExpenseBook, ExpenseRecord, Money, ParticipantId, Roster};
//! use rust_decimal_macros::dec;
//!
//! let mut book = ExpenseBook::new(Roster::new(["A", "B", "C"]));
//!
//! // A pays 90.00 for a dinner shared by all three
//! let dinner = Money::try_from(dec!(90.00)).unwrap();
//! book.add(ExpenseRecord::new("1", dinner, "A", ["A", "B", "C"])).unwrap();
//!
//! let payments = book.settlement().unwrap();
//! assert_eq!(payments.len(), 2);
//! assert_eq!(payments[0].from, ParticipantId::from("B"));
//! assert_eq!(payments[0].to, ParticipantId::from("A"));
//! assert_eq!(payments[0].amount.to_string(), "30.00");
//! ```
//!
//! ## Thread Safety
//!
//! [`compute_balances`] and [`settle`] are pure and can be called from any
//! thread. A book that several threads read is shared as a
//! [`SharedExpenseBook`].

mod balance;
mod base;
mod book;
pub mod error;
mod expense;
mod money;
mod roster;
mod settlement;
mod summary;

pub use balance::{BalanceMap, compute_balances};
pub use base::{ExpenseId, ParticipantId};
pub use book::{ExpenseBook, SharedExpenseBook};
pub use error::{InvalidExpenseError, LedgerError};
pub use expense::ExpenseRecord;
pub use money::Money;
pub use roster::Roster;
pub use settlement::{SettlementTransaction, settle};
pub use summary::ExpenseSummary;
