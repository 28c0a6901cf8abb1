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

//! Error types for expense validation and ledger commands.

use crate::base::{ExpenseId, ParticipantId};
use crate::money::Money;
use rust_decimal::Decimal;
use thiserror::Error;

/// An expense that cannot take part in a balance computation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidExpenseError {
    /// Nobody shares the cost, so there is no per-head share
    #[error("expense {0} has no participants")]
    EmptyParticipants(ExpenseId),

    /// Amount is zero or negative
    #[error("expense {0} has a non-positive amount ({1})")]
    NonPositiveAmount(ExpenseId, Money),

    /// Payer or participant is not part of the roster
    #[error("expense {0} references unknown participant {1}")]
    UnknownParticipant(ExpenseId, ParticipantId),

    /// Amount carries more than two decimal places
    #[error("amount {0} is finer than one cent")]
    SubCentAmount(Decimal),

    /// Amount does not fit in the cent range
    #[error("amount {0} is out of range")]
    AmountOutOfRange(Decimal),

    /// Exact shares no longer fit the balance accumulator
    #[error("expense {0} overflows the balance computation")]
    ShareOverflow(ExpenseId),

    /// Spending totals no longer fit in the cent range
    #[error("expense {0} overflows the spending totals")]
    TotalOverflow(ExpenseId),

    /// Net balance does not fit in the cent range
    #[error("balance of {0} is out of range")]
    BalanceOutOfRange(ParticipantId),

    /// Amount text is not a decimal number
    #[error("malformed amount {0:?}")]
    MalformedAmount(String),
}

/// Errors returned by [`ExpenseBook`](crate::ExpenseBook) commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid expense: {0}")]
    InvalidExpense(#[from] InvalidExpenseError),

    /// An expense with the same id is already recorded
    #[error("duplicate expense id {0}")]
    DuplicateExpense(ExpenseId),

    #[error("expense {0} not found")]
    ExpenseNotFound(ExpenseId),
}
