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

//! Expense book.
//!
//! The [`ExpenseBook`] owns the recorded expenses of one group and answers
//! balance, settlement and summary queries over them.
//!
//! # Commands
//!
//! - **Add**: Validate and append a new expense (ids are unique).
//! - **Update**: Replace a recorded expense with a new version of it.
//! - **Remove**: Drop a recorded expense.
//!
//! # Sharing
//!
//! Commands take `&mut self`, so a book has a single writer. Callers that
//! recompute from several threads wrap it in a [`SharedExpenseBook`] and
//! take the write lock only for commands.

use crate::balance::{BalanceMap, compute_balances};
use crate::base::ExpenseId;
use crate::error::{InvalidExpenseError, LedgerError};
use crate::expense::ExpenseRecord;
use crate::roster::Roster;
use crate::settlement::{SettlementTransaction, settle};
use crate::summary::ExpenseSummary;
use parking_lot::RwLock;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Book shared between threads. Readers compute concurrently; commands
/// serialize on the write lock.
pub type SharedExpenseBook = Arc<RwLock<ExpenseBook>>;

/// Recorded expenses for a fixed roster.
///
/// # Invariants
///
/// - Every recorded expense passes [`ExpenseRecord::validate`] for the roster.
/// - Expense ids are unique.
/// - Expenses keep their insertion order; updates keep their position.
#[derive(Debug, Clone)]
pub struct ExpenseBook {
    roster: Roster,
    expenses: Vec<ExpenseRecord>,
    /// Recorded ids for O(1) duplicate detection.
    ids: HashSet<ExpenseId>,
}

impl ExpenseBook {
    /// Creates an empty book for `roster`.
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            expenses: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Records a new expense.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidExpense`] - expense does not validate for the roster.
    /// - [`LedgerError::DuplicateExpense`] - an expense with this id is recorded.
    pub fn add(&mut self, expense: ExpenseRecord) -> Result<(), LedgerError> {
        expense.validate(&self.roster)?;
        if !self.ids.insert(expense.id.clone()) {
            return Err(LedgerError::DuplicateExpense(expense.id));
        }
        debug!(expense = %expense.id, amount = %expense.amount, "expense added");
        self.expenses.push(expense);
        Ok(())
    }

    /// Replaces the recorded expense with the same id.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidExpense`] - expense does not validate for the roster.
    /// - [`LedgerError::ExpenseNotFound`] - no expense with this id is recorded.
    pub fn update(&mut self, expense: ExpenseRecord) -> Result<(), LedgerError> {
        expense.validate(&self.roster)?;
        let slot = self
            .expenses
            .iter_mut()
            .find(|recorded| recorded.id == expense.id)
            .ok_or_else(|| LedgerError::ExpenseNotFound(expense.id.clone()))?;
        debug!(expense = %expense.id, "expense updated");
        *slot = expense;
        Ok(())
    }

    /// Removes and returns the expense with `id`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::ExpenseNotFound`] - no expense with this id is recorded.
    pub fn remove(&mut self, id: &ExpenseId) -> Result<ExpenseRecord, LedgerError> {
        if !self.ids.remove(id) {
            return Err(LedgerError::ExpenseNotFound(id.clone()));
        }
        let index = self
            .expenses
            .iter()
            .position(|recorded| &recorded.id == id)
            .ok_or_else(|| LedgerError::ExpenseNotFound(id.clone()))?;
        debug!(expense = %id, "expense removed");
        Ok(self.expenses.remove(index))
    }

    pub fn get(&self, id: &ExpenseId) -> Option<&ExpenseRecord> {
        self.expenses.iter().find(|recorded| &recorded.id == id)
    }

    /// Recorded expenses in insertion order.
    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    /// Recorded expenses, newest first. Undated expenses come last, in
    /// insertion order.
    pub fn recent(&self) -> Vec<&ExpenseRecord> {
        let mut recent: Vec<&ExpenseRecord> = self.expenses.iter().collect();
        recent.sort_by_key(|expense| (expense.date.is_none(), Reverse(expense.date)));
        recent
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Net balance of every roster member.
    pub fn balances(&self) -> Result<BalanceMap, InvalidExpenseError> {
        compute_balances(&self.roster, &self.expenses)
    }

    /// Payments that settle the current balances.
    pub fn settlement(&self) -> Result<Vec<SettlementTransaction>, InvalidExpenseError> {
        self.balances().map(|balances| settle(&balances))
    }

    pub fn summary(&self) -> Result<ExpenseSummary, InvalidExpenseError> {
        ExpenseSummary::from_expenses(&self.roster, &self.expenses)
    }

    pub fn into_shared(self) -> SharedExpenseBook {
        Arc::new(RwLock::new(self))
    }
}
