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

//! Spending totals shown next to the balances.

use crate::base::ParticipantId;
use crate::error::InvalidExpenseError;
use crate::expense::ExpenseRecord;
use crate::money::Money;
use crate::roster::Roster;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// How much each participant fronted, and what an even split would cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseSummary {
    /// Amount fronted per roster member (zero for members who paid nothing).
    pub paid_by_participant: BTreeMap<ParticipantId, Money>,
    pub total: Money,
    /// `total / roster size`, rounded to the cent.
    pub average_per_participant: Money,
    pub expense_count: usize,
}

impl ExpenseSummary {
    /// Payers outside `roster` are still counted in `total` but get no entry
    /// of their own.
    ///
    /// # Errors
    ///
    /// [`InvalidExpenseError::TotalOverflow`] names the first expense that
    /// pushes a total out of the cent range.
    pub fn from_expenses<'a, I>(
        roster: &Roster,
        expenses: I,
    ) -> Result<Self, InvalidExpenseError>
    where
        I: IntoIterator<Item = &'a ExpenseRecord>,
    {
        let mut paid_by_participant: BTreeMap<ParticipantId, Money> =
            roster.iter().map(|p| (p.clone(), Money::ZERO)).collect();
        let mut total = Money::ZERO;
        let mut expense_count = 0;

        for expense in expenses {
            let overflow = || InvalidExpenseError::TotalOverflow(expense.id.clone());
            if let Some(paid) = paid_by_participant.get_mut(&expense.paid_by) {
                *paid = paid.checked_add(expense.amount).ok_or_else(overflow)?;
            }
            total = total.checked_add(expense.amount).ok_or_else(overflow)?;
            expense_count += 1;
        }

        let average_per_participant = if roster.is_empty() {
            Money::ZERO
        } else {
            Money::from_decimal_rounded(total.to_decimal() / Decimal::from(roster.len()))?
        };

        Ok(Self {
            paid_by_participant,
            total,
            average_per_participant,
            expense_count,
        })
    }
}
