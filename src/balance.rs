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

//! Net balances per participant.
//!
//! A positive balance means the participant is owed money; a negative one
//! means they owe. Balances are computed by folding every expense:
//!
//! - the payer is credited the full amount,
//! - each participant is debited `amount / participants`.
//!
//! Per-head shares are kept exact, as integer fractions of a cent over a
//! common denominator. Only the final balance is rounded to the cent, halves
//! going up (toward positive infinity), so the sum of a balance map is zero
//! within half a cent per participant and the result does not depend on
//! expense order.
//!
//! # Example
//!
//! ```
//! use expense_ledger_rs::{compute_balances, ExpenseRecord, Money, ParticipantId, Roster};
//!
//! let roster = Roster::new(["A", "B", "C"]);
//! let dinner = ExpenseRecord::new("1", Money::from_cents(9000), "A", ["A", "B", "C"]);
//!
//! let balances = compute_balances(&roster, [&dinner]).unwrap();
//! assert_eq!(balances.get(&ParticipantId::from("A")), Some(Money::from_cents(6000)));
//! assert_eq!(balances.get(&ParticipantId::from("B")), Some(Money::from_cents(-3000)));
//! ```

use crate::base::ParticipantId;
use crate::error::InvalidExpenseError;
use crate::expense::ExpenseRecord;
use crate::money::Money;
use crate::roster::Roster;
use crate::settlement::SettlementTransaction;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Signed balance for every participant of a roster, in identifier order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BalanceMap(BTreeMap<ParticipantId, Money>);

impl BalanceMap {
    /// A map with every roster member at zero.
    pub fn zeroed(roster: &Roster) -> Self {
        roster.iter().map(|p| (p.clone(), Money::ZERO)).collect()
    }

    pub fn get(&self, participant: &ParticipantId) -> Option<Money> {
        self.0.get(participant).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Money)> {
        self.0.iter().map(|(p, amount)| (p, *amount))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all balances. Zero for a closed ledger, up to half a cent of
    /// rounding residue per participant. `None` if the sum leaves the cent
    /// range, which balances near `i64::MAX` can do.
    pub fn total(&self) -> Option<Money> {
        self.0
            .values()
            .try_fold(Money::ZERO, |sum, amount| sum.checked_add(*amount))
    }

    /// Sum of all balances in cents, without overflow.
    fn residue_cents(&self) -> i128 {
        self.0.values().map(|amount| i128::from(amount.cents())).sum()
    }

    /// True when nobody owes or is owed anything.
    pub fn is_settled(&self) -> bool {
        self.0.values().all(|amount| amount.is_zero())
    }

    /// Returns the balances left after every transaction is paid.
    ///
    /// Paying moves the debtor's balance up and the creditor's balance down
    /// by the transaction amount. `self` is left untouched.
    pub fn apply(&self, transactions: &[SettlementTransaction]) -> BalanceMap {
        let mut after = self.0.clone();
        for tx in transactions {
            *after.entry(tx.from.clone()).or_default() += tx.amount;
            *after.entry(tx.to.clone()).or_default() -= tx.amount;
        }
        BalanceMap(after)
    }
}

impl FromIterator<(ParticipantId, Money)> for BalanceMap {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, Money)>>(iter: I) -> Self {
        BalanceMap(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a BalanceMap {
    type Item = (&'a ParticipantId, &'a Money);
    type IntoIter = std::collections::btree_map::Iter<'a, ParticipantId, Money>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Folds `expenses` into a net balance for every member of `roster`.
///
/// Members without any expense activity appear with a zero balance. Input
/// order does not matter and repeated records are counted each time.
///
/// # Errors
///
/// Every expense is validated before anything is folded; the first one that
/// does not pass [`ExpenseRecord::validate`] is returned and no partial map is
/// produced. [`InvalidExpenseError::ShareOverflow`] is returned if the exact
/// shares no longer fit the accumulator.
pub fn compute_balances<'a, I>(
    roster: &Roster,
    expenses: I,
) -> Result<BalanceMap, InvalidExpenseError>
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    let expenses: Vec<&ExpenseRecord> = expenses.into_iter().collect();
    for expense in &expenses {
        expense.validate(roster)?;
    }

    // Every per-head share is a whole multiple of 1 / denominator cents.
    let denominator = expenses.iter().try_fold(1i128, |acc, expense| {
        lcm(acc, expense.participants.len() as i128)
            .ok_or_else(|| InvalidExpenseError::ShareOverflow(expense.id.clone()))
    })?;

    let mut scaled: BTreeMap<&ParticipantId, i128> = roster.iter().map(|p| (p, 0)).collect();

    for expense in &expenses {
        let overflow = || InvalidExpenseError::ShareOverflow(expense.id.clone());
        let amount = i128::from(expense.amount.cents())
            .checked_mul(denominator)
            .ok_or_else(overflow)?;
        let share = amount / expense.participants.len() as i128;
        trace!(
            expense = %expense.id,
            amount = %expense.amount,
            participants = expense.participants.len(),
            "folding expense"
        );

        if let Some(balance) = scaled.get_mut(&expense.paid_by) {
            *balance = balance.checked_add(amount).ok_or_else(overflow)?;
        }
        for participant in &expense.participants {
            if let Some(balance) = scaled.get_mut(participant) {
                *balance = balance.checked_sub(share).ok_or_else(overflow)?;
            }
        }
    }

    let balances: BalanceMap = scaled
        .into_iter()
        .map(|(p, value)| -> Result<(ParticipantId, Money), InvalidExpenseError> {
            let cents = i64::try_from(div_round_half_up(value, denominator))
                .map_err(|_| InvalidExpenseError::BalanceOutOfRange(p.clone()))?;
            Ok((p.clone(), Money::from_cents(cents)))
        })
        .collect::<Result<_, InvalidExpenseError>>()?;

    let residue = balances.residue_cents();
    debug_assert!(
        residue.abs() * 2 <= balances.len() as i128,
        "Invariant violated: balances do not sum to zero: {residue} cents"
    );
    debug!(participants = balances.len(), residue, "computed balances");

    Ok(balances)
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn lcm(a: i128, b: i128) -> Option<i128> {
    (a / gcd(a, b)).checked_mul(b)
}

/// Rounds `numerator / denominator` to the nearest integer, halves toward
/// positive infinity: `-0.5` becomes `0`, `0.5` becomes `1`. `denominator` is
/// positive.
fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    let floor = numerator.div_euclid(denominator);
    let remainder = numerator.rem_euclid(denominator);
    if remainder >= denominator - remainder {
        floor + 1
    } else {
        floor
    }
}
