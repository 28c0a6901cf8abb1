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

//! Reduction of balances to a short list of payments.
//!
//! [`settle`] repeatedly matches the largest creditor with the largest
//! debtor and has the debtor pay the smaller of the two magnitudes:
//!
//! ```text
//!  sort desc ─► creditor = first (> 0) ─► pay min(creditor, -debtor) ─┐
//!      ▲        debtor   = last  (< 0)                                │
//!      └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step zeroes at least one party, so `N` participants never need more
//! than `N - 1` payments.

use crate::balance::BalanceMap;
use crate::base::ParticipantId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Instruction for `from` to pay `amount` to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTransaction {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

/// Working balance of one participant during reduction.
#[derive(Debug)]
struct Position<'a> {
    participant: &'a ParticipantId,
    amount: Money,
}

/// Produces the payments that bring every balance in `balances` to zero.
///
/// Transactions are returned in emission order. The input is not modified.
///
/// # Ordering
///
/// Participants are ranked by amount, largest first. Equal amounts are
/// ranked by participant identifier, so among equally large creditors or
/// equally large debtors the lexicographically smallest one settles first.
/// The output is fully determined by the input.
///
/// # Termination
///
/// Stops when nobody is owed or nobody owes. A balance map that does not sum
/// to zero still terminates; the leftover stays with the side that could not
/// be matched.
pub fn settle(balances: &BalanceMap) -> Vec<SettlementTransaction> {
    let mut working: Vec<Position<'_>> = balances
        .iter()
        .map(|(participant, amount)| Position {
            participant,
            amount,
        })
        .collect();
    let mut transactions = Vec::new();

    loop {
        working.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.participant.cmp(b.participant))
        });

        let creditor = match working.first() {
            Some(first) if first.amount.is_positive() => 0,
            _ => break,
        };
        // Debtors sit at the back; the most negative group ends the list.
        let deepest = match working.last() {
            Some(last) if last.amount.is_negative() => last.amount,
            _ => break,
        };
        let Some(debtor) = working.iter().position(|p| p.amount == deepest) else {
            break;
        };

        // A creditor never exceeds i64::MAX cents, so clamping the debt of an
        // i64::MIN balance does not change the minimum.
        let amount = working[creditor]
            .amount
            .min(working[debtor].amount.saturating_neg());
        if !amount.is_positive() {
            break;
        }

        working[creditor].amount -= amount;
        working[debtor].amount += amount;

        let tx = SettlementTransaction {
            from: working[debtor].participant.clone(),
            to: working[creditor].participant.clone(),
            amount,
        };
        debug!(from = %tx.from, to = %tx.to, amount = %tx.amount, "settlement step");
        transactions.push(tx);
    }

    debug_assert!(
        transactions.len() <= balances.len().saturating_sub(1),
        "Invariant violated: {} transactions for {} participants",
        transactions.len(),
        balances.len()
    );

    transactions
}
