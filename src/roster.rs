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

//! The closed set of participants a ledger is kept for.

use crate::base::ParticipantId;
use crate::expense::ExpenseRecord;
use std::collections::BTreeSet;

/// Participants known to a ledger.
///
/// The roster is supplied by the caller and stays fixed for the duration of
/// a computation: every balance map has exactly one entry per member, and
/// expenses naming anyone else are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    members: BTreeSet<ParticipantId>,
}

impl Roster {
    pub fn new<I, P>(members: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a roster from everyone who pays for or shares any of `expenses`.
    pub fn from_expenses<'a, I>(expenses: I) -> Self
    where
        I: IntoIterator<Item = &'a ExpenseRecord>,
    {
        let mut members = BTreeSet::new();
        for expense in expenses {
            members.insert(expense.paid_by.clone());
            members.extend(expense.participants.iter().cloned());
        }
        Self { members }
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.members.contains(participant)
    }

    /// Members in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &ParticipantId> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<P: Into<ParticipantId>> FromIterator<P> for Roster {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter)
    }
}
