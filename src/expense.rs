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

//! Shared expense records.

use crate::base::{ExpenseId, ParticipantId};
use crate::error::InvalidExpenseError;
use crate::money::Money;
use crate::roster::Roster;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One shared cost: `paid_by` fronted `amount`, split evenly between
/// `participants`.
///
/// The payer does not have to be one of the participants. Field names
/// serialize in camelCase to match the stored expense list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub amount: Money,
    pub paid_by: ParticipantId,
    pub participants: BTreeSet<ParticipantId>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

impl ExpenseRecord {
    pub fn new<I, P>(
        id: impl Into<ExpenseId>,
        amount: Money,
        paid_by: impl Into<ParticipantId>,
        participants: I,
    ) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        Self {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            amount,
            paid_by: paid_by.into(),
            participants: participants.into_iter().map(Into::into).collect(),
            date: None,
            photo_uri: None,
            notes: None,
            verified: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Checks that the expense can be folded into balances for `roster`.
    ///
    /// # Errors
    ///
    /// - [`InvalidExpenseError::NonPositiveAmount`] - amount is zero or negative.
    /// - [`InvalidExpenseError::EmptyParticipants`] - nobody shares the cost.
    /// - [`InvalidExpenseError::UnknownParticipant`] - payer or participant is
    ///   not on the roster.
    pub fn validate(&self, roster: &Roster) -> Result<(), InvalidExpenseError> {
        if !self.amount.is_positive() {
            return Err(InvalidExpenseError::NonPositiveAmount(
                self.id.clone(),
                self.amount,
            ));
        }
        if self.participants.is_empty() {
            return Err(InvalidExpenseError::EmptyParticipants(self.id.clone()));
        }
        let unknown = std::iter::once(&self.paid_by)
            .chain(&self.participants)
            .find(|participant| !roster.contains(participant));
        if let Some(participant) = unknown {
            return Err(InvalidExpenseError::UnknownParticipant(
                self.id.clone(),
                participant.clone(),
            ));
        }
        Ok(())
    }
}
