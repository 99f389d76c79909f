use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for published interviews.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InterviewId(pub String);

/// A published grid of interview slots.
///
/// `time_slots` maps a date label to a map of time labels, each holding the
/// occupant's email once claimed. Every `(date, time)` key present at
/// creation stays present for the interview's lifetime; an occupant moves
/// from `None` to one fixed email exactly once and is never reassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub id: InterviewId,
    pub interview_name: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub time_slots: HashMap<String, HashMap<String, Option<String>>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Reverse index entry: the interviews an applicant holds a slot in.
///
/// Created lazily on the applicant's first successful claim and never
/// deleted. The display name stays unset until a roster source provides one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantClaims {
    pub email: String,
    pub name: Option<String>,
    pub interview_ids: BTreeSet<InterviewId>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicantClaims {
    pub fn first_claim(email: impl Into<String>, interview: InterviewId, now: DateTime<Utc>) -> Self {
        let mut interview_ids = BTreeSet::new();
        interview_ids.insert(interview);
        Self {
            email: email.into(),
            name: None,
            interview_ids,
            updated_at: now,
        }
    }

    /// Add the interview if absent. The timestamp only moves when the set
    /// actually grew, so repeated claims into the same interview are no-ops.
    pub fn record(&mut self, interview: InterviewId, now: DateTime<Utc>) -> bool {
        let added = self.interview_ids.insert(interview);
        if added {
            self.updated_at = now;
        }
        added
    }
}

/// Listing view of an interview with at least one unoccupied slot.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewSummary {
    pub id: InterviewId,
    pub interview_name: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub available_slots: HashMap<String, Vec<String>>,
    pub created_by: String,
}
