use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use super::domain::{Interview, InterviewId, InterviewSummary};

/// Outcome of a check-and-set attempt against one `(date, time)` cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotClaim {
    Booked,
    AlreadyBooked,
    InvalidSlot,
}

/// Error raised while building a slot grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("to_date {to} precedes from_date {from}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },
}

impl Interview {
    /// Build the grid with every requested `(date, time)` entry unoccupied.
    pub fn new(
        id: InterviewId,
        interview_name: impl Into<String>,
        from_date: NaiveDate,
        to_date: NaiveDate,
        requested_slots: HashMap<String, Vec<String>>,
        created_by: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GridError> {
        if to_date < from_date {
            return Err(GridError::InvalidRange {
                from: from_date,
                to: to_date,
            });
        }

        let mut time_slots: HashMap<String, HashMap<String, Option<String>>> = HashMap::new();
        for (date, times) in requested_slots {
            let day = time_slots.entry(date).or_default();
            for time in times {
                day.insert(time, None);
            }
        }

        Ok(Self {
            id,
            interview_name: interview_name.into(),
            from_date,
            to_date,
            time_slots,
            created_by: created_by.into(),
            created_at,
        })
    }

    /// Dates that still have at least one unoccupied slot, with the free
    /// time labels sorted ascending. Fully booked dates are omitted.
    pub fn available_slots(&self) -> HashMap<String, Vec<String>> {
        let mut available = HashMap::new();
        for (date, slots) in &self.time_slots {
            let mut free: Vec<String> = slots
                .iter()
                .filter(|(_, occupant)| occupant.is_none())
                .map(|(time, _)| time.clone())
                .collect();
            if !free.is_empty() {
                free.sort();
                available.insert(date.clone(), free);
            }
        }
        available
    }

    pub fn has_available_slots(&self) -> bool {
        self.time_slots
            .values()
            .any(|slots| slots.values().any(Option::is_none))
    }

    /// Linear scan for the slot held by `email`, if any. An applicant holds
    /// at most one slot per interview, so the first match is the only one.
    pub fn occupant_slot(&self, email: &str) -> Option<(String, String)> {
        for (date, slots) in &self.time_slots {
            for (time, occupant) in slots {
                if occupant.as_deref() == Some(email) {
                    return Some((date.clone(), time.clone()));
                }
            }
        }
        None
    }

    /// Check-and-set for one cell. The caller must hold the interview's
    /// serialization point so that the check and the write are one step.
    pub fn claim(&mut self, date: &str, time: &str, email: &str) -> SlotClaim {
        let Some(day) = self.time_slots.get_mut(date) else {
            return SlotClaim::InvalidSlot;
        };
        let Some(slot) = day.get_mut(time) else {
            return SlotClaim::InvalidSlot;
        };
        if slot.is_some() {
            return SlotClaim::AlreadyBooked;
        }
        *slot = Some(email.to_string());
        SlotClaim::Booked
    }

    pub fn summary(&self) -> InterviewSummary {
        InterviewSummary {
            id: self.id.clone(),
            interview_name: self.interview_name.clone(),
            from_date: self.from_date,
            to_date: self.to_date,
            available_slots: self.available_slots(),
            created_by: self.created_by.clone(),
        }
    }
}
