//! Interview slot publication and the atomic booking workflow.
//!
//! An interview is a grid of `(date, time)` cells, each holding at most one
//! occupant. Every grid mutation funnels through `BookingService::book_slot`,
//! which runs the check-and-set under the store's per-interview lock so that
//! concurrent claims on one key linearize while unrelated interviews stay
//! fully concurrent.

pub mod directory;
pub mod domain;
pub mod grid;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use directory::{ApplicantDirectory, MemoryApplicantDirectory};
pub use domain::{ApplicantClaims, Interview, InterviewId, InterviewSummary};
pub use grid::{GridError, SlotClaim};
pub use repository::{InterviewStore, MemoryInterviewStore, StoreError};
pub use router::{interview_router, BookSlotRequest, CreateInterviewRequest, SchedulingState};
pub use service::{BookingError, BookingService};
