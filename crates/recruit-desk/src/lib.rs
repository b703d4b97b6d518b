//! Applicant tracking view models for the recruitment admin desk.
//!
//! Job and application collections are fetched from the remote store, joined and grouped by
//! company, counted, and filtered into the rowsets the admin views render.

pub mod applicants;
pub mod config;
pub mod error;
pub mod telemetry;
