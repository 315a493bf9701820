//! Domain types for the election store.
//!
//! This module provides:
//! - Closed enums for every enumerated column
//! - The election scope encoding (`all` sentinel or JSON id list)
//! - Entity, form and filter types with boundary validation

pub mod admin;
pub mod candidate;
pub mod election;
pub mod enums;
pub mod reference;
pub mod scope;
pub mod stats;
pub mod validation;
pub mod voter;

pub use admin::AdminUser;
pub use candidate::{Candidate, CandidateFilter, CandidateForm, CandidateSummary, NewCandidate};
pub use election::{
    Election, ElectionFilter, ElectionForm, ElectionSummary, NewElection, Position, PositionForm,
};
pub use enums::{AddressType, AdminRole, ElectionStatus, ElectionType, Gender, ParseEnumError};
pub use reference::{AcademicYear, Program, School};
pub use scope::Scope;
pub use stats::{CandidateTally, DashboardStats, StatusCount};
pub use validation::ValidationError;
pub use voter::{NewVoter, RegistrationForm, StudentSummary, Voter, VoterFilter};
