//! Closed value sets stored in text columns.
//!
//! Every enum round-trips through `as_str` / `FromStr` using exactly the
//! strings the schema's `CHECK` constraints accept.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A stored or submitted value outside an enum's accepted set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(ParseEnumError::new("gender", other)),
        }
    }
}

/// Where a voter lives during term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressType {
    Campus,
    #[serde(rename = "Off-Campus")]
    OffCampus,
}

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Campus => "Campus",
            AddressType::OffCampus => "Off-Campus",
        }
    }
}

impl FromStr for AddressType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Campus" => Ok(AddressType::Campus),
            "Off-Campus" => Ok(AddressType::OffCampus),
            other => Err(ParseEnumError::new("address type", other)),
        }
    }
}

/// Kind of election; decides which positions are created up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElectionType {
    #[serde(rename = "Student Union")]
    StudentUnion,
    #[serde(rename = "Class Representative")]
    ClassRepresentative,
    #[serde(rename = "Association")]
    Association,
}

impl ElectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElectionType::StudentUnion => "Student Union",
            ElectionType::ClassRepresentative => "Class Representative",
            ElectionType::Association => "Association",
        }
    }

    /// Positions inserted alongside a new election of this type, in display order.
    pub fn default_positions(&self) -> &'static [&'static str] {
        match self {
            ElectionType::StudentUnion => &["President", "Academics Minister", "Prime Minister"],
            ElectionType::ClassRepresentative => {
                &["Male Class Representative", "Female Class Representative"]
            }
            ElectionType::Association => &[],
        }
    }
}

impl FromStr for ElectionType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Student Union" => Ok(ElectionType::StudentUnion),
            "Class Representative" => Ok(ElectionType::ClassRepresentative),
            "Association" => Ok(ElectionType::Association),
            other => Err(ParseEnumError::new("election type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionStatus {
    #[default]
    Draft,
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

impl ElectionStatus {
    pub const ALL: [ElectionStatus; 5] = [
        ElectionStatus::Draft,
        ElectionStatus::Upcoming,
        ElectionStatus::Active,
        ElectionStatus::Completed,
        ElectionStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElectionStatus::Draft => "draft",
            ElectionStatus::Upcoming => "upcoming",
            ElectionStatus::Active => "active",
            ElectionStatus::Completed => "completed",
            ElectionStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ElectionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElectionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("election status", s))
    }
}

/// Administrator role. The schema only admits one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    #[default]
    Admin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => "admin",
        }
    }
}

impl FromStr for AdminRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(AdminRole::Admin),
            other => Err(ParseEnumError::new("admin role", other)),
        }
    }
}

macro_rules! display_via_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_via_as_str!(Gender, AddressType, ElectionType, ElectionStatus, AdminRole);
