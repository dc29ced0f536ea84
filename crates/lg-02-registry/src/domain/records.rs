//! Registry records as the contract stores and returns them.
//!
//! Field names follow the contract's JSON exactly.

use serde::{Deserialize, Deserializer, Serialize};

/// A department-like grouping employees belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(rename = "docType", default)]
    pub doc_type: String,
    pub id: String,
    #[serde(rename = "domainName")]
    pub domain_name: String,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "docType", default)]
    pub doc_type: String,
    pub id: String,
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(default)]
    pub enabled: bool,
}

/// Link from an employee to its domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRef {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "domainName", default)]
    pub domain_name: String,
}

/// Link from an employee to its company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRef {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "companyName", default)]
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "docType", default)]
    pub doc_type: String,
    pub id: String,
    #[serde(rename = "employeeName")]
    pub employee_name: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub domain: DomainRef,
    #[serde(default)]
    pub company: CompanyRef,
}

/// One row of a key range read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeEntry<T> {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: T,
}

/// Every employee plus the enabled domains and companies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub employee: Vec<Employee>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub domain: Vec<Domain>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: Vec<Company>,
}

/// The contract serializes an empty list as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Record kinds, each stored under its own key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Domain,
    Company,
    Employee,
}

impl RecordKind {
    /// Inclusive start and exclusive end key of this kind's range.
    #[must_use]
    pub fn key_range(&self) -> (&'static str, &'static str) {
        match self {
            RecordKind::Domain => ("d0", "d99999999999999"),
            RecordKind::Company => ("c0", "c99999999999999"),
            RecordKind::Employee => ("e0", "e99999999999999"),
        }
    }
}
