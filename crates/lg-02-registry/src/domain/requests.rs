//! Write requests, one per state-changing contract function.
//!
//! Field names match the JSON bodies callers already send.

use serde::{Deserialize, Serialize};
use shared_types::{Operation, OperationError, OperationKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDomain {
    pub id: String,
    pub domain_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub id: String,
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub id: String,
    pub employee_name: String,
    pub designation: String,
    pub dob: String,
    pub domain_id: String,
    pub domain_name: String,
    pub company_id: String,
    pub company_name: String,
}

/// Move an employee to another domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainChange {
    pub id: String,
    pub new_domain_id: String,
    pub domain_name: String,
}

/// Move an employee to another company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyChange {
    pub id: String,
    pub new_company_id: String,
    pub company_name: String,
}

/// Conversion into the positional contract call.
pub trait IntoOperation {
    fn into_operation(self) -> Result<Operation, OperationError>;
}

impl IntoOperation for NewDomain {
    fn into_operation(self) -> Result<Operation, OperationError> {
        Operation::new(OperationKind::InitDomain, [self.id, self.domain_name])
    }
}

impl IntoOperation for NewCompany {
    fn into_operation(self) -> Result<Operation, OperationError> {
        Operation::new(OperationKind::InitCompany, [self.id, self.company_name])
    }
}

impl IntoOperation for NewEmployee {
    fn into_operation(self) -> Result<Operation, OperationError> {
        Operation::new(
            OperationKind::InitEmployee,
            [
                self.id,
                self.employee_name,
                self.designation,
                self.dob,
                self.domain_id,
                self.domain_name,
                self.company_id,
                self.company_name,
            ],
        )
    }
}

impl IntoOperation for DomainChange {
    fn into_operation(self) -> Result<Operation, OperationError> {
        Operation::new(
            OperationKind::SetDomain,
            [self.id, self.new_domain_id, self.domain_name],
        )
    }
}

impl IntoOperation for CompanyChange {
    fn into_operation(self) -> Result<Operation, OperationError> {
        Operation::new(
            OperationKind::SetCompany,
            [self.id, self.new_company_id, self.company_name],
        )
    }
}
