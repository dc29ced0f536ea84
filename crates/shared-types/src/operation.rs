//! # Logical Operations
//!
//! An `Operation` is what the caller asks for ("create employee", "disable
//! company", ...). It maps one-to-one onto a contract function deployed on
//! the channel and carries the positional string arguments for that function.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::OperationError;

/// Every logical operation the gateway can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    /// Register a new domain: `[id, domain_name]`.
    InitDomain,
    /// Register a new company: `[id, company_name]`.
    InitCompany,
    /// Register a new employee: `[id, name, designation, dob, domain_id,
    /// domain_name, company_id, company_name]`.
    InitEmployee,
    /// Move an employee to another domain: `[id, new_domain_id, domain_name]`.
    SetDomain,
    /// Move an employee to another company: `[id, new_company_id, company_name]`.
    SetCompany,
    /// Disable a domain: `[id, authed_by_domain]`.
    DisableDomain,
    /// Disable a company: `[id, authed_by_company]`.
    DisableCompany,
    /// Delete an employee: `[id, authed_by_domain]`.
    DeleteEmployee,
    /// Read every employee, domain and company: `[]`.
    ReadAll,
    /// Range read over one record kind: `[start_key, end_key]`.
    ListByKind,
    /// Read a single record: `[id]`.
    GetById,
}

impl OperationKind {
    /// All kinds, write kinds first.
    pub const ALL: [OperationKind; 11] = [
        OperationKind::InitDomain,
        OperationKind::InitCompany,
        OperationKind::InitEmployee,
        OperationKind::SetDomain,
        OperationKind::SetCompany,
        OperationKind::DisableDomain,
        OperationKind::DisableCompany,
        OperationKind::DeleteEmployee,
        OperationKind::ReadAll,
        OperationKind::ListByKind,
        OperationKind::GetById,
    ];

    /// Name of the contract function this kind invokes.
    #[must_use]
    pub fn function_name(&self) -> &'static str {
        match self {
            OperationKind::InitDomain => "init_domain",
            OperationKind::InitCompany => "init_company",
            OperationKind::InitEmployee => "init_employee",
            OperationKind::SetDomain => "set_domain",
            OperationKind::SetCompany => "set_company",
            OperationKind::DisableDomain => "disable_domain",
            OperationKind::DisableCompany => "disable_company",
            OperationKind::DeleteEmployee => "delete_employee",
            OperationKind::ReadAll => "read_all_data",
            OperationKind::ListByKind => "getAllEmployee",
            OperationKind::GetById => "getEmployeeById",
        }
    }

    /// Number of positional arguments the contract function expects.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            OperationKind::InitEmployee => 8,
            OperationKind::SetDomain | OperationKind::SetCompany => 3,
            OperationKind::InitDomain
            | OperationKind::InitCompany
            | OperationKind::DisableDomain
            | OperationKind::DisableCompany
            | OperationKind::DeleteEmployee
            | OperationKind::ListByKind => 2,
            OperationKind::GetById => 1,
            OperationKind::ReadAll => 0,
        }
    }

    /// Whether this kind changes ledger state (write path).
    #[must_use]
    pub fn is_write(&self) -> bool {
        !self.is_read()
    }

    /// Whether this kind is a read-only query (read path).
    #[must_use]
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            OperationKind::ReadAll | OperationKind::ListByKind | OperationKind::GetById
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::InitDomain => "init-domain",
            OperationKind::InitCompany => "init-company",
            OperationKind::InitEmployee => "init-employee",
            OperationKind::SetDomain => "set-domain",
            OperationKind::SetCompany => "set-company",
            OperationKind::DisableDomain => "disable-domain",
            OperationKind::DisableCompany => "disable-company",
            OperationKind::DeleteEmployee => "delete-employee",
            OperationKind::ReadAll => "read-all",
            OperationKind::ListByKind => "list-by-kind",
            OperationKind::GetById => "get-by-id",
        };
        f.write_str(name)
    }
}

/// A logical request: an operation kind plus its ordered arguments.
///
/// Immutable once constructed. The argument count is checked against the
/// contract function's arity so malformed requests never reach a peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    kind: OperationKind,
    args: Vec<String>,
}

impl Operation {
    /// Build an operation, checking the argument count.
    pub fn new<I, S>(kind: OperationKind, args: I) -> Result<Self, OperationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if args.len() != kind.arity() {
            return Err(OperationError::ArityMismatch {
                kind,
                expected: kind.arity(),
                actual: args.len(),
            });
        }
        Ok(Self { kind, args })
    }

    /// The operation kind.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// The positional arguments, in contract order.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Contract function invoked by this operation.
    #[must_use]
    pub fn function_name(&self) -> &'static str {
        self.kind.function_name()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.args.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_enforced() {
        let err = Operation::new(OperationKind::InitDomain, ["d1"]).unwrap_err();
        assert_eq!(
            err,
            OperationError::ArityMismatch {
                kind: OperationKind::InitDomain,
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_init_employee_takes_eight_args() {
        let op = Operation::new(
            OperationKind::InitEmployee,
            ["e1", "Ada", "Engineer", "1990-01-01", "d1", "Ops", "c1", "Acme"],
        )
        .unwrap();
        assert_eq!(op.args().len(), 8);
        assert_eq!(op.function_name(), "init_employee");
    }

    #[test]
    fn test_read_all_takes_no_args() {
        let op = Operation::new(OperationKind::ReadAll, Vec::<String>::new()).unwrap();
        assert!(op.args().is_empty());
        assert!(op.kind().is_read());
    }

    #[test]
    fn test_read_write_split() {
        let writes = OperationKind::ALL.iter().filter(|k| k.is_write()).count();
        let reads = OperationKind::ALL.iter().filter(|k| k.is_read()).count();
        assert_eq!(writes, 8);
        assert_eq!(reads, 3);
    }

    #[test]
    fn test_function_names_are_unique() {
        let mut names: Vec<_> = OperationKind::ALL.iter().map(|k| k.function_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), OperationKind::ALL.len());
    }

    #[test]
    fn test_display() {
        let op = Operation::new(OperationKind::GetById, ["e7"]).unwrap();
        assert_eq!(op.to_string(), "get-by-id(e7)");
    }
}
