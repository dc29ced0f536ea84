//! Registry domain: records, write requests and errors.

pub mod errors;
pub mod records;
pub mod requests;

pub use errors::RegistryError;
pub use records::{Company, CompanyRef, Domain, DomainRef, Employee, RangeEntry, RecordKind, Snapshot};
pub use requests::{CompanyChange, DomainChange, IntoOperation, NewCompany, NewDomain, NewEmployee};
