//! # LG-02: Registry Client
//!
//! Typed access to the employee, domain and company registry contract.
//! Each method builds one `Operation` and hands it to the submission
//! subsystem; reads decode the returned JSON into records.
//!
//! ## Operations
//!
//! | Method | Contract function | Path |
//! |--------|-------------------|------|
//! | `add_domain` | `init_domain` | write |
//! | `add_company` | `init_company` | write |
//! | `add_employee` | `init_employee` | write |
//! | `change_employee_domain` | `set_domain` | write |
//! | `change_employee_company` | `set_company` | write |
//! | `disable_domain` | `disable_domain` | write |
//! | `disable_company` | `disable_company` | write |
//! | `delete_employee` | `delete_employee` | write |
//! | `read_all_data` | `read_all_data` | read |
//! | `list_domains` / `list_companies` / `list_employees` | `getAllEmployee` | read |
//! | `employee_by_id` | `getEmployeeById` | read |

pub mod client;
pub mod domain;

pub use client::RegistryClient;
pub use domain::*;
