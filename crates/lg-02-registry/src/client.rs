//! Registry Client
//!
//! One method per contract operation. Writes go through the full
//! submission pipeline and return its outcome; reads decode the first
//! peer's payload into registry records.

use lg_01_submission::{SubmissionError, TransactionSubmissionApi};
use serde::de::DeserializeOwned;
use shared_types::{Operation, OperationKind, SubmissionOutcome};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{
    Company, CompanyChange, Domain, DomainChange, Employee, IntoOperation, NewCompany, NewDomain,
    NewEmployee, RangeEntry, RecordKind, RegistryError, Snapshot,
};

/// Typed front end over a submission API.
#[derive(Clone)]
pub struct RegistryClient {
    api: Arc<dyn TransactionSubmissionApi>,
}

impl RegistryClient {
    pub fn new(api: Arc<dyn TransactionSubmissionApi>) -> Self {
        Self { api }
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    pub async fn add_domain(&self, request: NewDomain) -> Result<SubmissionOutcome, RegistryError> {
        self.write(request.into_operation()?).await
    }

    pub async fn add_company(
        &self,
        request: NewCompany,
    ) -> Result<SubmissionOutcome, RegistryError> {
        self.write(request.into_operation()?).await
    }

    pub async fn add_employee(
        &self,
        request: NewEmployee,
    ) -> Result<SubmissionOutcome, RegistryError> {
        self.write(request.into_operation()?).await
    }

    pub async fn change_employee_domain(
        &self,
        request: DomainChange,
    ) -> Result<SubmissionOutcome, RegistryError> {
        self.write(request.into_operation()?).await
    }

    pub async fn change_employee_company(
        &self,
        request: CompanyChange,
    ) -> Result<SubmissionOutcome, RegistryError> {
        self.write(request.into_operation()?).await
    }

    /// Disable a domain, authorized by `authed_by_domain`.
    pub async fn disable_domain(
        &self,
        id: &str,
        authed_by_domain: &str,
    ) -> Result<SubmissionOutcome, RegistryError> {
        let op = Operation::new(OperationKind::DisableDomain, [id, authed_by_domain])?;
        self.write(op).await
    }

    /// Disable a company, authorized by `authed_by_company`.
    pub async fn disable_company(
        &self,
        id: &str,
        authed_by_company: &str,
    ) -> Result<SubmissionOutcome, RegistryError> {
        let op = Operation::new(OperationKind::DisableCompany, [id, authed_by_company])?;
        self.write(op).await
    }

    /// Delete an employee, authorized by `authed_by_domain`.
    pub async fn delete_employee(
        &self,
        id: &str,
        authed_by_domain: &str,
    ) -> Result<SubmissionOutcome, RegistryError> {
        let op = Operation::new(OperationKind::DeleteEmployee, [id, authed_by_domain])?;
        self.write(op).await
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Every employee, plus the enabled domains and companies.
    pub async fn read_all_data(&self) -> Result<Snapshot, RegistryError> {
        let op = Operation::new(OperationKind::ReadAll, Vec::<String>::new())?;
        self.read(op).await
    }

    pub async fn list_domains(&self) -> Result<Vec<RangeEntry<Domain>>, RegistryError> {
        self.list(RecordKind::Domain).await
    }

    pub async fn list_companies(&self) -> Result<Vec<RangeEntry<Company>>, RegistryError> {
        self.list(RecordKind::Company).await
    }

    pub async fn list_employees(&self) -> Result<Vec<RangeEntry<Employee>>, RegistryError> {
        self.list(RecordKind::Employee).await
    }

    /// A single employee. `NotFound` when the contract has no such key.
    pub async fn employee_by_id(&self, id: &str) -> Result<Employee, RegistryError> {
        let op = Operation::new(OperationKind::GetById, [id])?;
        match self.read(op).await {
            Err(RegistryError::Submission(SubmissionError::QueryNoResult { reason })) => {
                debug!(id, %reason, "Employee lookup found nothing");
                Err(RegistryError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    async fn list<T: DeserializeOwned>(
        &self,
        kind: RecordKind,
    ) -> Result<Vec<RangeEntry<T>>, RegistryError> {
        let (start, end) = kind.key_range();
        let op = Operation::new(OperationKind::ListByKind, [start, end])?;
        self.read(op).await
    }

    async fn write(&self, operation: Operation) -> Result<SubmissionOutcome, RegistryError> {
        info!(operation = %operation, "Registry write");
        let outcome = self.api.submit(operation).await?;
        Ok(outcome)
    }

    async fn read<T: DeserializeOwned>(&self, operation: Operation) -> Result<T, RegistryError> {
        debug!(operation = %operation, "Registry read");
        let payload = self.api.evaluate(operation).await?;
        Ok(serde_json::from_slice(&payload)?)
    }
}
