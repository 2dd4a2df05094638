use std::sync::Arc;
use tracing::{debug, info};

use crate::error::AppError;
use crate::model::employee::{Employee, EmployeeId, EmployeeInput};
use crate::model::user::UserId;
use crate::store::EmployeeStore;

/// Employee CRUD scoped to the requesting owner.
///
/// A record owned by someone else is reported exactly like a missing one.
/// Email uniqueness is global across owners.
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner_id: UserId, input: &EmployeeInput) -> Result<Employee, AppError> {
        let input = input.normalized().map_err(AppError::Validation)?;

        if self.store.email_taken(&input.email).await? {
            return Err(AppError::DuplicateEmail);
        }

        let employee = self.store.insert(owner_id, &input).await?;
        info!(owner_id, employee_id = employee.id, "Employee created");
        Ok(employee)
    }

    pub async fn get(&self, owner_id: UserId, id: EmployeeId) -> Result<Employee, AppError> {
        self.store
            .find_owned(owner_id, id)
            .await?
            .ok_or_else(|| AppError::employee_not_found(id))
    }

    pub async fn list(&self, owner_id: UserId) -> Result<Vec<Employee>, AppError> {
        let employees = self.store.list_owned(owner_id).await?;
        debug!(owner_id, count = employees.len(), "Employees listed");
        Ok(employees)
    }

    /// Overwrites names and email; id and owner never change.
    pub async fn update(
        &self,
        owner_id: UserId,
        id: EmployeeId,
        input: &EmployeeInput,
    ) -> Result<Employee, AppError> {
        let input = input.normalized().map_err(AppError::Validation)?;
        let current = self.get(owner_id, id).await?;

        if current.email != input.email && self.store.email_taken(&input.email).await? {
            return Err(AppError::DuplicateEmail);
        }

        // a concurrent delete between the check and the write reads as not found
        if !self.store.update_owned(owner_id, id, &input).await? {
            return Err(AppError::employee_not_found(id));
        }

        info!(owner_id, employee_id = id, "Employee updated");
        Ok(Employee {
            id: current.id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            owner_id: current.owner_id,
        })
    }

    pub async fn delete(&self, owner_id: UserId, id: EmployeeId) -> Result<(), AppError> {
        if !self.store.delete_owned(owner_id, id).await? {
            return Err(AppError::employee_not_found(id));
        }

        info!(owner_id, employee_id = id, "Employee deleted");
        Ok(())
    }
}
