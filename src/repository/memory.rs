use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::EmployeeRepository;
use crate::errors::AppError;
use crate::models::{Employee, EmployeeAddress, EmployeeContact, EmployeeRecord};
use crate::schemas::{EmployeeUpdate, NewEmployee};

/// Process-local [`EmployeeRepository`] holding aggregates in insertion order.
///
/// Uniqueness of business identifiers and contact emails is checked under the
/// write lock, so a rejected create leaves the store untouched.
#[derive(Default)]
pub struct InMemoryEmployeeRepository {
    employees: RwLock<Vec<EmployeeRecord>>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.employees.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.employees.read().await.is_empty()
    }
}

macro_rules! apply_if_present {
    ($target:expr, $patch:ident, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = value.clone();
            }
        )+
    };
}

macro_rules! apply_required_if_present {
    ($target:expr, $patch:ident, $($field:ident),+ $(,)?) => {
        $(
            if let Some(Some(value)) = &$patch.$field {
                $target.$field = value.clone();
            }
        )+
    };
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn find_by_employee_id(&self, employee_id: &str) -> Result<Option<EmployeeRecord>, AppError> {
        let employees = self.employees.read().await;
        Ok(employees
            .iter()
            .find(|record| record.employee.employee_id == employee_id)
            .cloned())
    }

    async fn create(&self, new_employee: &NewEmployee) -> Result<EmployeeRecord, AppError> {
        let mut employees = self.employees.write().await;

        if employees
            .iter()
            .any(|record| record.employee.employee_id == new_employee.employee_id)
        {
            return Err(AppError::duplicate_employee_id(&new_employee.employee_id));
        }

        {
            let mut emails: HashSet<&str> = employees
                .iter()
                .flat_map(|record| record.contacts.iter())
                .filter_map(|contact| contact.email_id.as_deref())
                .collect();
            for contact in &new_employee.contacts {
                if !emails.insert(contact.email_id.as_str()) {
                    return Err(AppError::duplicate_email());
                }
            }
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        let employee = Employee {
            id,
            employee_id: new_employee.employee_id.clone(),
            first_name: new_employee.first_name.clone(),
            middle_name: new_employee.middle_name.clone(),
            last_name: new_employee.last_name.clone(),
            date_of_birth: new_employee.date_of_birth,
            gender: new_employee.gender.clone(),
            blood_group: new_employee.blood_group.clone(),
            nationality: new_employee.nationality.clone(),
            marital_status: new_employee.marital_status.clone(),
            marriage_date: new_employee.marriage_date,
            career_ambition: new_employee.career_ambition.clone(),
            significant_achievements: new_employee.significant_achievements.clone(),
            professional_failures: new_employee.professional_failures.clone(),
            strengths: new_employee.strengths.clone(),
            weaknesses: new_employee.weaknesses.clone(),
            referred_by_employee: new_employee.referred_by_employee,
            referrer_name: new_employee.referrer_name.clone(),
            referrer_contact_no: new_employee.referrer_contact_no.clone(),
            created_at: now,
            updated_at: now,
        };

        let contacts = new_employee
            .contacts
            .iter()
            .map(|contact| EmployeeContact {
                id: Uuid::new_v4(),
                employee_id: id,
                mobile_phone_no: contact.mobile_phone_no.clone(),
                email_id: Some(contact.email_id.clone()),
                telephone_no: contact.telephone_no.clone(),
            })
            .collect();

        let addresses = new_employee
            .addresses
            .iter()
            .map(|address| EmployeeAddress {
                id: Uuid::new_v4(),
                employee_id: id,
                address_type: address.address_type,
                city: address.city.clone(),
                district: address.district.clone(),
                state: address.state.clone(),
                pin_code: address.pin_code.clone(),
            })
            .collect();

        let mut record = EmployeeRecord {
            employee,
            contacts,
            addresses,
        };
        // Adding children counts as a mutation of the employee.
        if !record.contacts.is_empty() || !record.addresses.is_empty() {
            record.employee.updated_at = Utc::now().max(record.employee.updated_at);
        }
        employees.push(record.clone());
        Ok(record)
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<EmployeeRecord>, AppError> {
        let employees = self.employees.read().await;
        Ok(employees
            .iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<EmployeeRecord>, AppError> {
        let employees = self.employees.read().await;
        Ok(employees.iter().find(|record| record.id() == id).cloned())
    }

    async fn update(&self, existing: &EmployeeRecord, patch: &EmployeeUpdate) -> Result<EmployeeRecord, AppError> {
        let mut employees = self.employees.write().await;
        let record = employees
            .iter_mut()
            .find(|record| record.id() == existing.id())
            .ok_or_else(AppError::employee_not_found)?;

        let employee = &mut record.employee;
        apply_required_if_present!(employee, patch, first_name, last_name, date_of_birth, referred_by_employee);
        apply_if_present!(
            employee,
            patch,
            middle_name,
            gender,
            blood_group,
            nationality,
            marital_status,
            marriage_date,
            career_ambition,
            significant_achievements,
            professional_failures,
            strengths,
            weaknesses,
            referrer_name,
            referrer_contact_no,
        );
        employee.updated_at = Utc::now().max(employee.updated_at + Duration::microseconds(1));

        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<EmployeeRecord>, AppError> {
        let mut employees = self.employees.write().await;
        Ok(employees
            .iter()
            .position(|record| record.id() == id)
            .map(|index| employees.remove(index)))
    }
}
