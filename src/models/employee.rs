use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};

use super::{EmployeeAddress, EmployeeContact};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: Uuid,
    pub employee_id: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub nationality: Option<String>,
    pub marital_status: Option<String>,
    pub marriage_date: Option<NaiveDate>,
    pub career_ambition: Option<String>,
    pub significant_achievements: Option<String>,
    pub professional_failures: Option<String>,
    pub strengths: Option<Vec<String>>,
    pub weaknesses: Option<Vec<String>>,
    pub referred_by_employee: bool,
    pub referrer_name: Option<String>,
    pub referrer_contact_no: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An employee together with its contacts and addresses, as returned to clients.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmployeeRecord {
    #[serde(flatten)]
    pub employee: Employee,
    pub contacts: Vec<EmployeeContact>,
    pub addresses: Vec<EmployeeAddress>,
}

impl EmployeeRecord {
    pub fn id(&self) -> Uuid {
        self.employee.id
    }
}
