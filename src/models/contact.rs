use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmployeeContact {
    pub id: Uuid,
    #[serde(skip)]
    pub employee_id: Uuid,
    pub mobile_phone_no: Option<String>,
    pub email_id: Option<String>,
    pub telephone_no: Option<String>,
}
