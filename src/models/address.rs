use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Current,
    Permanent,
}

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Current => "current",
            AddressType::Permanent => "permanent",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(AddressType::Current),
            "permanent" => Ok(AddressType::Permanent),
            other => Err(format!("unknown address type '{}'", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmployeeAddress {
    pub id: Uuid,
    #[serde(skip)]
    pub employee_id: Uuid,
    pub address_type: AddressType,
    pub city: String,
    pub district: String,
    pub state: String,
    pub pin_code: String,
}

/// Row shape of `employee_addresses`; the type tag is stored as text.
#[derive(sqlx::FromRow, Debug)]
pub struct AddressRow {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub address_type: String,
    pub city: String,
    pub district: String,
    pub state: String,
    pub pin_code: String,
}

impl TryFrom<AddressRow> for EmployeeAddress {
    type Error = String;

    fn try_from(row: AddressRow) -> Result<Self, Self::Error> {
        Ok(EmployeeAddress {
            id: row.id,
            employee_id: row.employee_id,
            address_type: row.address_type.parse()?,
            city: row.city,
            district: row.district,
            state: row.state,
            pin_code: row.pin_code,
        })
    }
}
