use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

use crate::models::AddressType;

#[derive(Deserialize, Validate, Debug, Clone)]
pub struct NewContact {
    #[validate(length(max = 20))]
    pub mobile_phone_no: Option<String>,
    #[validate(email, length(max = 255))]
    pub email_id: String,
    #[validate(length(max = 20))]
    pub telephone_no: Option<String>,
}

#[derive(Deserialize, Validate, Debug, Clone)]
pub struct NewAddress {
    pub address_type: AddressType,
    #[validate(length(min = 1, max = 255))]
    pub city: String,
    #[validate(length(min = 1, max = 255))]
    pub district: String,
    #[validate(length(min = 1, max = 255))]
    pub state: String,
    #[validate(length(min = 1, max = 10))]
    pub pin_code: String,
}

/// Create contract for an employee and its initial children.
#[derive(Deserialize, Validate, Debug, Clone)]
pub struct NewEmployee {
    #[validate(length(min = 1, max = 255))]
    pub employee_id: String,
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,
    #[validate(length(max = 255))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    #[validate(length(max = 50))]
    pub gender: Option<String>,
    #[validate(length(max = 10))]
    pub blood_group: Option<String>,
    #[validate(length(max = 255))]
    pub nationality: Option<String>,
    #[validate(length(max = 50))]
    pub marital_status: Option<String>,
    pub marriage_date: Option<NaiveDate>,
    pub career_ambition: Option<String>,
    pub significant_achievements: Option<String>,
    pub professional_failures: Option<String>,
    pub strengths: Option<Vec<String>>,
    pub weaknesses: Option<Vec<String>>,
    #[serde(default)]
    pub referred_by_employee: bool,
    #[validate(length(max = 255))]
    pub referrer_name: Option<String>,
    #[validate(length(max = 20))]
    pub referrer_contact_no: Option<String>,
    #[serde(default)]
    #[validate]
    pub contacts: Vec<NewContact>,
    #[serde(default)]
    #[validate]
    pub addresses: Vec<NewAddress>,
}

/// Partial-update contract.
///
/// The outer `Option` is `None` when the field is absent from the request;
/// `Some(None)` is an explicit `null`. Only present fields are applied;
/// keys outside the patch (`id`, `employee_id`, children, timestamps) are ignored.
#[derive(Deserialize, Validate, Debug, Clone, Default)]
#[validate(schema(function = "reject_null_required_fields"))]
pub struct EmployeeUpdate {
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 255))]
    pub middle_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 50))]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 10))]
    pub blood_group: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 255))]
    pub nationality: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 50))]
    pub marital_status: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub marriage_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub career_ambition: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub significant_achievements: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub professional_failures: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub strengths: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub weaknesses: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub referred_by_employee: Option<Option<bool>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 255))]
    pub referrer_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 20))]
    pub referrer_contact_no: Option<Option<String>>,
}

impl EmployeeUpdate {
    /// True when the patch sets no field at all.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.middle_name.is_none()
            && self.last_name.is_none()
            && self.date_of_birth.is_none()
            && self.gender.is_none()
            && self.blood_group.is_none()
            && self.nationality.is_none()
            && self.marital_status.is_none()
            && self.marriage_date.is_none()
            && self.career_ambition.is_none()
            && self.significant_achievements.is_none()
            && self.professional_failures.is_none()
            && self.strengths.is_none()
            && self.weaknesses.is_none()
            && self.referred_by_employee.is_none()
            && self.referrer_name.is_none()
            && self.referrer_contact_no.is_none()
    }
}

#[derive(Deserialize, Validate, Debug, Clone, Copy)]
pub struct ListParams {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 0))]
    pub limit: i64,
}

impl Default for ListParams {
    fn default() -> Self {
        ListParams {
            skip: 0,
            limit: default_limit(),
        }
    }
}

fn default_limit() -> i64 {
    100
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn reject_null_required_fields(update: &EmployeeUpdate) -> Result<(), ValidationError> {
    let nulled = [
        ("first_name", matches!(update.first_name, Some(None))),
        ("last_name", matches!(update.last_name, Some(None))),
        ("date_of_birth", matches!(update.date_of_birth, Some(None))),
        (
            "referred_by_employee",
            matches!(update.referred_by_employee, Some(None)),
        ),
    ];

    if nulled.iter().any(|(_, is_null)| *is_null) {
        let mut err = ValidationError::new("not_nullable");
        for (field, _) in nulled.iter().filter(|(_, is_null)| *is_null) {
            err.add_param((*field).into(), &true);
        }
        err.message = Some("first_name, last_name, date_of_birth and referred_by_employee cannot be null".into());
        return Err(err);
    }
    Ok(())
}
