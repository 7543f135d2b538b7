use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::EmployeeRepository;
use crate::errors::AppError;
use crate::models::address::AddressRow;
use crate::models::{Employee, EmployeeAddress, EmployeeContact, EmployeeRecord};
use crate::schemas::{EmployeeUpdate, NewEmployee};

const EMPLOYEE_COLUMNS: &str = "id, employee_id, first_name, middle_name, last_name, date_of_birth, \
    gender, blood_group, nationality, marital_status, marriage_date, career_ambition, \
    significant_achievements, professional_failures, strengths, weaknesses, referred_by_employee, \
    referrer_name, referrer_contact_no, created_at, updated_at";

/// PostgreSQL implementation of [`EmployeeRepository`].
pub struct PgEmployeeRepository {
    pool: PgPool,
}

impl PgEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn fetch_employee(
    conn: &mut PgConnection,
    id: Uuid,
    lock: bool,
) -> Result<Option<Employee>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM employees WHERE id = $1{}",
        EMPLOYEE_COLUMNS,
        if lock { " FOR UPDATE" } else { "" }
    );
    sqlx::query_as::<_, Employee>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// Attaches contacts and addresses to each employee, two queries per batch.
async fn hydrate(
    conn: &mut PgConnection,
    employees: Vec<Employee>,
) -> Result<Vec<EmployeeRecord>, AppError> {
    if employees.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = employees.iter().map(|e| e.id).collect();

    let contacts = sqlx::query_as::<_, EmployeeContact>(
        "SELECT id, employee_id, mobile_phone_no, email_id, telephone_no \
         FROM employee_contacts WHERE employee_id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let addresses = sqlx::query_as::<_, AddressRow>(
        "SELECT id, employee_id, address_type, city, district, state, pin_code \
         FROM employee_addresses WHERE employee_id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut contacts_by_owner: HashMap<Uuid, Vec<EmployeeContact>> = HashMap::new();
    for contact in contacts {
        contacts_by_owner.entry(contact.employee_id).or_default().push(contact);
    }

    let mut addresses_by_owner: HashMap<Uuid, Vec<EmployeeAddress>> = HashMap::new();
    for row in addresses {
        let address = EmployeeAddress::try_from(row).map_err(AppError::Internal)?;
        addresses_by_owner.entry(address.employee_id).or_default().push(address);
    }

    Ok(employees
        .into_iter()
        .map(|employee| EmployeeRecord {
            contacts: contacts_by_owner.remove(&employee.id).unwrap_or_default(),
            addresses: addresses_by_owner.remove(&employee.id).unwrap_or_default(),
            employee,
        })
        .collect())
}

async fn load_record(conn: &mut PgConnection, id: Uuid) -> Result<Option<EmployeeRecord>, AppError> {
    match fetch_employee(conn, id, false).await? {
        Some(employee) => Ok(hydrate(conn, vec![employee]).await?.pop()),
        None => Ok(None),
    }
}

macro_rules! set_if_present {
    ($set:ident, $patch:ident, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$patch.$field {
                $set.push(concat!(stringify!($field), " = "));
                $set.push_bind_unseparated(value.clone());
            }
        )+
    };
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepository {
    async fn find_by_employee_id(&self, employee_id: &str) -> Result<Option<EmployeeRecord>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let sql = format!("SELECT {} FROM employees WHERE employee_id = $1", EMPLOYEE_COLUMNS);
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(employee_id)
            .fetch_optional(&mut *conn)
            .await?;

        match employee {
            Some(employee) => Ok(hydrate(&mut conn, vec![employee]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create(&self, new_employee: &NewEmployee) -> Result<EmployeeRecord, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO employees (
                id, employee_id, first_name, middle_name, last_name, date_of_birth,
                gender, blood_group, nationality, marital_status, marriage_date,
                career_ambition, significant_achievements, professional_failures,
                strengths, weaknesses, referred_by_employee, referrer_name,
                referrer_contact_no, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $20)
            "#,
        )
        .bind(id)
        .bind(&new_employee.employee_id)
        .bind(&new_employee.first_name)
        .bind(&new_employee.middle_name)
        .bind(&new_employee.last_name)
        .bind(new_employee.date_of_birth)
        .bind(&new_employee.gender)
        .bind(&new_employee.blood_group)
        .bind(&new_employee.nationality)
        .bind(&new_employee.marital_status)
        .bind(new_employee.marriage_date)
        .bind(&new_employee.career_ambition)
        .bind(&new_employee.significant_achievements)
        .bind(&new_employee.professional_failures)
        .bind(&new_employee.strengths)
        .bind(&new_employee.weaknesses)
        .bind(new_employee.referred_by_employee)
        .bind(&new_employee.referrer_name)
        .bind(&new_employee.referrer_contact_no)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for contact in &new_employee.contacts {
            sqlx::query(
                "INSERT INTO employee_contacts (id, employee_id, mobile_phone_no, email_id, telephone_no) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(Uuid::new_v4())
            .bind(id)
            .bind(&contact.mobile_phone_no)
            .bind(&contact.email_id)
            .bind(&contact.telephone_no)
            .execute(&mut *tx)
            .await?;
        }

        for address in &new_employee.addresses {
            sqlx::query(
                "INSERT INTO employee_addresses (id, employee_id, address_type, city, district, state, pin_code) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(Uuid::new_v4())
            .bind(id)
            .bind(address.address_type.as_str())
            .bind(&address.city)
            .bind(&address.district)
            .bind(&address.state)
            .bind(&address.pin_code)
            .execute(&mut *tx)
            .await?;
        }

        // Adding children counts as a mutation of the employee.
        if !new_employee.contacts.is_empty() || !new_employee.addresses.is_empty() {
            sqlx::query("UPDATE employees SET updated_at = GREATEST($1, updated_at) WHERE id = $2")
                .bind(Utc::now())
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!(
            "Created employee {} ({}) with {} contacts and {} addresses",
            new_employee.employee_id,
            id,
            new_employee.contacts.len(),
            new_employee.addresses.len()
        );

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Employee {} vanished after commit", id)))
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<EmployeeRecord>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let sql = format!("SELECT {} FROM employees OFFSET $1 LIMIT $2", EMPLOYEE_COLUMNS);
        let employees = sqlx::query_as::<_, Employee>(&sql)
            .bind(skip)
            .bind(limit)
            .fetch_all(&mut *conn)
            .await?;

        debug!("Listed {} employees (skip={}, limit={})", employees.len(), skip, limit);
        hydrate(&mut conn, employees).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<EmployeeRecord>, AppError> {
        let mut conn = self.pool.acquire().await?;
        load_record(&mut conn, id).await
    }

    async fn update(&self, existing: &EmployeeRecord, patch: &EmployeeUpdate) -> Result<EmployeeRecord, AppError> {
        let id = existing.id();
        let mut tx = self.pool.begin().await?;

        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE employees SET ");
        let mut set = query.separated(", ");
        set_if_present!(
            set,
            patch,
            first_name,
            middle_name,
            last_name,
            date_of_birth,
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
            referred_by_employee,
            referrer_name,
            referrer_contact_no,
        );
        // Strictly forward, even when two updates land within the clock resolution.
        set.push("updated_at = GREATEST(");
        set.push_bind_unseparated(Utc::now());
        set.push_unseparated(", updated_at + INTERVAL '1 microsecond')");
        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::employee_not_found());
        }

        let record = load_record(&mut tx, id)
            .await?
            .ok_or_else(AppError::employee_not_found)?;
        tx.commit().await?;
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<EmployeeRecord>, AppError> {
        let mut tx = self.pool.begin().await?;

        let Some(employee) = fetch_employee(&mut tx, id, true).await? else {
            return Ok(None);
        };
        let snapshot = hydrate(&mut tx, vec![employee]).await?.pop();

        sqlx::query("DELETE FROM employee_contacts WHERE employee_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM employee_addresses WHERE employee_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(snapshot)
    }
}
