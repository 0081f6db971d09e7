use chrono::NaiveDate;
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An employee contact entry. Contacts are never hard-deleted; removing one
/// clears `is_active` so payroll history stays intact.
#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::employee_contacts)]
#[ts(export)]
pub struct EmployeeContact {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub department: String,
    pub salary: f64,
    #[ts(type = "string")]
    pub join_date: NaiveDate,
    pub is_active: bool,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::employee_contacts)]
pub struct NewEmployeeContact {
    pub name: String,
    pub phone: String,
    pub department: String,
    pub salary: f64,
    pub join_date: NaiveDate,
    pub is_active: bool,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ContactInput {
    pub name: String,
    pub phone: String,
    pub department: String,
    pub salary: f64,
    #[ts(type = "string")]
    pub join_date: NaiveDate,
}

/// Request payload for updating a contact (all fields optional)
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UpdateContactRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
    #[ts(type = "string | null")]
    pub join_date: Option<NaiveDate>,
}
