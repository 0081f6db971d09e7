use chrono::NaiveDate;
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone, TS)]
#[diesel(table_name = crate::schema::staff_salary_entries)]
#[ts(export)]
pub struct StaffSalaryEntry {
    pub id: i32,
    pub contact_id: i32,
    #[ts(type = "string")]
    pub entry_date: NaiveDate,
    pub amount: f64,
    pub category: String,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::staff_salary_entries)]
pub struct NewStaffSalaryEntry {
    pub contact_id: i32,
    pub entry_date: NaiveDate,
    pub amount: f64,
    pub category: String,
}

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone, TS)]
#[diesel(table_name = crate::schema::staff_absences)]
#[ts(export)]
pub struct StaffAbsence {
    pub id: i32,
    pub contact_id: i32,
    #[ts(type = "string")]
    pub start_date: NaiveDate,
    #[ts(type = "string")]
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::staff_absences)]
pub struct NewStaffAbsence {
    pub contact_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct SalaryEntryInput {
    pub contact_id: i32,
    #[ts(type = "string")]
    pub entry_date: NaiveDate,
    pub amount: f64,
    pub category: String,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct AbsenceInput {
    pub contact_id: i32,
    #[ts(type = "string")]
    pub start_date: NaiveDate,
    #[ts(type = "string")]
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

/// One month of a contact's payroll calendar: salary totals and absence days.
#[derive(Debug, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct StaffMonthlySummary {
    pub contact_id: i32,
    pub year: i32,
    pub month: u32,
    pub salary_total: f64,
    pub salary_entry_count: i64,
    pub salary_daily_average: f64,
    pub absence_days: i64,
}
