use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A company building: the main office, an outlet, or a manufacturing unit.
///
/// `facilities` is stored as a JSON string array in the database; use
/// [`Branch::into_view`] to hand callers the parsed form.
#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::branches)]
#[ts(export)]
pub struct Branch {
    pub id: i32,
    pub name: String,
    pub owner: String,
    pub rent: f64,
    pub size_sqft: f64,
    pub is_main: bool,
    pub is_outlet: bool,
    pub is_manufacturing: bool,
    pub facilities: String,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::branches)]
pub struct NewBranch {
    pub name: String,
    pub owner: String,
    pub rent: f64,
    pub size_sqft: f64,
    pub is_main: bool,
    pub is_outlet: bool,
    pub is_manufacturing: bool,
    pub facilities: String,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct BranchInput {
    pub name: String,
    pub owner: String,
    pub rent: f64,
    pub size_sqft: f64,
    pub is_main: bool,
    pub is_outlet: bool,
    pub is_manufacturing: bool,
    #[serde(default)]
    pub facilities: Vec<String>,
}

/// Request payload for updating a branch (all fields optional)
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UpdateBranchRequest {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub rent: Option<f64>,
    pub size_sqft: Option<f64>,
    pub is_main: Option<bool>,
    pub is_outlet: Option<bool>,
    pub is_manufacturing: Option<bool>,
    pub facilities: Option<Vec<String>>,
}

/// Wire form of a branch with the facilities column parsed back into a list.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BranchView {
    pub id: i32,
    pub name: String,
    pub owner: String,
    pub rent: f64,
    pub size_sqft: f64,
    pub is_main: bool,
    pub is_outlet: bool,
    pub is_manufacturing: bool,
    pub facilities: Vec<String>,
}

impl Branch {
    pub fn into_view(self) -> BranchView {
        let facilities = serde_json::from_str(&self.facilities).unwrap_or_default();
        BranchView {
            id: self.id,
            name: self.name,
            owner: self.owner,
            rent: self.rent,
            size_sqft: self.size_sqft,
            is_main: self.is_main,
            is_outlet: self.is_outlet,
            is_manufacturing: self.is_manufacturing,
            facilities,
        }
    }
}
