use std::collections::BTreeMap;

use diesel::dsl::sum;
use diesel::prelude::*;

use crate::list_query::{ListQuery, OrderDirection};
use crate::models::{
    CostBreakdown, CostCategoryTotal, NewProductionCost, NewProductionEntry, NewProductionMaterial,
    NewProductionRun, ProductionCost, ProductionCostInput, ProductionEntry, ProductionEntryInput,
    ProductionMaterial, ProductionRun, ProductionRunDetail, ProductionRunInput,
    UpdateProductionRunRequest,
};
use crate::orm::activity_log::log_activity;
use crate::orm::snapshot;

pub const RUN_STATUSES: &[&str] = &["planned", "in_progress", "completed"];

/// Failure modes for production entry writes.
#[derive(Debug)]
pub enum EntryError {
    RunNotFound,
    WorkerNotFound,
    /// The worker exists but has been soft-deleted.
    WorkerInactive,
    NonPositiveQuantity,
    /// The entry would push completed quantity past the cut ceiling.
    CeilingExceeded { remaining: i64 },
    Db(diesel::result::Error),
}

impl From<diesel::result::Error> for EntryError {
    fn from(e: diesel::result::Error) -> Self {
        EntryError::Db(e)
    }
}

/// Failure modes for run updates.
#[derive(Debug)]
pub enum RunUpdateError {
    NotFound,
    /// `cut_quantity` cannot drop below the quantity already completed.
    CeilingBelowCompleted { completed: i64 },
    Db(diesel::result::Error),
}

impl From<diesel::result::Error> for RunUpdateError {
    fn from(e: diesel::result::Error) -> Self {
        RunUpdateError::Db(e)
    }
}

/// Insert a production run and its material lines in one transaction.
pub fn insert_production_run(
    conn: &mut SqliteConnection,
    input: &ProductionRunInput,
    actor: &str,
) -> Result<ProductionRun, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::production_runs::dsl::*;

        let new_run = NewProductionRun {
            product_name: input.product_name.clone(),
            target_quantity: input.target_quantity,
            cut_quantity: input.cut_quantity,
            status: "planned".to_string(),
            start_date: input.start_date,
        };

        diesel::insert_into(production_runs)
            .values(&new_run)
            .execute(conn)?;

        let new_id = crate::orm::last_insert_rowid(conn)?;

        for material_line in &input.materials {
            let new_material = NewProductionMaterial {
                run_id: new_id,
                material: material_line.material.clone(),
                quantity: material_line.quantity,
                unit: material_line.unit.clone(),
            };
            diesel::insert_into(crate::schema::production_materials::table)
                .values(&new_material)
                .execute(conn)?;
        }

        let run = production_runs.filter(id.eq(new_id)).first::<ProductionRun>(conn)?;

        log_activity(conn, actor, "create", "production_runs", run.id, None, snapshot(&run))?;

        Ok(run)
    })
}

pub fn get_run_by_id(
    conn: &mut SqliteConnection,
    rid: i32,
) -> Result<Option<ProductionRun>, diesel::result::Error> {
    use crate::schema::production_runs::dsl::*;
    production_runs.filter(id.eq(rid)).first::<ProductionRun>(conn).optional()
}

/// Total pieces completed against a run so far.
pub fn completed_quantity(
    conn: &mut SqliteConnection,
    rid: i32,
) -> Result<i64, diesel::result::Error> {
    use crate::schema::production_entries::dsl::*;
    let total: Option<i64> = production_entries
        .filter(run_id.eq(rid))
        .select(sum(quantity_completed))
        .first(conn)?;
    Ok(total.unwrap_or(0))
}

pub fn get_materials_for_run(
    conn: &mut SqliteConnection,
    rid: i32,
) -> Result<Vec<ProductionMaterial>, diesel::result::Error> {
    use crate::schema::production_materials::dsl::*;
    production_materials
        .filter(run_id.eq(rid))
        .order(id.asc())
        .load::<ProductionMaterial>(conn)
}

pub fn get_costs_for_run(
    conn: &mut SqliteConnection,
    rid: i32,
) -> Result<Vec<ProductionCost>, diesel::result::Error> {
    use crate::schema::production_costs::dsl::*;
    production_costs
        .filter(run_id.eq(rid))
        .order(id.asc())
        .load::<ProductionCost>(conn)
}

pub fn get_entries_for_run(
    conn: &mut SqliteConnection,
    rid: i32,
) -> Result<Vec<ProductionEntry>, diesel::result::Error> {
    use crate::schema::production_entries::dsl::*;
    production_entries
        .filter(run_id.eq(rid))
        .order(id.asc())
        .load::<ProductionEntry>(conn)
}

/// Run with children and progress figures.
pub fn get_run_detail(
    conn: &mut SqliteConnection,
    rid: i32,
) -> Result<Option<ProductionRunDetail>, diesel::result::Error> {
    let Some(run) = get_run_by_id(conn, rid)? else {
        return Ok(None);
    };

    let materials = get_materials_for_run(conn, rid)?;
    let costs = get_costs_for_run(conn, rid)?;
    let completed = completed_quantity(conn, rid)?;

    Ok(Some(ProductionRunDetail {
        remaining_quantity: run.cut_quantity as i64 - completed,
        completed_quantity: completed,
        run,
        materials,
        costs,
    }))
}

/// One page of production runs plus the unpaged total.
pub fn list_production_runs(
    conn: &mut SqliteConnection,
    query: &ListQuery,
) -> Result<(Vec<ProductionRun>, i64), diesel::result::Error> {
    use crate::schema::production_runs::dsl::*;

    let total: i64 = production_runs.count().get_result(conn)?;

    let mut rows_query = production_runs.into_boxed();
    rows_query = match (query.sort_key(), query.direction()) {
        (Some("product_name"), OrderDirection::Asc) => rows_query.order(product_name.asc()),
        (Some("product_name"), OrderDirection::Desc) => rows_query.order(product_name.desc()),
        (Some("start_date"), OrderDirection::Asc) => rows_query.order(start_date.asc()),
        (Some("start_date"), OrderDirection::Desc) => rows_query.order(start_date.desc()),
        (Some("status"), OrderDirection::Asc) => rows_query.order(status.asc()),
        (Some("status"), OrderDirection::Desc) => rows_query.order(status.desc()),
        (_, OrderDirection::Desc) => rows_query.order(id.desc()),
        _ => rows_query.order(id.asc()),
    };

    let rows = rows_query
        .limit(query.per_page())
        .offset(query.offset())
        .load::<ProductionRun>(conn)?;

    Ok((rows, total))
}

/// Update a run, preserving unspecified fields. The cut ceiling can never
/// drop below what workers have already completed.
pub fn update_production_run(
    conn: &mut SqliteConnection,
    rid: i32,
    changes: &UpdateProductionRunRequest,
    actor: &str,
) -> Result<ProductionRun, RunUpdateError> {
    conn.transaction::<ProductionRun, RunUpdateError, _>(|conn| {
        use crate::schema::production_runs::dsl::*;

        let current = production_runs
            .filter(id.eq(rid))
            .first::<ProductionRun>(conn)
            .optional()?
            .ok_or(RunUpdateError::NotFound)?;

        let new_ceiling = changes.cut_quantity.unwrap_or(current.cut_quantity);
        let completed = completed_quantity(conn, rid)?;
        if (new_ceiling as i64) < completed {
            return Err(RunUpdateError::CeilingBelowCompleted { completed });
        }

        let before = snapshot(&current);

        diesel::update(production_runs.filter(id.eq(rid)))
            .set((
                product_name.eq(changes.product_name.clone().unwrap_or(current.product_name)),
                target_quantity.eq(changes.target_quantity.unwrap_or(current.target_quantity)),
                cut_quantity.eq(new_ceiling),
                status.eq(changes.status.clone().unwrap_or(current.status)),
                start_date.eq(changes.start_date.unwrap_or(current.start_date)),
            ))
            .execute(conn)?;

        let run = production_runs.filter(id.eq(rid)).first::<ProductionRun>(conn)?;

        log_activity(conn, actor, "update", "production_runs", rid, before, snapshot(&run))?;

        Ok(run)
    })
}

/// Delete a run; materials, costs, and entries cascade at the database level.
pub fn delete_production_run(
    conn: &mut SqliteConnection,
    rid: i32,
    actor: &str,
) -> Result<bool, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::production_runs::dsl::*;

        let existing = production_runs
            .filter(id.eq(rid))
            .first::<ProductionRun>(conn)
            .optional()?;

        let Some(run) = existing else {
            return Ok(false);
        };

        diesel::delete(production_runs.filter(id.eq(rid))).execute(conn)?;

        log_activity(conn, actor, "delete", "production_runs", rid, snapshot(&run), None)?;

        Ok(true)
    })
}

/// Add a cost entry to a run.
pub fn add_cost(
    conn: &mut SqliteConnection,
    rid: i32,
    input: &ProductionCostInput,
    actor: &str,
) -> Result<ProductionCost, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::production_costs::dsl::*;

        // FK would catch this too, but a missing run should read as NotFound
        // rather than a constraint violation.
        get_run_by_id(conn, rid)?.ok_or(diesel::result::Error::NotFound)?;

        let new_cost = NewProductionCost {
            run_id: rid,
            category: input.category.clone(),
            description: input.description.clone(),
            amount: input.amount,
        };

        diesel::insert_into(production_costs)
            .values(&new_cost)
            .execute(conn)?;

        let new_id = crate::orm::last_insert_rowid(conn)?;
        let cost = production_costs.filter(id.eq(new_id)).first::<ProductionCost>(conn)?;

        log_activity(conn, actor, "create", "production_costs", cost.id, None, snapshot(&cost))?;

        Ok(cost)
    })
}

/// Per-category cost rollup for one run.
pub fn cost_breakdown(
    conn: &mut SqliteConnection,
    rid: i32,
) -> Result<CostBreakdown, diesel::result::Error> {
    let costs = get_costs_for_run(conn, rid)?;

    let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
    let mut total = 0.0;
    for cost in &costs {
        *by_category.entry(cost.category.clone()).or_insert(0.0) += cost.amount;
        total += cost.amount;
    }

    Ok(CostBreakdown {
        categories: by_category
            .into_iter()
            .map(|(category, amount)| CostCategoryTotal { category, amount })
            .collect(),
        total,
    })
}

/// Record a worker's completion entry against a run.
///
/// The ceiling check, the insert, and the run-status bump all happen in one
/// transaction: an entry that would push the completed sum past
/// `cut_quantity` is rejected and nothing is written.
pub fn add_production_entry(
    conn: &mut SqliteConnection,
    rid: i32,
    input: &ProductionEntryInput,
    actor: &str,
) -> Result<ProductionEntry, EntryError> {
    conn.transaction::<ProductionEntry, EntryError, _>(|conn| {
        use crate::schema::production_entries::dsl::*;

        if input.quantity_completed <= 0 {
            return Err(EntryError::NonPositiveQuantity);
        }

        let run = get_run_by_id(conn, rid)?.ok_or(EntryError::RunNotFound)?;

        let worker = crate::orm::contact::get_contact_by_id(conn, input.worker_contact_id)?
            .ok_or(EntryError::WorkerNotFound)?;
        if !worker.is_active {
            return Err(EntryError::WorkerInactive);
        }

        let completed = completed_quantity(conn, rid)?;
        let remaining = run.cut_quantity as i64 - completed;
        if input.quantity_completed as i64 > remaining {
            return Err(EntryError::CeilingExceeded { remaining });
        }

        let new_entry = NewProductionEntry {
            run_id: rid,
            worker_contact_id: input.worker_contact_id,
            entry_date: input.entry_date,
            quantity_completed: input.quantity_completed,
            piece_rate: input.piece_rate,
            settled: false,
        };

        diesel::insert_into(production_entries)
            .values(&new_entry)
            .execute(conn)?;

        let new_id = crate::orm::last_insert_rowid(conn)?;
        let entry = production_entries
            .filter(id.eq(new_id))
            .first::<ProductionEntry>(conn)?;

        // Status follows progress: first entry starts the run, reaching the
        // ceiling completes it.
        let new_total = completed + input.quantity_completed as i64;
        let new_status = if new_total >= run.cut_quantity as i64 {
            "completed"
        } else if run.status == "planned" {
            "in_progress"
        } else {
            run.status.as_str()
        };
        if new_status != run.status {
            use crate::schema::production_runs::dsl as run_dsl;
            diesel::update(run_dsl::production_runs.filter(run_dsl::id.eq(rid)))
                .set(run_dsl::status.eq(new_status))
                .execute(conn)?;
        }

        log_activity(conn, actor, "create", "production_entries", entry.id, None, snapshot(&entry))?;

        Ok(entry)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContactInput, ProductionMaterialInput};
    use crate::orm::contact::insert_contact;
    use crate::orm::testing::setup_test_db;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn run_input(cut: i32) -> ProductionRunInput {
        ProductionRunInput {
            product_name: "Polo Shirt M".to_string(),
            target_quantity: cut,
            cut_quantity: cut,
            start_date: date(2026, 6, 1),
            materials: vec![ProductionMaterialInput {
                material: "pique knit".to_string(),
                quantity: 120.0,
                unit: "kg".to_string(),
            }],
        }
    }

    fn worker(conn: &mut SqliteConnection, name: &str) -> i32 {
        let input = ContactInput {
            name: name.to_string(),
            phone: "01811-000000".to_string(),
            department: "sewing".to_string(),
            salary: 0.0,
            join_date: date(2025, 1, 6),
        };
        insert_contact(conn, &input, "system").unwrap().id
    }

    fn entry_input(worker_id: i32, qty: i32) -> ProductionEntryInput {
        ProductionEntryInput {
            worker_contact_id: worker_id,
            entry_date: date(2026, 6, 2),
            quantity_completed: qty,
            piece_rate: 3.0,
            actor: None,
        }
    }

    #[test]
    fn test_insert_run_with_materials() {
        let mut conn = setup_test_db();

        let run = insert_production_run(&mut conn, &run_input(400), "planner").unwrap();
        assert_eq!(run.status, "planned");

        let detail = get_run_detail(&mut conn, run.id).unwrap().unwrap();
        assert_eq!(detail.materials.len(), 1);
        assert_eq!(detail.completed_quantity, 0);
        assert_eq!(detail.remaining_quantity, 400);
    }

    #[test]
    fn test_entry_ceiling_enforced_without_mutation() {
        let mut conn = setup_test_db();

        let run = insert_production_run(&mut conn, &run_input(100), "planner").unwrap();
        let w = worker(&mut conn, "Joynal");

        add_production_entry(&mut conn, run.id, &entry_input(w, 60), "floor").unwrap();
        add_production_entry(&mut conn, run.id, &entry_input(w, 30), "floor").unwrap();

        let err = add_production_entry(&mut conn, run.id, &entry_input(w, 20), "floor")
            .expect_err("entry past the ceiling must be rejected");
        assert!(matches!(err, EntryError::CeilingExceeded { remaining: 10 }));

        // Stored data is untouched by the rejected entry.
        assert_eq!(completed_quantity(&mut conn, run.id).unwrap(), 90);
        assert_eq!(get_entries_for_run(&mut conn, run.id).unwrap().len(), 2);

        // Exactly reaching the ceiling is allowed.
        add_production_entry(&mut conn, run.id, &entry_input(w, 10), "floor").unwrap();
        assert_eq!(completed_quantity(&mut conn, run.id).unwrap(), 100);
    }

    #[test]
    fn test_entry_bumps_run_status() {
        let mut conn = setup_test_db();

        let run = insert_production_run(&mut conn, &run_input(50), "planner").unwrap();
        let w = worker(&mut conn, "Shefali");

        add_production_entry(&mut conn, run.id, &entry_input(w, 20), "floor").unwrap();
        let run_now = get_run_by_id(&mut conn, run.id).unwrap().unwrap();
        assert_eq!(run_now.status, "in_progress");

        add_production_entry(&mut conn, run.id, &entry_input(w, 30), "floor").unwrap();
        let run_now = get_run_by_id(&mut conn, run.id).unwrap().unwrap();
        assert_eq!(run_now.status, "completed");
    }

    #[test]
    fn test_entry_rejects_bad_worker_and_quantity() {
        let mut conn = setup_test_db();

        let run = insert_production_run(&mut conn, &run_input(50), "planner").unwrap();
        let w = worker(&mut conn, "Retired");
        crate::orm::contact::deactivate_contact(&mut conn, w, "hr").unwrap();

        let err = add_production_entry(&mut conn, run.id, &entry_input(w, 10), "floor").unwrap_err();
        assert!(matches!(err, EntryError::WorkerInactive));

        let err = add_production_entry(&mut conn, run.id, &entry_input(9999, 10), "floor").unwrap_err();
        assert!(matches!(err, EntryError::WorkerNotFound));

        let w2 = worker(&mut conn, "Active");
        let err = add_production_entry(&mut conn, run.id, &entry_input(w2, 0), "floor").unwrap_err();
        assert!(matches!(err, EntryError::NonPositiveQuantity));

        let err = add_production_entry(&mut conn, 9999, &entry_input(w2, 10), "floor").unwrap_err();
        assert!(matches!(err, EntryError::RunNotFound));
    }

    #[test]
    fn test_ceiling_cannot_drop_below_completed() {
        let mut conn = setup_test_db();

        let run = insert_production_run(&mut conn, &run_input(100), "planner").unwrap();
        let w = worker(&mut conn, "Joynal");
        add_production_entry(&mut conn, run.id, &entry_input(w, 80), "floor").unwrap();

        let changes = UpdateProductionRunRequest {
            cut_quantity: Some(60),
            product_name: None,
            target_quantity: None,
            status: None,
            start_date: None,
        };
        let err = update_production_run(&mut conn, run.id, &changes, "planner").unwrap_err();
        assert!(matches!(err, RunUpdateError::CeilingBelowCompleted { completed: 80 }));
    }

    #[test]
    fn test_cost_breakdown_groups_by_category() {
        let mut conn = setup_test_db();

        let run = insert_production_run(&mut conn, &run_input(100), "planner").unwrap();
        for (cat, amount) in [("fabric", 900.0), ("labor", 400.0), ("fabric", 100.0)] {
            let input = ProductionCostInput {
                category: cat.to_string(),
                description: None,
                amount,
                actor: None,
            };
            add_cost(&mut conn, run.id, &input, "accounts").unwrap();
        }

        let breakdown = cost_breakdown(&mut conn, run.id).unwrap();
        assert_eq!(breakdown.total, 1400.0);
        assert_eq!(
            breakdown.categories,
            vec![
                CostCategoryTotal { category: "fabric".to_string(), amount: 1000.0 },
                CostCategoryTotal { category: "labor".to_string(), amount: 400.0 },
            ]
        );
    }
}
