use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

use stitchline_api::models::{ProductionRun, ProductionRunInput};
use stitchline_api::orm::production::{
    delete_production_run, insert_production_run, list_production_runs,
};

use crate::admin_cli::utils::{cli_actor, collect_pages, confirm, name_matcher, parse_date};

#[derive(Subcommand)]
pub enum RunAction {
    /// List production runs, optionally filtered by product name
    Ls {
        /// Search term to filter runs by product name (regex by default)
        search_term: Option<String>,
        /// Treat the search term as a fixed string instead of a regex
        #[arg(short = 'F', long)]
        fixed_string: bool,
    },
    /// Add a new production run
    Add {
        /// Product name
        product_name: String,
        /// Target quantity
        target_quantity: i32,
        /// Cut quantity ceiling
        cut_quantity: i32,
        /// Start date (YYYY-MM-DD)
        start_date: String,
    },
    /// Remove production runs matching a search term
    Rm {
        /// Search term to match runs by product name (regex by default)
        search_term: String,
        /// Treat the search term as a fixed string instead of a regex
        #[arg(short = 'F', long)]
        fixed_string: bool,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

fn print_run(run: &ProductionRun) {
    println!(
        "ID: {}, Product: {}, Target: {}, Cut: {}, Status: {}, Started: {}",
        run.id, run.product_name, run.target_quantity, run.cut_quantity, run.status, run.start_date
    );
}

pub fn handle_run_command_with_conn(
    conn: &mut SqliteConnection,
    action: RunAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RunAction::Ls { search_term, fixed_string } => {
            let mut runs = collect_pages(|q| list_production_runs(conn, q))?;

            if let Some(term) = &search_term {
                let matches = name_matcher(term, fixed_string)?;
                runs.retain(|r| matches(&r.product_name));
            }

            if runs.is_empty() {
                println!("No production runs found");
            } else {
                for run in &runs {
                    print_run(run);
                }
            }
            Ok(())
        }
        RunAction::Add { product_name, target_quantity, cut_quantity, start_date } => {
            if target_quantity <= 0 || cut_quantity <= 0 {
                return Err("target_quantity and cut_quantity must be positive".into());
            }
            let input = ProductionRunInput {
                product_name,
                target_quantity,
                cut_quantity,
                start_date: parse_date(&start_date)?,
                materials: Vec::new(),
            };
            let run = insert_production_run(conn, &input, &cli_actor())
                .map_err(|e| format!("Failed to create production run: {}", e))?;
            println!("Production run created successfully:");
            print_run(&run);
            Ok(())
        }
        RunAction::Rm { search_term, fixed_string, yes } => {
            let matches = name_matcher(&search_term, fixed_string)?;
            let mut runs = collect_pages(|q| list_production_runs(conn, q))?;
            runs.retain(|r| matches(&r.product_name));

            if runs.is_empty() {
                println!("No production runs found matching '{}'", search_term);
                return Ok(());
            }

            println!("The following production runs will be deleted:");
            for run in &runs {
                print_run(run);
            }

            if !confirm(&format!("Delete {} run(s)?", runs.len()), yes)? {
                println!("Aborted");
                return Ok(());
            }

            let actor = cli_actor();
            let mut errors = Vec::new();
            for run in &runs {
                match delete_production_run(conn, run.id, &actor) {
                    Ok(true) => println!("Deleted run {} ({})", run.id, run.product_name),
                    Ok(false) => errors.push(format!("Run {} no longer exists", run.id)),
                    Err(e) => errors.push(format!("Failed to delete run {}: {}", run.id, e)),
                }
            }

            if errors.is_empty() {
                Ok(())
            } else {
                Err(errors.join("; ").into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchline_api::orm::testing::setup_test_db;

    fn add_action(product: &str) -> RunAction {
        RunAction::Add {
            product_name: product.to_string(),
            target_quantity: 300,
            cut_quantity: 320,
            start_date: "2026-05-01".to_string(),
        }
    }

    fn all_runs(conn: &mut diesel::SqliteConnection) -> Vec<ProductionRun> {
        collect_pages(|q| list_production_runs(conn, q)).unwrap()
    }

    #[test]
    fn test_add_creates_planned_run() {
        let mut conn = setup_test_db();

        handle_run_command_with_conn(&mut conn, add_action("Panjabi L")).unwrap();

        let runs = all_runs(&mut conn);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status, "planned");
        assert_eq!(runs[0].cut_quantity, 320);
    }

    #[test]
    fn test_add_rejects_non_positive_quantities() {
        let mut conn = setup_test_db();

        let action = RunAction::Add {
            product_name: "Panjabi L".to_string(),
            target_quantity: 300,
            cut_quantity: 0,
            start_date: "2026-05-01".to_string(),
        };
        assert!(handle_run_command_with_conn(&mut conn, action).is_err());
        assert!(all_runs(&mut conn).is_empty());
    }

    #[test]
    fn test_rm_deletes_matching_runs_only() {
        let mut conn = setup_test_db();
        handle_run_command_with_conn(&mut conn, add_action("Panjabi L")).unwrap();
        handle_run_command_with_conn(&mut conn, add_action("Kurti M")).unwrap();

        let action = RunAction::Rm {
            search_term: "^Panjabi".to_string(),
            fixed_string: false,
            yes: true,
        };
        handle_run_command_with_conn(&mut conn, action).unwrap();

        let runs = all_runs(&mut conn);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].product_name, "Kurti M");
    }
}
