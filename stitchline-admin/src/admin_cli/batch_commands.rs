use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

use stitchline_api::models::{PurchaseBatch, PurchaseBatchInput};
use stitchline_api::orm::purchase::{delete_batch, insert_purchase_batch, list_purchase_batches};

use crate::admin_cli::utils::{cli_actor, collect_pages, confirm, name_matcher, parse_date};

#[derive(Subcommand)]
pub enum BatchAction {
    /// List purchase batches, optionally filtered by supplier
    Ls {
        /// Search term to filter batches by supplier (regex by default)
        search_term: Option<String>,
        /// Treat the search term as a fixed string instead of a regex
        #[arg(short = 'F', long)]
        fixed_string: bool,
    },
    /// Add a new purchase batch (items are managed through the API)
    Add {
        /// Supplier name
        supplier: String,
        /// Purchase date (YYYY-MM-DD)
        purchase_date: String,
        /// Free-form note
        #[arg(long)]
        notes: Option<String>,
    },
    /// Remove purchase batches matching a search term
    Rm {
        /// Search term to match batches by supplier (regex by default)
        search_term: String,
        /// Treat the search term as a fixed string instead of a regex
        #[arg(short = 'F', long)]
        fixed_string: bool,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

fn print_batch(batch: &PurchaseBatch) {
    println!(
        "ID: {}, Supplier: {}, Date: {}, Total: {:.2}{}",
        batch.id,
        batch.supplier,
        batch.purchase_date,
        batch.total_cost,
        batch
            .notes
            .as_deref()
            .map(|n| format!(", Notes: {}", n))
            .unwrap_or_default()
    );
}

pub fn handle_batch_command_with_conn(
    conn: &mut SqliteConnection,
    action: BatchAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BatchAction::Ls { search_term, fixed_string } => {
            let mut batches = collect_pages(|q| list_purchase_batches(conn, q))?;

            if let Some(term) = &search_term {
                let matches = name_matcher(term, fixed_string)?;
                batches.retain(|b| matches(&b.supplier));
            }

            if batches.is_empty() {
                println!("No purchase batches found");
            } else {
                for batch in &batches {
                    print_batch(batch);
                }
            }
            Ok(())
        }
        BatchAction::Add { supplier, purchase_date, notes } => {
            let input = PurchaseBatchInput {
                supplier,
                purchase_date: parse_date(&purchase_date)?,
                notes,
                items: Vec::new(),
            };
            let batch = insert_purchase_batch(conn, &input, &cli_actor())
                .map_err(|e| format!("Failed to create purchase batch: {}", e))?;
            println!("Purchase batch created successfully:");
            print_batch(&batch);
            Ok(())
        }
        BatchAction::Rm { search_term, fixed_string, yes } => {
            let matches = name_matcher(&search_term, fixed_string)?;
            let mut batches = collect_pages(|q| list_purchase_batches(conn, q))?;
            batches.retain(|b| matches(&b.supplier));

            if batches.is_empty() {
                println!("No purchase batches found matching '{}'", search_term);
                return Ok(());
            }

            println!("The following purchase batches will be deleted:");
            for batch in &batches {
                print_batch(batch);
            }

            if !confirm(&format!("Delete {} batch(es)?", batches.len()), yes)? {
                println!("Aborted");
                return Ok(());
            }

            let actor = cli_actor();
            let mut errors = Vec::new();
            for batch in &batches {
                match delete_batch(conn, batch.id, &actor) {
                    Ok(true) => println!("Deleted batch {} ({})", batch.id, batch.supplier),
                    Ok(false) => errors.push(format!("Batch {} no longer exists", batch.id)),
                    Err(e) => errors.push(format!("Failed to delete batch {}: {}", batch.id, e)),
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
