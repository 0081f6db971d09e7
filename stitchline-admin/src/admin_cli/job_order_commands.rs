use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

use stitchline_api::models::{JobOrder, JobOrderInput};
use stitchline_api::orm::job_order::{
    delete_job_order, get_job_order_stats, insert_job_order, list_job_orders,
};

use crate::admin_cli::utils::{cli_actor, collect_pages, confirm, name_matcher, parse_date};

#[derive(Subcommand)]
pub enum JobOrderAction {
    /// List external job orders, optionally filtered by company name
    Ls {
        /// Search term to filter orders by company name (regex by default)
        search_term: Option<String>,
        /// Treat the search term as a fixed string instead of a regex
        #[arg(short = 'F', long)]
        fixed_string: bool,
    },
    /// Add a new job order
    Add {
        /// Client company name
        company_name: String,
        /// Order date (YYYY-MM-DD)
        order_date: String,
        /// Total pieces ordered
        total_pieces: i32,
        /// Rate per piece
        rate_per_piece: f64,
    },
    /// Remove job orders matching a search term
    Rm {
        /// Search term to match orders by company name (regex by default)
        search_term: String,
        /// Treat the search term as a fixed string instead of a regex
        #[arg(short = 'F', long)]
        fixed_string: bool,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Print the job order dashboard summary
    Stats,
}

fn print_order(order: &JobOrder) {
    println!(
        "ID: {}, Company: {}, Date: {}, Pieces: {}, Amount: {:.2}, Paid: {:.2}, Payment: {}, Status: {}",
        order.id,
        order.company_name,
        order.order_date,
        order.total_pieces,
        order.total_amount,
        order.paid_amount,
        order.payment_status,
        order.job_status
    );
}

pub fn handle_job_order_command_with_conn(
    conn: &mut SqliteConnection,
    action: JobOrderAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        JobOrderAction::Ls { search_term, fixed_string } => {
            let mut orders = collect_pages(|q| list_job_orders(conn, q))?;

            if let Some(term) = &search_term {
                let matches = name_matcher(term, fixed_string)?;
                orders.retain(|o| matches(&o.company_name));
            }

            if orders.is_empty() {
                println!("No job orders found");
            } else {
                for order in &orders {
                    print_order(order);
                }
            }
            Ok(())
        }
        JobOrderAction::Add { company_name, order_date, total_pieces, rate_per_piece } => {
            if total_pieces <= 0 {
                return Err("total_pieces must be positive".into());
            }
            if rate_per_piece < 0.0 {
                return Err("rate_per_piece must not be negative".into());
            }
            let input = JobOrderInput {
                company_name,
                order_date: parse_date(&order_date)?,
                total_pieces,
                rate_per_piece,
                operations: Vec::new(),
            };
            let order = insert_job_order(conn, &input, &cli_actor())
                .map_err(|e| format!("Failed to create job order: {}", e))?;
            println!("Job order created successfully:");
            print_order(&order);
            Ok(())
        }
        JobOrderAction::Rm { search_term, fixed_string, yes } => {
            let matches = name_matcher(&search_term, fixed_string)?;
            let mut orders = collect_pages(|q| list_job_orders(conn, q))?;
            orders.retain(|o| matches(&o.company_name));

            if orders.is_empty() {
                println!("No job orders found matching '{}'", search_term);
                return Ok(());
            }

            println!("The following job orders will be deleted:");
            for order in &orders {
                print_order(order);
            }

            if !confirm(&format!("Delete {} order(s)?", orders.len()), yes)? {
                println!("Aborted");
                return Ok(());
            }

            let actor = cli_actor();
            let mut errors = Vec::new();
            for order in &orders {
                match delete_job_order(conn, order.id, &actor) {
                    Ok(true) => println!("Deleted order {} ({})", order.id, order.company_name),
                    Ok(false) => errors.push(format!("Order {} no longer exists", order.id)),
                    Err(e) => errors.push(format!("Failed to delete order {}: {}", order.id, e)),
                }
            }

            if errors.is_empty() {
                Ok(())
            } else {
                Err(errors.join("; ").into())
            }
        }
        JobOrderAction::Stats => {
            let stats = get_job_order_stats(conn)?;
            println!("Orders: {}", stats.order_count);
            println!("Pieces: {}", stats.total_pieces);
            println!(
                "Amount: {:.2} (paid {:.2}, pending {:.2})",
                stats.total_amount, stats.paid_amount, stats.pending_amount
            );
            println!(
                "Payment: {} pending / {} partial / {} paid",
                stats.pending_count, stats.partial_count, stats.paid_count
            );
            println!(
                "Jobs: {} planned / {} in progress / {} completed ({:.1}% complete)",
                stats.planned_count,
                stats.in_progress_count,
                stats.completed_count,
                stats.completion_pct
            );
            for bucket in &stats.monthly {
                println!(
                    "  {}: {} orders, {} pieces, {:.2}",
                    bucket.month, bucket.order_count, bucket.pieces, bucket.amount
                );
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchline_api::orm::testing::setup_test_db;

    fn add_action(company: &str) -> JobOrderAction {
        JobOrderAction::Add {
            company_name: company.to_string(),
            order_date: "2026-04-10".to_string(),
            total_pieces: 500,
            rate_per_piece: 12.0,
        }
    }

    fn all_orders(conn: &mut diesel::SqliteConnection) -> Vec<JobOrder> {
        collect_pages(|q| list_job_orders(conn, q)).unwrap()
    }

    #[test]
    fn test_add_derives_total_amount() {
        let mut conn = setup_test_db();

        handle_job_order_command_with_conn(&mut conn, add_action("Meghna Traders")).unwrap();

        let orders = all_orders(&mut conn);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].total_amount, 6000.0);
        assert_eq!(orders[0].payment_status, "pending");
        assert_eq!(orders[0].job_status, "planned");
    }

    #[test]
    fn test_add_rejects_non_positive_pieces() {
        let mut conn = setup_test_db();

        let action = JobOrderAction::Add {
            company_name: "Meghna Traders".to_string(),
            order_date: "2026-04-10".to_string(),
            total_pieces: 0,
            rate_per_piece: 12.0,
        };
        assert!(handle_job_order_command_with_conn(&mut conn, action).is_err());
        assert!(all_orders(&mut conn).is_empty());
    }

    #[test]
    fn test_rm_deletes_matching_orders_only() {
        let mut conn = setup_test_db();
        handle_job_order_command_with_conn(&mut conn, add_action("Meghna Traders")).unwrap();
        handle_job_order_command_with_conn(&mut conn, add_action("Padma Fashions")).unwrap();

        let action = JobOrderAction::Rm {
            search_term: "Meghna".to_string(),
            fixed_string: true,
            yes: true,
        };
        handle_job_order_command_with_conn(&mut conn, action).unwrap();

        let orders = all_orders(&mut conn);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].company_name, "Padma Fashions");
    }

    #[test]
    fn test_stats_runs_on_empty_database() {
        let mut conn = setup_test_db();
        assert!(handle_job_order_command_with_conn(&mut conn, JobOrderAction::Stats).is_ok());
    }
}
