use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

use stitchline_api::models::{Branch, BranchInput};
use stitchline_api::orm::branch::{delete_branch, insert_branch, list_branches};

use crate::admin_cli::utils::{cli_actor, collect_pages, confirm, name_matcher};

#[derive(Subcommand)]
pub enum BranchAction {
    /// List branches, optionally filtered by name
    Ls {
        /// Search term to filter branches by name (regex by default)
        search_term: Option<String>,
        /// Treat the search term as a fixed string instead of a regex
        #[arg(short = 'F', long)]
        fixed_string: bool,
    },
    /// Add a new branch
    Add {
        /// Branch name
        name: String,
        /// Owner or landlord name
        owner: String,
        /// Monthly rent
        rent: f64,
        /// Floor size in square feet
        size_sqft: f64,
        /// Flag this branch as the main building
        #[arg(long)]
        main: bool,
        /// Flag this branch as a sales outlet
        #[arg(long)]
        outlet: bool,
        /// Flag this branch as a manufacturing site
        #[arg(long)]
        manufacturing: bool,
        /// Facility to record for this branch (repeatable)
        #[arg(long = "facility")]
        facilities: Vec<String>,
    },
    /// Remove branches matching a search term
    Rm {
        /// Search term to match branches by name (regex by default)
        search_term: String,
        /// Treat the search term as a fixed string instead of a regex
        #[arg(short = 'F', long)]
        fixed_string: bool,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

fn print_branch(branch: &Branch) {
    let mut roles = Vec::new();
    if branch.is_main {
        roles.push("main");
    }
    if branch.is_outlet {
        roles.push("outlet");
    }
    if branch.is_manufacturing {
        roles.push("manufacturing");
    }
    println!(
        "ID: {}, Name: {}, Owner: {}, Rent: {:.2}, Size: {:.0} sqft, Roles: [{}]",
        branch.id,
        branch.name,
        branch.owner,
        branch.rent,
        branch.size_sqft,
        roles.join(", ")
    );
}

pub fn handle_branch_command_with_conn(
    conn: &mut SqliteConnection,
    action: BranchAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BranchAction::Ls { search_term, fixed_string } => {
            let mut branches = collect_pages(|q| list_branches(conn, q))?;

            if let Some(term) = &search_term {
                let matches = name_matcher(term, fixed_string)?;
                branches.retain(|b| matches(&b.name));
            }

            if branches.is_empty() {
                println!("No branches found");
            } else {
                for branch in &branches {
                    print_branch(branch);
                }
            }
            Ok(())
        }
        BranchAction::Add {
            name,
            owner,
            rent,
            size_sqft,
            main,
            outlet,
            manufacturing,
            facilities,
        } => {
            let input = BranchInput {
                name,
                owner,
                rent,
                size_sqft,
                is_main: main,
                is_outlet: outlet,
                is_manufacturing: manufacturing,
                facilities,
            };
            match insert_branch(conn, &input, &cli_actor()) {
                Ok(branch) => {
                    println!("Branch created successfully:");
                    print_branch(&branch);
                    Ok(())
                }
                Err(e) => Err(format!("Failed to create branch: {:?}", e).into()),
            }
        }
        BranchAction::Rm { search_term, fixed_string, yes } => {
            let matches = name_matcher(&search_term, fixed_string)?;
            let mut branches = collect_pages(|q| list_branches(conn, q))?;
            branches.retain(|b| matches(&b.name));

            if branches.is_empty() {
                println!("No branches found matching '{}'", search_term);
                return Ok(());
            }

            println!("The following branches will be deleted:");
            for branch in &branches {
                print_branch(branch);
            }

            if !confirm(
                &format!("Delete {} branch(es)?", branches.len()),
                yes,
            )? {
                println!("Aborted");
                return Ok(());
            }

            let actor = cli_actor();
            let mut errors = Vec::new();
            for branch in &branches {
                match delete_branch(conn, branch.id, &actor) {
                    Ok(true) => println!("Deleted branch '{}'", branch.name),
                    Ok(false) => {
                        errors.push(format!("Branch '{}' no longer exists", branch.name))
                    }
                    Err(e) => errors.push(format!(
                        "Failed to delete branch '{}': {}",
                        branch.name, e
                    )),
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
