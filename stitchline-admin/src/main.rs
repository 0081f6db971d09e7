//! Command line administration tool for the stitchline database.
//!
//! Connects directly to the SQLite database named by `DATABASE_URL`,
//! running pending migrations first. Mutations are attributed in the
//! activity log to the invoking system user.

mod admin_cli;

use clap::{Parser, Subcommand};

use admin_cli::batch_commands::{BatchAction, handle_batch_command_with_conn};
use admin_cli::branch_commands::{BranchAction, handle_branch_command_with_conn};
use admin_cli::contact_commands::{ContactAction, handle_contact_command_with_conn};
use admin_cli::job_order_commands::{JobOrderAction, handle_job_order_command_with_conn};
use admin_cli::run_commands::{RunAction, handle_run_command_with_conn};
use admin_cli::utils::establish_connection;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser)]
#[command(name = "stitchline-admin")]
#[command(about = "Administration CLI for the stitchline backend", version)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Show extended version information
    #[arg(long, action = clap::ArgAction::SetTrue)]
    version_info: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage branches
    Branch {
        #[command(subcommand)]
        action: BranchAction,
    },
    /// Manage employee contacts
    Contact {
        #[command(subcommand)]
        action: ContactAction,
    },
    /// Manage external job orders
    JobOrder {
        #[command(subcommand)]
        action: JobOrderAction,
    },
    /// Manage production runs
    Run {
        #[command(subcommand)]
        action: RunAction,
    },
    /// Manage purchase batches
    Batch {
        #[command(subcommand)]
        action: BatchAction,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.version_info {
        println!("stitchline-admin {}", built_info::PKG_VERSION);
        println!("Built: {}", built_info::BUILT_TIME_UTC);
        if let Some(commit) = built_info::GIT_COMMIT_HASH {
            println!("Git commit: {}", commit);
        }
        return;
    }

    let Some(command) = cli.command else {
        eprintln!("No command given; see --help");
        std::process::exit(2);
    };

    let mut conn = match establish_connection() {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let result = match command {
        Commands::Branch { action } => handle_branch_command_with_conn(&mut conn, action),
        Commands::Contact { action } => handle_contact_command_with_conn(&mut conn, action),
        Commands::JobOrder { action } => handle_job_order_command_with_conn(&mut conn, action),
        Commands::Run { action } => handle_run_command_with_conn(&mut conn, action),
        Commands::Batch { action } => handle_batch_command_with_conn(&mut conn, action),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
