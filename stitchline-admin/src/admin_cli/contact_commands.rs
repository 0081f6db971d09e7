use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

use stitchline_api::models::{ContactInput, EmployeeContact};
use stitchline_api::orm::contact::{
    deactivate_contact, insert_contact, list_contacts, restore_contact,
};

use crate::admin_cli::utils::{cli_actor, collect_pages, confirm, name_matcher, parse_date};

#[derive(Subcommand)]
pub enum ContactAction {
    /// List employee contacts, optionally filtered by name
    Ls {
        /// Search term to filter contacts by name (regex by default)
        search_term: Option<String>,
        /// Treat the search term as a fixed string instead of a regex
        #[arg(short = 'F', long)]
        fixed_string: bool,
        /// Include soft-deleted contacts
        #[arg(long)]
        include_inactive: bool,
    },
    /// Add a new employee contact
    Add {
        /// Employee name
        name: String,
        /// Phone number
        phone: String,
        /// Department
        department: String,
        /// Monthly salary
        salary: f64,
        /// Joining date (YYYY-MM-DD)
        join_date: String,
    },
    /// Soft-delete contacts matching a search term
    Rm {
        /// Search term to match contacts by name (regex by default)
        search_term: String,
        /// Treat the search term as a fixed string instead of a regex
        #[arg(short = 'F', long)]
        fixed_string: bool,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Restore a soft-deleted contact by id
    Restore {
        /// Contact id
        id: i32,
    },
}

fn print_contact(contact: &EmployeeContact) {
    println!(
        "ID: {}, Name: {}, Phone: {}, Department: {}, Salary: {:.2}, Joined: {}{}",
        contact.id,
        contact.name,
        contact.phone,
        contact.department,
        contact.salary,
        contact.join_date,
        if contact.is_active { "" } else { " (inactive)" }
    );
}

pub fn handle_contact_command_with_conn(
    conn: &mut SqliteConnection,
    action: ContactAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ContactAction::Ls { search_term, fixed_string, include_inactive } => {
            let mut contacts = collect_pages(|q| list_contacts(conn, include_inactive, q))?;

            if let Some(term) = &search_term {
                let matches = name_matcher(term, fixed_string)?;
                contacts.retain(|c| matches(&c.name));
            }

            if contacts.is_empty() {
                println!("No contacts found");
            } else {
                for contact in &contacts {
                    print_contact(contact);
                }
            }
            Ok(())
        }
        ContactAction::Add { name, phone, department, salary, join_date } => {
            let input = ContactInput {
                name,
                phone,
                department,
                salary,
                join_date: parse_date(&join_date)?,
            };
            let contact = insert_contact(conn, &input, &cli_actor())
                .map_err(|e| format!("Failed to create contact: {}", e))?;
            println!("Contact created successfully:");
            print_contact(&contact);
            Ok(())
        }
        ContactAction::Rm { search_term, fixed_string, yes } => {
            let matches = name_matcher(&search_term, fixed_string)?;
            let mut contacts = collect_pages(|q| list_contacts(conn, false, q))?;
            contacts.retain(|c| matches(&c.name));

            if contacts.is_empty() {
                println!("No active contacts found matching '{}'", search_term);
                return Ok(());
            }

            println!("The following contacts will be deactivated:");
            for contact in &contacts {
                print_contact(contact);
            }

            if !confirm(
                &format!("Deactivate {} contact(s)?", contacts.len()),
                yes,
            )? {
                println!("Aborted");
                return Ok(());
            }

            let actor = cli_actor();
            let mut errors = Vec::new();
            for contact in &contacts {
                match deactivate_contact(conn, contact.id, &actor) {
                    Ok(true) => println!("Deactivated contact '{}'", contact.name),
                    Ok(false) => {
                        errors.push(format!("Contact '{}' no longer exists", contact.name))
                    }
                    Err(e) => errors.push(format!(
                        "Failed to deactivate contact '{}': {}",
                        contact.name, e
                    )),
                }
            }

            if errors.is_empty() {
                Ok(())
            } else {
                Err(errors.join("; ").into())
            }
        }
        ContactAction::Restore { id } => {
            if restore_contact(conn, id, &cli_actor())? {
                println!("Contact {} restored", id);
                Ok(())
            } else {
                Err(format!("No contact with id {}", id).into())
            }
        }
    }
}
