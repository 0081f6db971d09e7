use diesel::{prelude::*, sqlite::SqliteConnection};
use dotenvy::dotenv;

use stitchline_api::list_query::ListQuery;
use stitchline_api::orm::run_pending_migrations;

pub fn establish_connection() -> Result<SqliteConnection, Box<dyn std::error::Error>> {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let mut conn = SqliteConnection::establish(&database_url)?;
    run_pending_migrations(&mut conn);
    Ok(conn)
}

/// Actor recorded in the activity log for CLI mutations: the current system
/// username.
pub fn cli_actor() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "admin".to_string())
}

/// Drain a paged ORM listing into one vector.
pub fn collect_pages<T>(
    mut fetch: impl FnMut(&ListQuery) -> Result<(Vec<T>, i64), diesel::result::Error>,
) -> Result<Vec<T>, diesel::result::Error> {
    let mut all = Vec::new();
    let mut page = 1;
    loop {
        let query = ListQuery {
            page: Some(page),
            per_page: Some(stitchline_api::list_query::MAX_PER_PAGE),
            sort: None,
            dir: None,
        };
        let (rows, total) = fetch(&query)?;
        all.extend(rows);
        if all.len() as i64 >= total {
            return Ok(all);
        }
        page += 1;
    }
}

/// Compile the search term the way every `ls`/`rm` subcommand accepts it:
/// a regex by default, a substring match with `-F`.
pub fn name_matcher(
    search_term: &str,
    fixed_string: bool,
) -> Result<Box<dyn Fn(&str) -> bool>, Box<dyn std::error::Error>> {
    if fixed_string {
        let term = search_term.to_string();
        Ok(Box::new(move |name| name.contains(&term)))
    } else {
        let regex = regex::Regex::new(search_term)
            .map_err(|e| format!("Invalid regex pattern '{}': {}", search_term, e))?;
        Ok(Box::new(move |name| regex.is_match(name)))
    }
}

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_date(value: &str) -> Result<chrono::NaiveDate, Box<dyn std::error::Error>> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", value).into())
}

/// Ask for confirmation on stdin unless `-y` was passed.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool, Box<dyn std::error::Error>> {
    if yes {
        return Ok(true);
    }
    use std::io::{self, Write};

    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
