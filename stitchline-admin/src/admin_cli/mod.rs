pub mod batch_commands;
pub mod branch_commands;
pub mod contact_commands;
pub mod job_order_commands;
pub mod run_commands;
pub mod utils;
