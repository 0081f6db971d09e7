pub mod activity_log;
pub mod branch;
pub mod contact;
pub mod job_order;
pub mod production;
pub mod purchase;
pub mod settlement;
pub mod staff;

// Re-export models for easier access
pub use activity_log::*;
pub use branch::*;
pub use contact::*;
pub use job_order::*;
pub use production::*;
pub use purchase::*;
pub use settlement::*;
pub use staff::*;
