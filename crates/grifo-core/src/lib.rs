pub mod agenda;
pub mod checklist;
pub mod config;
pub mod error;
pub mod gamification;
pub mod io;
pub mod marketplace;
pub mod obra;
pub mod paths;
pub mod pcp;
pub mod playbook;
pub mod report;
pub mod state;
pub mod task;
pub mod types;
pub mod week;

pub use error::{GrifoError, Result};
