pub mod agenda;
pub mod checklist;
pub mod config;
pub mod init;
pub mod obra;
pub mod partner;
pub mod pcp;
pub mod playbook;
pub mod rank;
pub mod report;
pub mod state;
pub mod task;
pub mod ui;
pub mod week;
