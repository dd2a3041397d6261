pub mod agenda;
pub mod events;
pub mod init;
pub mod obras;
pub mod partners;
pub mod playbook;
pub mod ranking;
pub mod state;
pub mod weeks;
