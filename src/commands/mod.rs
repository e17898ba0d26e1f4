pub mod export;
pub mod import;
pub mod list;
pub mod setup;
pub mod show;
pub mod status;
pub mod tdp;
