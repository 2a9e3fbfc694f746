//! HTTP request handlers

pub mod api;
pub mod dashboard;
pub mod intake;
pub mod setup;
pub mod static_files;
