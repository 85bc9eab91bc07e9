pub mod dashboard;
pub mod handlers;
pub mod requests;
pub mod service;
pub mod upload;
