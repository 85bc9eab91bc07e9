pub mod application;
pub mod category;
