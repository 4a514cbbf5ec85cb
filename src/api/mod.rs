pub mod admin;
pub mod generate;
