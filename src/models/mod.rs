pub mod figures;
pub mod types;
