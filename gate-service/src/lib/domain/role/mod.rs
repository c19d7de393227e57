pub mod errors;
pub mod models;
pub mod ports;
pub mod registry;
