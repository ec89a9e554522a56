pub mod exec;
pub mod schema;
