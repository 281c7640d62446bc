pub mod catalog;
pub mod invocation;
pub mod record;
pub mod schema;
