pub mod format;
pub mod schema;
pub mod validate;
