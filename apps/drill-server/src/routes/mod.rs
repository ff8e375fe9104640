pub mod sessions;
pub mod validate;
