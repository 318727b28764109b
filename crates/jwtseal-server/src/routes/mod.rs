pub mod meta;
pub mod tokens;
