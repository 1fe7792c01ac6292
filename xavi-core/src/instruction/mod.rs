pub mod information;
pub mod instruction_set;
pub mod validate;
