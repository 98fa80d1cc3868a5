pub mod assignment;
pub mod catalog;
