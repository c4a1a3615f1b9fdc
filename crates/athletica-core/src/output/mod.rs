pub mod fk;
pub mod sql;
