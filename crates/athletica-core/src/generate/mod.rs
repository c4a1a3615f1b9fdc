pub mod engine;
pub mod locale;
pub mod providers;
pub mod value;
