pub mod principal;
pub mod settings;
