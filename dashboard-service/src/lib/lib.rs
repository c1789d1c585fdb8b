pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::principal;
pub use domain::settings;
pub use outbound::repositories;
