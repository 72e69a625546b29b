pub mod aggregate;
pub mod api;
pub mod config;
pub mod dates;
pub mod import;
pub mod model;
pub mod report;
pub mod resource;
pub mod session;
pub mod sheet;
pub mod validate;
