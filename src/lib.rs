pub mod app;
pub mod config;
pub mod debug;
pub mod pet;
pub mod save;
pub mod sim;
