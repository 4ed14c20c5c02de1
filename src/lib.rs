pub mod application;
pub mod backend;
pub mod cli;
pub mod config;
pub mod domain;
pub mod io;

pub use domain::*;
