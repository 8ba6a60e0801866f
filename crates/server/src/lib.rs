pub mod cli;

pub mod db;

mod extract;

mod state;
pub use state::*;

mod trainee;
pub use trainee::*;

pub mod routes;
