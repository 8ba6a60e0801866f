pub mod api;
pub mod journal;
pub mod model;
pub mod types;
pub mod utils;
