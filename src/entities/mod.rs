pub mod prelude;

pub mod models;
