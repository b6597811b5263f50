#[macro_use]
extern crate rocket;

pub mod catchers;
pub mod clock;
pub mod configuration;
pub mod domain;
pub mod email;
pub mod generation;
pub mod guards;
pub mod models;
pub mod routes;
pub mod schema;
pub mod server_port;
pub mod startup;
pub mod telemetry;
