mod client;
mod models;

pub use client::JolpicaClient;
pub use models::*;
