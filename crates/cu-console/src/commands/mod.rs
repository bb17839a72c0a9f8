pub mod navigate;
pub mod routes;
