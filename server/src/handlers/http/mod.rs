pub mod auth;
pub mod catalog;
pub mod pages;
pub mod profile;
pub mod routes;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
