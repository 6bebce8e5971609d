pub mod models;
pub mod queries;

#[cfg(test)]
pub(crate) mod fixtures;
