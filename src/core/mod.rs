// Domain core: models, errors and the operations built on them

pub mod accounts;
pub mod errors;
pub mod models;
pub mod repository;
