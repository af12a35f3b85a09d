// Infrastructure backends

pub mod pg_store;
