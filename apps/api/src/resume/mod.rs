// Resume Store: the single in-memory resume aggregate, its persistence, and
// the JSON handlers that mutate it.

pub mod handlers;
pub mod models;
pub mod persistence;
pub mod store;
