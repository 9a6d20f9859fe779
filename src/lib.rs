pub mod config;
pub mod error;
pub mod fetch;
pub mod flow;
pub mod lookup;
pub mod record;
pub mod table;
pub mod weeks;

#[cfg(test)]
mod testutil;
