pub mod config;
pub mod list;

pub use list::GoListSource;
