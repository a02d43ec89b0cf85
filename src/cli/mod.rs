mod browse;
mod filters;
mod list;
mod root;

pub use root::Cli;
