//! Core domain types for task file / GitHub synchronization.

pub mod analyze;
pub mod commit;
pub mod config;
pub mod github;
pub mod issue_sync;
pub mod iteration;
pub mod labels;
pub mod mover;
pub mod project_sync;
pub mod task;

#[cfg(test)]
pub(crate) mod test_support;


pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
