mod cli;
mod tui;

pub(crate) use cli::{as_cli, shellexpand};
pub(crate) use tui::as_tui;

/// Single-threaded runtime shared by both front ends. Requests that must
/// overlap run on a `LocalSet` instead of extra threads.
fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    use anyhow::Context;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}
