use std::io;

use anyhow::Result;
use tiny_bank::{bin_utils::Service, registry::in_memory_registry::InMemoryRegistry};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // stdout belongs to the menus, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut registry = InMemoryRegistry::default();
    let mut stdout = io::stdout();
    let service = Service {
        registry: &mut registry,
        input: io::stdin().lock(),
        output: &mut stdout,
    };
    service.run()
}
