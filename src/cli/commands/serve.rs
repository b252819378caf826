//! Web server command.

use console::style;

use crate::config::{parse_bind_address, Settings};

/// Start the web server.
pub async fn cmd_serve(settings: &Settings) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(&settings.bind);

    println!(
        "{} Connecting to {}",
        style("→").cyan(),
        settings.redacted_database_url()
    );
    println!(
        "{} Starting zonequery server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, &host, port).await
}
