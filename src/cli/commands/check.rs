//! Database readiness check.

use console::style;

use crate::config::Settings;
use crate::repository::{DieselZoneRepository, PgPool, BLUE_TABLE, RED_TABLE};

/// Verify connectivity, PostGIS availability and both zone tables.
pub async fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    println!("{} Database check", style("→").cyan());
    println!("  Database: {}", settings.redacted_database_url());
    println!("  TLS: {}", if settings.no_tls { "off" } else { "on" });

    let pool = PgPool::new(&settings.database_url, 1, settings.no_tls)?;
    let repo = DieselZoneRepository::new(pool);

    if let Err(e) = repo.check_connection().await {
        eprintln!("  {} Connection failed: {}", style("✗").red(), e);
        return Err(e.into());
    }
    println!("  {} Connected", style("✓").green());

    let report = match repo.check_schema().await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("  {} PostGIS not available: {}", style("✗").red(), e);
            return Err(e.into());
        }
    };
    println!(
        "  {} PostGIS {}",
        style("✓").green(),
        report.postgis_version
    );

    for (table, present) in [(RED_TABLE, report.red_table), (BLUE_TABLE, report.blue_table)] {
        if present {
            println!("  {} Table {}", style("✓").green(), table);
        } else {
            println!("  {} Table {} missing", style("✗").red(), table);
        }
    }

    if !report.is_ready() {
        anyhow::bail!("zone tables are missing");
    }

    println!("\n{} Ready to serve zones", style("✓").green());
    Ok(())
}
