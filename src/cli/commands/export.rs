//! Export a zone class to stdout.

use std::io::Write;

use crate::config::Settings;
use crate::models::ZoneClass;
use crate::repository::{DieselZoneRepository, PgPool, ZoneStore};

/// Run one zone query and print the FeatureCollection.
pub async fn cmd_export(settings: &Settings, class: ZoneClass, pretty: bool) -> anyhow::Result<()> {
    let pool = PgPool::new(&settings.database_url, 1, settings.no_tls)?;
    let repo = DieselZoneRepository::new(pool);

    let collection = repo.collection(class).await?;
    tracing::info!("Exporting {} {} zones", collection.len(), class);

    let json = if pretty {
        serde_json::to_string_pretty(&collection)?
    } else {
        serde_json::to_string(&collection)?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    Ok(())
}
