//! Subcommand handlers. Each returns the text to print on stdout.

use anyhow::Context;

use archive_query::ArchiveClient;

use crate::output::{self, Format};
use crate::Commands;

pub async fn run(client: &ArchiveClient, command: Commands, format: Format) -> anyhow::Result<String> {
    match command {
        Commands::Count => {
            let count = client.count().await?;
            output::count(format, count)
        }
        Commands::Recent { count } => {
            let records = client.recent(count).await?;
            output::records(format, &records)
        }
        Commands::Show { id } => match client.record(&id).await? {
            Some(record) => output::record(format, &record),
            None => anyhow::bail!("no image with id {}", id),
        },
        Commands::Search { filters } => {
            let filters = filters.to_filters()?;
            let records = client.search(&filters).await?;
            output::records(format, &records)
        }
        Commands::Stats { filters } => {
            let filters = filters.to_filters()?;
            let stats = client.stats(&filters).await?;
            output::stats(format, &stats)
        }
        Commands::Upload {
            file,
            title,
            uploader,
            mime,
        } => {
            let data = std::fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let filename = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();

            let uploads = client.uploads();
            uploads.select_image(filename, data, mime.as_deref()).await?;
            uploads.set_title(title).await;
            if let Some(uploader) = uploader {
                uploads.set_uploader(uploader).await;
            }
            let receipt = uploads.submit().await?;
            output::receipt(format, &receipt)
        }
        Commands::Compare { first, second } => {
            let compare = client.comparisons();
            compare.select_first(&first).await;
            compare.select_second(&second).await;
            let result = compare.compare().await?;
            output::comparison(format, &result)
        }
        Commands::Health => anyhow::bail!("health is handled before the client starts"),
    }
}
