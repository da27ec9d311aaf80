use anyhow::{Result, anyhow};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use crate::layers::NormalizedMetadata;

pub const MISSING_FIELD: &str = "Unknown";
pub const EXTENSION: &str = "pdf";

/// `YEAR_JOURNAL_AUTHOR_TITLE.pdf`, with `Unknown` standing in for missing fields.
pub fn build_filename(metadata: &NormalizedMetadata) -> String {
    let fields = [&metadata.year, &metadata.journal, &metadata.author, &metadata.title]
        .map(|field| field.as_deref().unwrap_or(MISSING_FIELD));

    format!("{}.{}", fields.join("_"), EXTENSION)
}

/// Renames `source` to `filename` inside the same directory.
///
/// Never overwrites an existing file, and never moves it out of its directory.
pub async fn rename_file(source: &Path, filename: &str) -> Result<PathBuf> {
    let mut components = Path::new(filename).components();
    if !matches!((components.next(), components.next()), (Some(Component::Normal(_)), None)) {
        return Err(anyhow!("Derived filename is not a plain file name: {:?}", filename));
    }

    if !fs::try_exists(source).await? {
        return Err(anyhow!("No such file: {}", source.display()));
    }

    let target = match source.parent() {
        Some(dir) => dir.join(filename),
        None => PathBuf::from(filename),
    };

    if target == source {
        tracing::info!("{} already has the derived name", source.display());
        return Ok(target);
    }

    if fs::try_exists(&target).await? {
        return Err(anyhow!("Refusing to overwrite existing file: {}", target.display()));
    }

    tracing::info!("Renaming {} -> {}", source.display(), target.display());
    fs::rename(source, &target).await?;

    Ok(target)
}
