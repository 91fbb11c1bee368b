use anyhow::{Context, Result};
use optline_core::OptionSpec;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Load an option table from a JSON file, or from stdin when `path` is `-`.
pub fn load_table(path: &Path) -> Result<Vec<OptionSpec>> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read option table from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read option table: {}", path.display()))?
    };

    let specs = optline_metadata::specs_from_json_str(&contents)
        .with_context(|| format!("failed to parse option table: {}", path.display()))?;
    tracing::debug!(path = %path.display(), count = specs.len(), "loaded option table");
    Ok(specs)
}
