//! Command implementations.

use anyhow::Context;
use camino::Utf8Path;
use seo_lint_core::LinkGraph;

pub mod align;
pub mod analyze;
pub mod broken_links;
pub mod info;
pub mod keywords;
pub mod links;
pub mod lsi;
pub mod precision;
#[cfg(feature = "mcp")]
pub mod serve;

/// Read a file and validate its size against the configured limit.
///
/// Every command that takes an input file goes through here.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Read and validate a page link graph file.
pub fn read_link_graph(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<LinkGraph> {
    let json = read_input_file(path, max_bytes)?;
    LinkGraph::from_json(&json).with_context(|| format!("invalid link graph in {path}"))
}

/// Markdown files are stripped to prose before analysis.
pub fn is_markdown(path: &Utf8Path) -> bool {
    matches!(path.extension(), Some("md" | "markdown"))
}

/// Write `content` to `path`, or print it when no path is given.
pub fn write_output(path: Option<&Utf8Path>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => std::fs::write(path.as_std_path(), content)
            .with_context(|| format!("failed to write {path}")),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}
