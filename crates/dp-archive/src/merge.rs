//! Splice a generated cover in front of a thesis PDF via `pdftk`.

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::{ArchiveError, ArchiveResult};

/// Concatenate `cover` and `thesis` into `output`, cover first. Requires the
/// `pdftk` command line tool on the PATH.
pub fn merge_cover(cover: &Path, thesis: &Path, output: &Path) -> ArchiveResult<()> {
    let result = Command::new("pdftk")
        .arg(format!("A={}", cover.display()))
        .arg(format!("B={}", thesis.display()))
        .args(["cat", "A", "B", "output"])
        .arg(output)
        .output()?;

    if !result.status.success() {
        return Err(ArchiveError::Merge {
            status: result.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
        });
    }

    info!(output = %output.display(), "cover spliced onto thesis");
    Ok(())
}
