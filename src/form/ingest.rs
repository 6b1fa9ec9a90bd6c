use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::types::IngestOutcome;

/// How long a read may stay silent before the fallback resolves it. The
/// fallback reports a soft-success: the file handle is still valid for
/// submission even if the read itself hung.
pub const READ_FALLBACK: Duration = Duration::from_secs(20);

/// A resolved read, tagged with the generation that started it so the
/// controller can drop resolutions from superseded reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestResolution {
    pub generation: u64,
    pub outcome: IngestOutcome,
}

/// Starts reading `path` in the background. Fails synchronously when the
/// path cannot even be opened as a regular file; otherwise exactly one
/// [`IngestResolution`] for `generation` arrives on `tx`.
pub fn begin(
    path: PathBuf,
    generation: u64,
    tx: mpsc::UnboundedSender<IngestResolution>,
) -> Result<JoinHandle<()>> {
    let meta = std::fs::metadata(&path)
        .with_context(|| format!("could not open {}", path.display()))?;
    if meta.is_dir() {
        bail!("{} is a directory", path.display());
    }
    Ok(spawn_read(path, generation, tx, READ_FALLBACK))
}

/// The async half of ingestion: races the read against the fallback timer.
/// `fallback` is a parameter so tests do not have to wait 20 seconds.
pub fn spawn_read(
    path: PathBuf,
    generation: u64,
    tx: mpsc::UnboundedSender<IngestResolution>,
    fallback: Duration,
) -> JoinHandle<()> {
    tokio::task::spawn(async move {
        let outcome = tokio::select! {
            read = read_for_submission(&path) => match read {
                Ok(len) => {
                    tracing::debug!(path = %path.display(), bytes = len, "file read complete");
                    IngestOutcome::Loaded
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "file read failed");
                    IngestOutcome::Failed(e.to_string())
                }
            },
            _ = tokio::time::sleep(fallback) => {
                tracing::warn!(
                    path = %path.display(),
                    "read gave no signal within the fallback window, proceeding with the selection"
                );
                IngestOutcome::FallbackExpired
            }
        };
        let _ = tx.send(IngestResolution { generation, outcome });
    })
}

/// Pre-submission read. A `.txt` file gets a UTF-8 decode pass so broken
/// text fails here instead of at the server; anything else is opaque
/// bytes. The payload is not kept -- submission streams the file again.
async fn read_for_submission(path: &Path) -> Result<usize> {
    if has_txt_suffix(path) {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?;
        Ok(text.len())
    } else {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?;
        Ok(bytes.len())
    }
}

pub fn has_txt_suffix(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("txt"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn txt_suffix_detection() {
        assert!(has_txt_suffix(Path::new("notes.txt")));
        assert!(has_txt_suffix(Path::new("NOTES.TXT")));
        assert!(!has_txt_suffix(Path::new("report.pdf")));
        assert!(!has_txt_suffix(Path::new("no_extension")));
        assert!(!has_txt_suffix(Path::new("archive.txt.gz")));
    }

    #[tokio::test]
    async fn read_that_completes_resolves_once_without_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hello").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_read(file.path().to_path_buf(), 7, tx, READ_FALLBACK);
        handle.await.unwrap();

        let res = rx.try_recv().unwrap();
        assert_eq!(res.generation, 7);
        assert_eq!(res.outcome, IngestOutcome::Loaded);
        // Exactly one resolution per read.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn missing_file_resolves_as_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_read(
            PathBuf::from("/nonexistent/mail.txt"),
            1,
            tx,
            READ_FALLBACK,
        );
        handle.await.unwrap();

        let res = rx.try_recv().unwrap();
        assert!(matches!(res.outcome, IngestOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn silent_read_resolves_exactly_one_fallback() {
        // A zero-length fallback always wins the race against the blocking
        // file read, which stands in for a read that never signals.
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "slow").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_read(file.path().to_path_buf(), 3, tx, Duration::ZERO);
        handle.await.unwrap();

        let res = rx.try_recv().unwrap();
        assert_eq!(res.generation, 3);
        assert_eq!(res.outcome, IngestOutcome::FallbackExpired);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn begin_rejects_directories_synchronously() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        assert!(begin(dir.path().to_path_buf(), 1, tx).is_err());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn begin_rejects_missing_paths_synchronously() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let err = begin(PathBuf::from("/nonexistent/mail.txt"), 1, tx).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/mail.txt"));
    }
}
