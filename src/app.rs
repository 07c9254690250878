use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use zip::ZipArchive;

use crate::api::{ApiClient, FetchError};
use crate::models::TemplateCatalog;
use crate::ui::{Palette, PromptKind, Prompter};

const FOLDER_QUESTION: &str = "Setup the project in (specify folder)...?";
const SCAFFOLD_QUESTION: &str = "What scaffold do you want to start with?";
const ERROR_PAUSE: Duration = Duration::from_secs(2);

/// One scaffolding session: asks where and what, then downloads and unpacks.
pub struct Scaffolder<R, W> {
    prompt: Prompter<R, W>,
    api: ApiClient,
    catalog: TemplateCatalog,
    /// Absolute destination, set once the folder question is answered.
    destination: PathBuf,
    /// How long failure messages stay on screen before moving on.
    error_pause: Duration,
}

impl<R: BufRead, W: Write> Scaffolder<R, W> {
    pub fn new(prompt: Prompter<R, W>, api: ApiClient) -> Self {
        Self {
            prompt,
            api,
            catalog: TemplateCatalog::default(),
            destination: PathBuf::new(),
            error_pause: ERROR_PAUSE,
        }
    }

    /// Full interactive flow. Only a closed stdin makes this return an error.
    pub async fn run(&mut self) -> Result<()> {
        let non_empty = |value: &str| !value.is_empty();
        let folder = self
            .prompt
            .ask(PromptKind::Input, FOLDER_QUESTION, Some(&non_empty), true)
            .context("Failed to read the destination folder")?;
        self.destination = resolve_path(&folder);
        tracing::info!(destination = %self.destination.display(), "destination resolved");

        let requested = self
            .prompt
            .ask(PromptKind::Input, SCAFFOLD_QUESTION, None, true)
            .context("Failed to read the scaffold name")?;
        if !self.catalog.contains(&requested) {
            tracing::debug!(requested = %requested, "unknown scaffold, using the default");
        }
        let template = self.catalog.resolve(&requested);

        self.fetch_and_unpack(template).await?;
        self.prompt.line("Successfully set up project :D")?;
        Ok(())
    }

    /// Downloads `template` and unpacks it into the destination.
    ///
    /// Failures are shown to the user, followed by a short pause, and reported
    /// as `Ok(false)`. Only terminal write errors come back as `Err`.
    pub async fn fetch_and_unpack(&mut self, template: &str) -> io::Result<bool> {
        let Palette { cyan, white, .. } = *self.prompt.palette();
        self.prompt
            .line(&format!("{cyan}∂ Downloading template {template}...{white}"))?;

        let archive = match self.api.fetch_archive(template).await {
            Ok(archive) => archive,
            Err(err) => return self.report_failure(template, err).await,
        };

        self.prompt.line("Extracting...")?;
        match extract(&archive, &self.destination) {
            Ok(written) => {
                tracing::info!(template, files = written, "scaffold extracted");
                self.prompt.line("Download and extraction complete!")?;
                Ok(true)
            }
            Err(err) => self.report_failure(template, err).await,
        }
    }

    async fn report_failure(&mut self, template: &str, err: FetchError) -> io::Result<bool> {
        tracing::warn!(template, error = %err, "scaffold was not installed");

        let message = match &err {
            FetchError::Status(status) => format!("Failed to download: {}", status.as_u16()),
            other => format!("Error occurred: {other}"),
        };
        let Palette { red, white, .. } = *self.prompt.palette();
        self.prompt.line(&format!("{red}{message}{white}"))?;

        tokio::time::sleep(self.error_pause).await;
        Ok(false)
    }
}

/// Turns the user's folder answer into an absolute path, creating it if needed.
///
/// Never fails: problems are logged and the best available path is returned.
pub fn resolve_path(input: &str) -> PathBuf {
    if input == "." {
        return std::env::current_dir().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "could not read the working directory");
            PathBuf::from(".")
        });
    }

    let path = Path::new(input);
    if !path.exists() {
        match fs::create_dir_all(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "created destination"),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "could not create destination")
            }
        }
    }

    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "could not make path absolute");
            path.to_path_buf()
        })
}

/// Writes every entry of a zip archive under `destination`.
///
/// Stops at the first I/O error; whatever was written before stays on disk.
/// Returns the number of files written.
pub fn extract(archive: &[u8], destination: &Path) -> Result<usize, FetchError> {
    let mut zip = ZipArchive::new(Cursor::new(archive))?;
    let mut written = 0;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(entry = entry.name(), "skipping entry outside the destination");
            continue;
        };
        let target = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|err| FetchError::io(&target, err))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|err| FetchError::io(parent, err))?;
        }
        let mut file =
            create_entry_file(&target, entry.unix_mode()).map_err(|err| FetchError::io(&target, err))?;
        io::copy(&mut entry, &mut file).map_err(|err| FetchError::io(&target, err))?;
        written += 1;
    }

    tracing::debug!(entries = zip.len(), files = written, "archive unpacked");
    Ok(written)
}

fn create_entry_file(path: &Path, mode: Option<u32>) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode.map_or(0o644, |bits| bits & 0o7777));
    }
    #[cfg(not(unix))]
    let _ = mode;

    options.open(path)
}
