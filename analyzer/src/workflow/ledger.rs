use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Text file listing, one basename per line, the recordings flagged as
/// multipath scenarios.
#[derive(Clone, Debug)]
pub struct ScenarioLedger {
    path: PathBuf,
}

fn basename(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))
}

impl ScenarioLedger {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Listed basenames. A ledger that does not exist yet is empty.
    pub fn entries(&self) -> anyhow::Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("reading ledger {}", self.path.display()))?;
        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect())
    }

    pub fn contains(&self, recording: &Path) -> anyhow::Result<bool> {
        let name = basename(recording)?;
        Ok(self.entries()?.iter().any(|entry| *entry == name))
    }

    /// Appends the recording's basename unless it is already listed.
    /// Returns whether a line was written.
    pub fn record(&self, recording: &Path) -> anyhow::Result<bool> {
        let name = basename(recording)?;
        if self.contains(recording)? {
            log::info!("{} already listed in {}", name, self.path.display());
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening ledger {}", self.path.display()))?;
        writeln!(file, "{}", name)?;
        Ok(true)
    }
}

/// JSON recordings one directory level below `root`, sorted by path. When
/// `only` is given, keeps the files whose basename it lists.
pub fn find_recordings(root: &Path, only: Option<&[String]>) -> anyhow::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let session_dirs = fs::read_dir(root)
        .with_context(|| format!("listing recording root {}", root.display()))?;

    for entry in session_dirs {
        let dir = entry?.path();
        if !dir.is_dir() {
            continue;
        }
        for file in fs::read_dir(&dir)? {
            let path = file?.path();
            let is_json = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false);
            if !is_json {
                continue;
            }
            let name = path.file_name().and_then(|n| n.to_str());
            let listed = match only {
                Some(names) => names.iter().any(|entry| Some(entry.as_str()) == name),
                None => true,
            };
            if listed {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

/// Per-recording output directory `output_root/<file stem>`, created on demand.
pub fn output_directory(output_root: &Path, recording: &Path) -> anyhow::Result<PathBuf> {
    let stem = recording
        .file_stem()
        .with_context(|| format!("{} has no file stem", recording.display()))?;
    let dir = output_root.join(stem);
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    Ok(dir)
}
