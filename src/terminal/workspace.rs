//! Installed-application lookup and "open with application".

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::OpentermError;

/// Options forwarded to the platform open call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenConfiguration {
    /// Bring the application to the foreground.
    pub activates: bool,
    /// Launch a new instance even if one is running.
    pub new_instance: bool,
}

impl Default for OpenConfiguration {
    fn default() -> Self {
        Self {
            activates: true,
            new_instance: false,
        }
    }
}

pub trait Workspace {
    /// Location of the application with `bundle_id`, if installed.
    fn application_location(&self, bundle_id: &str) -> Option<PathBuf>;

    fn open(
        &self,
        location: &Path,
        application: &Path,
        config: &OpenConfiguration,
    ) -> Result<(), OpentermError>;
}

/// Folders scanned when Spotlight has no answer.
const APPLICATION_DIRS: &[&str] = &[
    "/Applications",
    "/Applications/Utilities",
    "/System/Applications",
    "/System/Applications/Utilities",
];

/// macOS workspace backed by `mdfind` and `open`.
#[derive(Debug, Clone, Default)]
pub struct SystemWorkspace {
    extra_dirs: Vec<PathBuf>,
}

impl SystemWorkspace {
    pub fn new(extra_dirs: Vec<PathBuf>) -> Self {
        Self { extra_dirs }
    }

    fn spotlight_lookup(bundle_id: &str) -> Option<PathBuf> {
        let query = format!("kMDItemCFBundleIdentifier == '{bundle_id}'");
        let output = Command::new("mdfind").arg(&query).output().ok()?;
        if !output.status.success() {
            return None;
        }
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    fn search_dirs(&self) -> Vec<PathBuf> {
        let mut search: Vec<PathBuf> = APPLICATION_DIRS.iter().map(PathBuf::from).collect();
        if let Some(home) = dirs::home_dir() {
            search.push(home.join("Applications"));
        }
        search.extend(self.extra_dirs.iter().cloned());
        search
    }

    fn scan_lookup(&self, bundle_id: &str) -> Option<PathBuf> {
        self.search_dirs()
            .into_iter()
            .find_map(|dir| find_bundle_in(&dir, bundle_id))
    }
}

/// `CFBundleIdentifier` of the bundle at `app`, read from XML or binary Info.plist.
fn bundle_identifier(app: &Path) -> Option<String> {
    let info = app.join("Contents").join("Info.plist");
    let value = match plist::Value::from_file(&info) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Skipping {}: {e}", info.display());
            return None;
        }
    };
    value
        .as_dictionary()?
        .get("CFBundleIdentifier")?
        .as_string()
        .map(str::to_owned)
}

/// Find an `.app` directly under `dir` whose Info.plist declares `bundle_id`.
pub fn find_bundle_in(dir: &Path, bundle_id: &str) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "app"))
        .find(|app| bundle_identifier(app).as_deref() == Some(bundle_id))
}

impl Workspace for SystemWorkspace {
    fn application_location(&self, bundle_id: &str) -> Option<PathBuf> {
        let found = Self::spotlight_lookup(bundle_id).or_else(|| self.scan_lookup(bundle_id));
        match &found {
            Some(path) => tracing::debug!("Located {bundle_id} at {}", path.display()),
            None => tracing::debug!("{bundle_id} is not installed"),
        }
        found
    }

    fn open(
        &self,
        location: &Path,
        application: &Path,
        config: &OpenConfiguration,
    ) -> Result<(), OpentermError> {
        let mut cmd = Command::new("open");
        if !config.activates {
            cmd.arg("-g");
        }
        if config.new_instance {
            cmd.arg("-n");
        }
        cmd.arg("-a").arg(application).arg(location);

        tracing::debug!("Running {cmd:?}");
        let output = cmd.output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OpentermError::Open(format!(
                "open exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
