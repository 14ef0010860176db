//! In-memory capabilities for tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::automation::{ErrorRecord, ScriptEngine};
use super::model::SupportedTerminal;
use super::workspace::{OpenConfiguration, Workspace};
use crate::error::OpentermError;

#[derive(Default)]
pub(crate) struct FakeWorkspace {
    pub apps: HashMap<String, PathBuf>,
    pub opened: Mutex<Vec<(PathBuf, PathBuf)>>,
    pub lookups: Mutex<Vec<String>>,
    pub fail_open: bool,
}

impl FakeWorkspace {
    pub fn with(terminals: &[SupportedTerminal]) -> Self {
        let apps = terminals
            .iter()
            .map(|t| {
                (
                    t.bundle_id().to_string(),
                    PathBuf::from(format!("/Applications/Fake{}.app", t.display_name())),
                )
            })
            .collect();
        Self {
            apps,
            ..Default::default()
        }
    }

    pub fn opened_locations(&self) -> Vec<PathBuf> {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .map(|(location, _)| location.clone())
            .collect()
    }
}

impl Workspace for FakeWorkspace {
    fn application_location(&self, bundle_id: &str) -> Option<PathBuf> {
        self.lookups.lock().unwrap().push(bundle_id.to_string());
        self.apps.get(bundle_id).cloned()
    }

    fn open(
        &self,
        location: &Path,
        application: &Path,
        _config: &OpenConfiguration,
    ) -> Result<(), OpentermError> {
        if self.fail_open {
            return Err(OpentermError::Open("LSOpenURLsWithRole() failed".into()));
        }
        self.opened
            .lock()
            .unwrap()
            .push((location.to_path_buf(), application.to_path_buf()));
        Ok(())
    }
}

/// Records every source it is asked to run.
#[derive(Default)]
pub(crate) struct FakeEngine {
    pub executed: Mutex<Vec<String>>,
    pub error: Option<ErrorRecord>,
    pub reject_compile: bool,
}

impl ScriptEngine for FakeEngine {
    type Script = String;

    fn compile(&self, source: &str) -> Option<String> {
        (!self.reject_compile).then(|| source.to_string())
    }

    fn run(&self, script: &String) -> Option<ErrorRecord> {
        self.executed.lock().unwrap().push(script.clone());
        self.error.clone()
    }
}
