use std::path::PathBuf;

use super::model::{PRIORITY, SupportedTerminal};
use super::workspace::Workspace;

pub fn application_location<W: Workspace>(
    workspace: &W,
    terminal: SupportedTerminal,
) -> Option<PathBuf> {
    workspace.application_location(terminal.bundle_id())
}

/// First installed terminal in priority order. Queried fresh on every call.
pub fn resolve_terminal<W: Workspace>(workspace: &W) -> Option<SupportedTerminal> {
    PRIORITY
        .into_iter()
        .find(|terminal| application_location(workspace, *terminal).is_some())
}

/// Every supported terminal with its install location, in priority order.
pub fn installed_terminals<W: Workspace>(
    workspace: &W,
) -> Vec<(SupportedTerminal, Option<PathBuf>)> {
    PRIORITY
        .into_iter()
        .map(|terminal| (terminal, application_location(workspace, terminal)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::fakes::FakeWorkspace;

    #[test]
    fn location_comes_from_bundle_id() {
        let ws = FakeWorkspace::with(&[SupportedTerminal::Terminal]);
        assert_eq!(
            application_location(&ws, SupportedTerminal::Terminal),
            Some(PathBuf::from("/Applications/FakeTerminal.app"))
        );
        assert_eq!(application_location(&ws, SupportedTerminal::ITerm2), None);
    }

    #[test]
    fn nothing_installed() {
        let ws = FakeWorkspace::default();
        assert_eq!(resolve_terminal(&ws), None);
    }

    #[test]
    fn falls_back_to_terminal_app() {
        let ws = FakeWorkspace::with(&[SupportedTerminal::Terminal]);
        assert_eq!(resolve_terminal(&ws), Some(SupportedTerminal::Terminal));
    }

    #[test]
    fn prefers_iterm2_when_both_installed() {
        let ws = FakeWorkspace::with(&[SupportedTerminal::Terminal, SupportedTerminal::ITerm2]);
        assert_eq!(resolve_terminal(&ws), Some(SupportedTerminal::ITerm2));

        let ws = FakeWorkspace::with(&[SupportedTerminal::ITerm2, SupportedTerminal::Terminal]);
        assert_eq!(resolve_terminal(&ws), Some(SupportedTerminal::ITerm2));
    }

    #[test]
    fn stops_at_first_match() {
        let ws = FakeWorkspace::with(&[SupportedTerminal::ITerm2, SupportedTerminal::Terminal]);
        resolve_terminal(&ws);
        assert_eq!(*ws.lookups.lock().unwrap(), vec!["com.googlecode.iterm2".to_string()]);
    }

    #[test]
    fn resolves_again_on_every_call() {
        let ws = FakeWorkspace::with(&[SupportedTerminal::Terminal]);
        resolve_terminal(&ws);
        resolve_terminal(&ws);
        assert_eq!(ws.lookups.lock().unwrap().len(), 4);
    }

    #[test]
    fn lists_all_terminals_in_priority_order() {
        let ws = FakeWorkspace::with(&[SupportedTerminal::Terminal]);
        let listed = installed_terminals(&ws);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], (SupportedTerminal::ITerm2, None));
        assert_eq!(listed[1].0, SupportedTerminal::Terminal);
        assert!(listed[1].1.is_some());
    }
}
