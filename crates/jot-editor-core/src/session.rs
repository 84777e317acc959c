//! Editor session state.
//!
//! Holds what the note page tracks about the editor (status, whether it was
//! empty, whether the user has saved notes, lock state) as an explicit value
//! owned by the editor controller. Transitions return [`SessionEffect`]s for
//! the host page to apply; the session never touches the page itself.

use serde::Serialize;

/// Document content size at or below which the editor counts as empty
/// (a single empty paragraph).
pub const EMPTY_CONTENT_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum EditorStatus {
    #[default]
    Empty,
    Writing,
}

/// What the header's left side shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HeaderContext {
    Notes,
    Editor,
}

/// A UI change the host page should make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum SessionEffect {
    SetStatus(EditorStatus),
    /// Label and focus the editor element.
    PrepareEditor,
    /// Collapse the editor so the notes list has room.
    CollapseEditor,
    CloseMenu,
    /// Show (`true`) or hide the saved notes list.
    ToggleNotesList(bool),
    SetHeaderContext(HeaderContext),
    ResetTitle,
    RefreshNotesList,
    SetMenuActions(EditorStatus),
    ClearCurrentNote,
}

/// Editor state shared by the mount and update hooks.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    status: EditorStatus,
    was_empty: bool,
    has_notes: bool,
    locked: bool,
    updated: bool,
}

impl EditorSession {
    pub fn new(has_notes: bool) -> Self {
        Self {
            has_notes,
            ..Self::default()
        }
    }

    pub fn status(&self) -> EditorStatus {
        self.status
    }

    pub fn was_empty(&self) -> bool {
        self.was_empty
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether the document changed since the session started.
    pub fn is_updated(&self) -> bool {
        self.updated
    }

    pub fn set_has_notes(&mut self, has_notes: bool) {
        self.has_notes = has_notes;
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// The editor finished mounting.
    pub fn mounted(&mut self) -> Vec<SessionEffect> {
        self.status = EditorStatus::Empty;
        self.was_empty = true;

        let mut effects = vec![
            SessionEffect::SetStatus(EditorStatus::Empty),
            SessionEffect::PrepareEditor,
        ];
        if self.has_notes {
            effects.push(SessionEffect::CollapseEditor);
        }
        effects
    }

    /// The document changed; `content_size` is its new content size.
    pub fn updated(&mut self, content_size: usize) -> Vec<SessionEffect> {
        self.updated = true;
        let mut effects = vec![SessionEffect::CloseMenu];

        if content_size <= EMPTY_CONTENT_SIZE {
            tracing::debug!("editor turned empty");
            self.status = EditorStatus::Empty;
            effects.push(SessionEffect::SetStatus(EditorStatus::Empty));
            if self.has_notes {
                effects.push(SessionEffect::ToggleNotesList(true));
            }
            effects.extend([
                SessionEffect::SetHeaderContext(HeaderContext::Notes),
                SessionEffect::ResetTitle,
                SessionEffect::RefreshNotesList,
                SessionEffect::SetMenuActions(EditorStatus::Empty),
                SessionEffect::ClearCurrentNote,
            ]);
            self.was_empty = true;
        } else if self.was_empty {
            // Only on the empty -> filled edge, not on every keystroke.
            tracing::debug!("editor turned filled");
            if self.has_notes {
                effects.push(SessionEffect::ToggleNotesList(false));
            }
            effects.push(SessionEffect::SetHeaderContext(HeaderContext::Editor));
            self.was_empty = false;
            if !self.locked {
                self.status = EditorStatus::Writing;
                effects.push(SessionEffect::SetStatus(EditorStatus::Writing));
            }
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount() {
        let mut session = EditorSession::new(true);
        assert_eq!(
            session.mounted(),
            vec![
                SessionEffect::SetStatus(EditorStatus::Empty),
                SessionEffect::PrepareEditor,
                SessionEffect::CollapseEditor,
            ]
        );
        assert!(session.was_empty());
        assert!(!session.is_updated());
    }

    #[test]
    fn test_fill_then_type_then_clear() {
        let mut session = EditorSession::new(true);
        session.mounted();

        let effects = session.updated(5);
        assert_eq!(
            effects,
            vec![
                SessionEffect::CloseMenu,
                SessionEffect::ToggleNotesList(false),
                SessionEffect::SetHeaderContext(HeaderContext::Editor),
                SessionEffect::SetStatus(EditorStatus::Writing),
            ]
        );
        assert_eq!(session.status(), EditorStatus::Writing);

        // Regular typing only closes the menu.
        assert_eq!(session.updated(6), vec![SessionEffect::CloseMenu]);

        let effects = session.updated(2);
        assert_eq!(
            effects,
            vec![
                SessionEffect::CloseMenu,
                SessionEffect::SetStatus(EditorStatus::Empty),
                SessionEffect::ToggleNotesList(true),
                SessionEffect::SetHeaderContext(HeaderContext::Notes),
                SessionEffect::ResetTitle,
                SessionEffect::RefreshNotesList,
                SessionEffect::SetMenuActions(EditorStatus::Empty),
                SessionEffect::ClearCurrentNote,
            ]
        );
        assert!(session.was_empty());
    }

    #[test]
    fn test_locked_session_keeps_status() {
        let mut session = EditorSession::new(false);
        session.mounted();
        session.set_locked(true);
        let effects = session.updated(10);
        assert!(!effects.contains(&SessionEffect::SetStatus(EditorStatus::Writing)));
        assert!(!effects.iter().any(|e| matches!(e, SessionEffect::ToggleNotesList(_))));
        assert_eq!(session.status(), EditorStatus::Empty);
        assert!(!session.was_empty());
    }

    #[test]
    fn test_effect_serialization() {
        let json = serde_json::to_string(&SessionEffect::ToggleNotesList(true)).unwrap();
        assert_eq!(json, r#"{"kind":"toggleNotesList","value":true}"#);
        let json = serde_json::to_string(&SessionEffect::ResetTitle).unwrap();
        assert_eq!(json, r#"{"kind":"resetTitle"}"#);
    }
}
