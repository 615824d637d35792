//! Mention autocomplete state machine.
//!
//! While the text right before the cursor is a trigger character followed by
//! word characters (`@fir`), the machine is `Composing` with that query. The
//! host renders the filtered candidates and routes navigation keys here; a
//! commit hands back the variable name and the span to replace.

use std::sync::Arc;

use crate::catalog::{VariableCatalog, VariableDef};
use crate::editable::Key;
use crate::util::{char_len, is_word_char};

/// State of an in-progress mention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionState {
    /// Word characters typed after the trigger
    pub query: String,
    /// Serialized offset of the trigger character
    pub anchor_offset: usize,
    /// Index into the filtered candidate list
    pub selected_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MentionPhase {
    #[default]
    Idle,
    Composing(MentionState),
}

/// What the editor should do after a key was offered to the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentionAction {
    /// Key not consumed, apply default editing
    Ignored,
    /// Key consumed, only the suggestion list changed
    Handled,
    /// Replace `[anchor_offset, cursor)` with variable `name`
    Commit { name: String, anchor_offset: usize },
}

/// Snapshot of the suggestion list for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionView<'a> {
    pub query: &'a str,
    pub candidates: Vec<&'a VariableDef>,
    pub selected_index: usize,
}

impl MentionView<'_> {
    /// True when the list should show a "no matches" hint
    pub fn no_matches(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Find a trigger + word-character query ending at the end of `text`.
/// Returns the query and the character offset of the trigger.
pub fn match_trigger(text: &str, trigger: char) -> Option<(&str, usize)> {
    let head = text.trim_end_matches(is_word_char);
    let before_trigger = head.strip_suffix(trigger)?;
    Some((&text[head.len()..], char_len(before_trigger)))
}

/// Mention autocomplete state machine for one editor instance.
#[derive(Debug, Clone)]
pub struct MentionMachine {
    phase: MentionPhase,
    trigger: char,
    catalog: Arc<VariableCatalog>,
}

impl MentionMachine {
    pub fn new(trigger: char, catalog: Arc<VariableCatalog>) -> Self {
        Self {
            phase: MentionPhase::Idle,
            trigger,
            catalog,
        }
    }

    pub fn phase(&self) -> &MentionPhase {
        &self.phase
    }

    pub fn state(&self) -> Option<&MentionState> {
        match &self.phase {
            MentionPhase::Composing(state) => Some(state),
            MentionPhase::Idle => None,
        }
    }

    pub fn is_composing(&self) -> bool {
        matches!(self.phase, MentionPhase::Composing(_))
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    pub fn trigger(&self) -> char {
        self.trigger
    }

    /// Filtered candidates for the current query (empty when idle)
    pub fn candidates(&self) -> Vec<&VariableDef> {
        match &self.phase {
            MentionPhase::Composing(state) => self.catalog.filter(&state.query),
            MentionPhase::Idle => Vec::new(),
        }
    }

    /// Currently selected candidate
    pub fn selected(&self) -> Option<&VariableDef> {
        let state = self.state()?;
        self.candidates().get(state.selected_index).copied()
    }

    pub fn view(&self) -> Option<MentionView<'_>> {
        let state = self.state()?;
        Some(MentionView {
            query: &state.query,
            candidates: self.catalog.filter(&state.query),
            selected_index: state.selected_index,
        })
    }

    /// Re-derive the phase from the text before the cursor.
    ///
    /// `cursor_offset` is the serialized offset `text_before` ends at. The
    /// selection is kept while the query is unchanged and reset otherwise.
    /// Returns true if the phase changed.
    pub fn detect(&mut self, text_before: &str, cursor_offset: usize) -> bool {
        let next = match match_trigger(text_before, self.trigger) {
            Some((query, _)) => {
                let anchor_offset = cursor_offset.saturating_sub(char_len(query) + 1);
                let selected_index = match &self.phase {
                    MentionPhase::Composing(prev)
                        if prev.query == query && prev.anchor_offset == anchor_offset =>
                    {
                        prev.selected_index
                    }
                    _ => 0,
                };
                MentionPhase::Composing(MentionState {
                    query: query.to_string(),
                    anchor_offset,
                    selected_index,
                })
            }
            None => MentionPhase::Idle,
        };

        if next == self.phase {
            return false;
        }
        match &next {
            MentionPhase::Composing(state) => tracing::debug!(
                query = %state.query,
                anchor = state.anchor_offset,
                "mention composing"
            ),
            MentionPhase::Idle => tracing::debug!("mention idle"),
        }
        self.phase = next;
        true
    }

    /// Drop back to idle without touching the text. Returns true if composing.
    pub fn cancel(&mut self) -> bool {
        if self.is_composing() {
            tracing::debug!("mention cancelled");
            self.phase = MentionPhase::Idle;
            true
        } else {
            false
        }
    }

    fn step_selection(&mut self, forward: bool) -> bool {
        let count = self.candidates().len();
        let MentionPhase::Composing(state) = &mut self.phase else {
            return false;
        };
        if count == 0 {
            return false;
        }
        state.selected_index = if forward {
            (state.selected_index + 1) % count
        } else {
            (state.selected_index + count - 1) % count
        };
        true
    }

    /// Move the selection down, wrapping to the top
    pub fn select_next(&mut self) -> bool {
        self.step_selection(true)
    }

    /// Move the selection up, wrapping to the bottom
    pub fn select_prev(&mut self) -> bool {
        self.step_selection(false)
    }

    /// Select a candidate by index (pointer hover). Out-of-range is a no-op.
    pub fn select(&mut self, index: usize) -> bool {
        let count = self.candidates().len();
        match &mut self.phase {
            MentionPhase::Composing(state) if index < count => {
                state.selected_index = index;
                true
            }
            _ => false,
        }
    }

    /// Commit the selected candidate, returning to idle.
    pub fn commit(&mut self) -> MentionAction {
        let Some(state) = self.state() else {
            return MentionAction::Ignored;
        };
        let anchor_offset = state.anchor_offset;
        let Some(name) = self.selected().map(|def| def.name.clone()) else {
            return MentionAction::Ignored;
        };

        tracing::debug!(%name, anchor = anchor_offset, "mention committed");
        self.phase = MentionPhase::Idle;
        MentionAction::Commit {
            name,
            anchor_offset,
        }
    }

    /// Commit the candidate at `index` (pointer click)
    pub fn commit_index(&mut self, index: usize) -> MentionAction {
        if self.select(index) {
            self.commit()
        } else {
            MentionAction::Ignored
        }
    }

    /// Offer a key to the machine.
    ///
    /// Navigation and commit keys are only consumed while composing with at
    /// least one candidate; Escape cancels whenever composing.
    pub fn handle_key(&mut self, key: Key) -> MentionAction {
        if !self.is_composing() {
            return MentionAction::Ignored;
        }
        if key == Key::Escape {
            self.cancel();
            return MentionAction::Handled;
        }
        if self.candidates().is_empty() {
            return MentionAction::Ignored;
        }

        match key {
            Key::Down => {
                self.select_next();
                MentionAction::Handled
            }
            Key::Up => {
                self.select_prev();
                MentionAction::Handled
            }
            Key::Enter | Key::Tab => self.commit(),
            _ => MentionAction::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> MentionMachine {
        MentionMachine::new(
            '@',
            Arc::new(VariableCatalog::from_names([
                "first_name",
                "last_name",
                "referral_link",
            ])),
        )
    }

    #[test]
    fn test_match_trigger() {
        assert_eq!(match_trigger("Hi @fir", '@'), Some(("fir", 3)));
        assert_eq!(match_trigger("@", '@'), Some(("", 0)));
        assert_eq!(match_trigger("{{a}}@x", '@'), Some(("x", 5)));
        assert_eq!(match_trigger("Hi @fir ", '@'), None);
        assert_eq!(match_trigger("Hi fir", '@'), None);
        assert_eq!(match_trigger("@first-na", '@'), None);
    }

    #[test]
    fn test_detect_enters_composing() {
        let mut m = machine();
        assert!(m.detect("Hi @fir", 7));
        assert_eq!(
            m.state(),
            Some(&MentionState {
                query: "fir".into(),
                anchor_offset: 3,
                selected_index: 0,
            })
        );
        assert_eq!(m.selected().unwrap().name, "first_name");
    }

    #[test]
    fn test_detect_returns_to_idle() {
        let mut m = machine();
        m.detect("@na", 3);
        assert!(m.detect("@na ", 4));
        assert_eq!(m.phase(), &MentionPhase::Idle);
    }

    #[test]
    fn test_selection_wraps() {
        let mut m = machine();
        m.detect("@nam", 4);
        assert_eq!(m.candidates().len(), 2);

        assert!(m.select_next());
        assert_eq!(m.selected().unwrap().name, "last_name");
        m.select_next();
        assert_eq!(m.selected().unwrap().name, "first_name");
        m.select_prev();
        assert_eq!(m.selected().unwrap().name, "last_name");
    }

    #[test]
    fn test_selection_kept_while_query_unchanged() {
        let mut m = machine();
        m.detect("@nam", 4);
        m.select_next();
        assert!(!m.detect("@nam", 4));
        assert_eq!(m.state().unwrap().selected_index, 1);

        m.detect("@name", 5);
        assert_eq!(m.state().unwrap().selected_index, 0);
    }

    #[test]
    fn test_commit() {
        let mut m = machine();
        m.detect("Hi @fir", 7);
        assert_eq!(
            m.handle_key(Key::Enter),
            MentionAction::Commit {
                name: "first_name".into(),
                anchor_offset: 3,
            }
        );
        assert!(!m.is_composing());
    }

    #[test]
    fn test_commit_index() {
        let mut m = machine();
        m.detect("@", 1);
        assert_eq!(
            m.commit_index(2),
            MentionAction::Commit {
                name: "referral_link".into(),
                anchor_offset: 0,
            }
        );
        m.detect("@", 1);
        assert_eq!(m.commit_index(7), MentionAction::Ignored);
        assert!(m.is_composing());
    }

    #[test]
    fn test_escape_cancels() {
        let mut m = machine();
        m.detect("@re", 3);
        assert_eq!(m.handle_key(Key::Escape), MentionAction::Handled);
        assert_eq!(m.phase(), &MentionPhase::Idle);
    }

    #[test]
    fn test_zero_candidates_stay_composing() {
        let mut m = machine();
        m.detect("@zzz", 4);
        assert!(m.is_composing());
        let view = m.view().unwrap();
        assert!(view.no_matches());
        assert_eq!(m.handle_key(Key::Enter), MentionAction::Ignored);
        assert_eq!(m.handle_key(Key::Down), MentionAction::Ignored);
        assert!(m.is_composing());
    }

    #[test]
    fn test_keys_ignored_when_idle() {
        let mut m = machine();
        assert_eq!(m.handle_key(Key::Enter), MentionAction::Ignored);
        assert_eq!(m.handle_key(Key::Escape), MentionAction::Ignored);
    }
}
