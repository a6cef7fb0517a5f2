//! The Transcript: the ordered log of turns, and edit propagation over it.
//!
//! Turns are only ever appended or mutated in place. The single in-place
//! content mutation is [`Transcript::edit_user_turn`], which also flags every
//! later assistant turn as stale. Flags are never cleared.

use crate::error::TranscriptError;
use crate::turn::{Turn, TurnId, TurnRole};
use tracing::debug;

/// An ordered sequence of turns with its own id counter.
#[derive(Debug, Clone)]
pub struct Transcript {
    turns: Vec<Turn>,
    next_id: u64,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild a transcript from previously stored turns.
    ///
    /// If the stored ids are not strictly increasing (missing, duplicated, or
    /// from a snapshot that predates ids) all turns are renumbered from 1.
    pub fn from_turns(mut turns: Vec<Turn>) -> Self {
        let ordered = turns.first().is_none_or(|t| t.id.0 > 0)
            && turns.windows(2).all(|w| w[0].id < w[1].id);

        if !ordered {
            debug!(count = turns.len(), "Renumbering stored turns");
            for (i, turn) in turns.iter_mut().enumerate() {
                turn.id = TurnId(i as u64 + 1);
            }
        }

        let next_id = turns.last().map_or(1, |t| t.id.0 + 1);
        Self { turns, next_id }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn get(&self, id: TurnId) -> Option<&Turn> {
        self.position(id).map(|i| &self.turns[i])
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// The most recent `cap` turns, oldest first.
    pub fn recent(&self, cap: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(cap);
        &self.turns[start..]
    }

    /// Whether any assistant turn is flagged stale.
    pub fn has_stale(&self) -> bool {
        self.turns
            .iter()
            .any(|t| t.role == TurnRole::Assistant && t.stale)
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &Turn {
        let id = self.allocate_id();
        self.append(Turn::user(id, content))
    }

    pub fn push_assistant(&mut self, content: impl Into<String>, model: Option<String>) -> &Turn {
        let id = self.allocate_id();
        self.append(Turn::assistant(id, content, model))
    }

    pub fn push_search(&mut self, content: impl Into<String>, payload: Option<String>) -> &Turn {
        let id = self.allocate_id();
        self.append(Turn::search(id, content, payload))
    }

    /// Replace the content of a user turn and mark every later assistant
    /// turn stale. Returns the ids that were newly flagged.
    pub fn edit_user_turn(
        &mut self,
        id: TurnId,
        new_text: &str,
    ) -> Result<Vec<TurnId>, TranscriptError> {
        let index = self.position(id).ok_or(TranscriptError::NotFound(id))?;

        let turn = &mut self.turns[index];
        if turn.role != TurnRole::User {
            return Err(TranscriptError::NotEditable {
                id,
                role: turn.role,
            });
        }

        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Err(TranscriptError::EmptyContent(id));
        }
        turn.content = new_text.to_string();

        let mut newly_stale = Vec::new();
        for later in self.turns[index + 1..]
            .iter_mut()
            .filter(|t| t.role == TurnRole::Assistant)
        {
            if !later.stale {
                later.stale = true;
                newly_stale.push(later.id);
            }
        }

        debug!(turn = %id, newly_stale = newly_stale.len(), "User turn edited");
        Ok(newly_stale)
    }

    /// Drop every turn. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    fn position(&self, id: TurnId) -> Option<usize> {
        self.turns.binary_search_by_key(&id, |t| t.id).ok()
    }

    fn allocate_id(&mut self) -> TurnId {
        let id = TurnId(self.next_id);
        self.next_id += 1;
        id
    }

    fn append(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
