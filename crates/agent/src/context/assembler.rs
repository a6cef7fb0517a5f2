//! Context assembly pipeline.
//!
//! Assembly is deterministic: identical history, input and search outcome
//! always produce identical messages. Nothing here reads the clock or
//! mutates the transcript.

use crate::search::SearchOutcome;
use seriloka_core::lookup::SearchResult;
use seriloka_core::message::ChatMessage;
use seriloka_core::turn::{Turn, TurnRole};

/// Told to the model whenever an earlier user message was edited.
pub const STALE_NOTICE: &str = "Note: The user has edited one of their previous messages. Please consider the entire conversation context as it is presented now, not as it may have been previously.";

// ── Types ─────────────────────────────────────────────────────────────────

/// All inputs for a single completion request.
pub struct AssemblyInput<'a> {
    /// Stored turns, oldest first, not including the current input.
    pub history: &'a [Turn],
    /// The current user message.
    pub user_message: &'a str,
    /// The lookup made for this message, if search ran.
    pub search: Option<&'a SearchOutcome>,
}

/// The assembled context, ready for a provider request.
#[derive(Debug, Clone)]
pub struct AssembledContext {
    pub messages: Vec<ChatMessage>,
    pub metadata: AssemblyMetadata,
}

/// What went into an assembled context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyMetadata {
    /// History turns sent as conversation.
    pub history_messages: usize,
    /// History turns left out (search and system turns).
    pub skipped_turns: usize,
    pub stale_notice: bool,
    pub search_note: Option<SearchNote>,
}

/// Which search note was injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchNote {
    /// Results were found; carries their count.
    Results(usize),
    NoResults,
}

// ── Assembler ─────────────────────────────────────────────────────────────

/// The context assembler. Holds only the system prompt; reuse it freely.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    system_prompt: String,
}

impl ContextAssembler {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Build the message list for one user message.
    pub fn assemble(&self, input: &AssemblyInput<'_>) -> AssembledContext {
        let mut messages = Vec::with_capacity(input.history.len() + 4);
        messages.push(ChatMessage::system(&self.system_prompt));

        // ── History: conversation turns only ───────────────────────────────
        let mut skipped_turns = 0;
        for turn in input.history {
            match turn.role {
                TurnRole::User => messages.push(ChatMessage::user(&turn.content)),
                TurnRole::Assistant => messages.push(ChatMessage::assistant(&turn.content)),
                TurnRole::System | TurnRole::Search => skipped_turns += 1,
            }
        }
        let history_messages = messages.len() - 1;

        // ── Staleness notice: at most one ──────────────────────────────────
        let stale_notice = input
            .history
            .iter()
            .any(|t| t.role == TurnRole::Assistant && t.stale);
        if stale_notice {
            messages.push(ChatMessage::system(STALE_NOTICE));
        }

        // ── Search note for this message only ──────────────────────────────
        let search_note = input.search.map(|outcome| {
            if outcome.is_empty() {
                messages.push(ChatMessage::system(no_results_note(&outcome.query)));
                SearchNote::NoResults
            } else {
                messages.push(ChatMessage::system(results_note(
                    &outcome.query,
                    &outcome.results,
                )));
                SearchNote::Results(outcome.results.len())
            }
        });

        messages.push(ChatMessage::user(input.user_message));

        AssembledContext {
            messages,
            metadata: AssemblyMetadata {
                history_messages,
                skipped_turns,
                stale_notice,
                search_note,
            },
        }
    }

    /// Messages for an opening greeting: the system prompt alone.
    pub fn greeting(&self) -> Vec<ChatMessage> {
        vec![ChatMessage::system(&self.system_prompt)]
    }
}

/// `Source N: <title>\n<snippet>\nURL: <link>`, blank-line separated.
pub fn format_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("Source {}: {}\n{}\nURL: {}", i + 1, r.title, r.snippet, r.link))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn results_note(query: &str, results: &[SearchResult]) -> String {
    format!(
        "Here is information I found about \"{query}\":\n\n{}\n\nPlease use this information to provide a helpful response without mentioning that I performed this search for you. Do not refer to \"search results\" or \"[SEARCHING]\" in your response.",
        format_results(results)
    )
}

fn no_results_note(query: &str) -> String {
    format!(
        "I attempted to search for information about \"{query}\" but couldn't find relevant results. Please answer based on your existing knowledge, but do not mention that a search was attempted. Never include \"[SEARCHING]\" or similar phrases in your response."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::result;
    use seriloka_core::message::Role;
    use seriloka_core::transcript::Transcript;

    fn assembler() -> ContextAssembler {
        ContextAssembler::new("You are Hanafi.")
    }

    fn outcome(query: &str, results: Vec<SearchResult>) -> SearchOutcome {
        SearchOutcome {
            query: query.into(),
            results,
            failure: None,
        }
    }

    fn conversation() -> Transcript {
        let mut t = Transcript::new();
        t.push_user("Hai Hanafi");
        t.push_assistant("Apa yang you nak saya bantu hari ini?", Some("m".into()));
        t.push_search("Search results for: \"batik\"", Some("Batik - art (url)".into()));
        t.push_assistant("Batik is popular.", Some("m".into()));
        t
    }

    #[test]
    fn empty_history_gives_system_and_user() {
        let ctx = assembler().assemble(&AssemblyInput {
            history: &[],
            user_message: "Hello",
            search: None,
        });
        assert_eq!(ctx.messages.len(), 2);
        assert_eq!(ctx.messages[0], ChatMessage::system("You are Hanafi."));
        assert_eq!(ctx.messages[1], ChatMessage::user("Hello"));
        assert_eq!(ctx.metadata.history_messages, 0);
    }

    #[test]
    fn search_turns_never_enter_history() {
        let t = conversation();
        let ctx = assembler().assemble(&AssemblyInput {
            history: t.turns(),
            user_message: "Next?",
            search: None,
        });

        let roles: Vec<Role> = ctx.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::Assistant, Role::User]
        );
        assert_eq!(ctx.metadata.skipped_turns, 1);
        assert!(ctx.messages.iter().all(|m| !m.content.contains("Batik - art")));
    }

    #[test]
    fn one_stale_turn_gives_one_notice_before_search_note() {
        let mut t = conversation();
        let first_user = t.turns()[0].id;
        t.edit_user_turn(first_user, "Hai Hanafi, apa khabar?").unwrap();
        assert_eq!(t.turns().iter().filter(|x| x.stale).count(), 2);

        let search = outcome("batik", vec![result("Batik", "Malaysian textile art")]);
        let ctx = assembler().assemble(&AssemblyInput {
            history: t.turns(),
            user_message: "Tell me about batik",
            search: Some(&search),
        });

        let notices = ctx.messages.iter().filter(|m| m.content == STALE_NOTICE).count();
        assert_eq!(notices, 1);

        let n = ctx.messages.len();
        assert_eq!(ctx.messages[n - 3].content, STALE_NOTICE);
        assert_eq!(ctx.messages[n - 2].role, Role::System);
        assert!(ctx.messages[n - 2].content.contains("Source 1: Batik\nMalaysian textile art\nURL: https://en.wikipedia.org/wiki/Batik"));
        assert_eq!(ctx.messages[n - 1], ChatMessage::user("Tell me about batik"));
        assert_eq!(ctx.messages[1].content, "Hai Hanafi, apa khabar?");
        assert!(ctx.metadata.stale_notice);
        assert_eq!(ctx.metadata.search_note, Some(SearchNote::Results(1)));
    }

    #[test]
    fn no_results_note_keeps_non_disclosure_instruction() {
        let search = outcome("trim dinding", vec![]);
        let ctx = assembler().assemble(&AssemblyInput {
            history: &[],
            user_message: "trim dinding terkini",
            search: Some(&search),
        });

        assert_eq!(ctx.messages.len(), 3);
        let note = &ctx.messages[1].content;
        assert!(note.contains("couldn't find relevant results"));
        assert!(note.contains("do not mention that a search was attempted"));
        assert_eq!(ctx.metadata.search_note, Some(SearchNote::NoResults));
    }

    #[test]
    fn results_are_blank_line_separated() {
        let formatted = format_results(&[result("A", "first"), result("B", "second")]);
        assert_eq!(
            formatted,
            "Source 1: A\nfirst\nURL: https://en.wikipedia.org/wiki/A\n\nSource 2: B\nsecond\nURL: https://en.wikipedia.org/wiki/B"
        );
    }

    #[test]
    fn assembly_is_deterministic_and_pure() {
        let t = conversation();
        let before = t.turns().to_vec();
        let input = AssemblyInput {
            history: t.turns(),
            user_message: "Sama soalan",
            search: None,
        };
        let a = assembler().assemble(&input);
        let b = assembler().assemble(&input);
        assert_eq!(a.messages, b.messages);
        assert_eq!(t.turns(), before.as_slice());
    }

    #[test]
    fn greeting_is_system_prompt_only() {
        assert_eq!(assembler().greeting(), vec![ChatMessage::system("You are Hanafi.")]);
    }
}
