//! The conversation session.
//!
//! A `Session` owns the in-memory transcript and drives one turn at a time:
//!
//! 1. **Append** the user message and persist it
//! 2. **Classify** it and, if search is on and it qualifies, **augment**
//! 3. **Assemble** the context from the prior history plus this message
//! 4. **Complete** via the provider
//! 5. **Sanitize** the reply, append it, persist
//!
//! Every mutating operation takes `&mut self`, so one session can only have
//! one turn in flight. [`SharedSession`] rejects overlapping submissions
//! with [`Error::Busy`] instead of queueing them.

use crate::classifier::QueryClassifier;
use crate::context::{AssemblyInput, ContextAssembler};
use crate::prompt::{
    APOLOGY_MESSAGE, CREDENTIAL_MISSING_MESSAGE, CREDENTIAL_PROMPT_MESSAGE, DEFAULT_SYSTEM_PROMPT,
};
use crate::sanitize::sanitize;
use crate::search::{SearchAugmenter, SearchOutcome};
use chrono::Utc;
use seriloka_config::AppConfig;
use seriloka_core::error::{Error, ErrorKind, Result};
use seriloka_core::event::{DomainEvent, EventBus};
use seriloka_core::lookup::Lookup;
use seriloka_core::message::ChatMessage;
use seriloka_core::provider::{Credential, Provider, ProviderRequest};
use seriloka_core::store::{CREDENTIAL_KEY, KeyValueStore, MODEL_KEY};
use seriloka_core::transcript::Transcript;
use seriloka_core::turn::{Turn, TurnId};
use seriloka_store::snapshot;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The result of one submitted message.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The assistant turn that answers the message. On a recovered failure
    /// this is the canned instruction or apology.
    pub reply: Turn,
    /// The lookup made for this message, if search ran.
    pub search: Option<SearchOutcome>,
    /// Set when a failure was recovered into the reply.
    pub recovered: Option<ErrorKind>,
}

/// A single user's conversation with the assistant.
pub struct Session {
    provider: Arc<dyn Provider>,
    store: Arc<dyn KeyValueStore>,
    event_bus: Arc<EventBus>,
    classifier: QueryClassifier,
    augmenter: SearchAugmenter,
    assembler: ContextAssembler,
    transcript: Transcript,
    credential: Option<Credential>,
    model: String,
    max_tokens: Option<u32>,
    history_cap: usize,
    search_enabled: bool,
}

impl Session {
    /// Rehydrate a session from the store.
    ///
    /// The stored credential and model win over the config, which only
    /// seeds them on a fresh store.
    pub fn load(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        lookup: Arc<dyn Lookup>,
        store: Arc<dyn KeyValueStore>,
        event_bus: Arc<EventBus>,
    ) -> Result<Self> {
        let transcript = snapshot::load(store.as_ref())?;

        let credential = store
            .get(CREDENTIAL_KEY)?
            .and_then(Credential::new)
            .or_else(|| config.api_key.clone().and_then(Credential::new));

        let model = store
            .get(MODEL_KEY)?
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| config.default_model.clone());

        let system_prompt = config
            .assistant
            .system_prompt_override
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        info!(
            store = store.name(),
            provider = provider.name(),
            lookup = lookup.name(),
            turns = transcript.len(),
            model = %model,
            has_credential = credential.is_some(),
            "Session loaded"
        );

        Ok(Self {
            provider,
            store,
            event_bus,
            classifier: QueryClassifier::new(config.search.locality.clone()),
            augmenter: SearchAugmenter::new(lookup)
                .with_fallback_suffix(config.search.fallback_suffix.clone()),
            assembler: ContextAssembler::new(system_prompt),
            transcript,
            credential,
            model,
            max_tokens: Some(config.max_tokens),
            history_cap: config.store.history_cap,
            search_enabled: config.search.enabled,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn search_enabled(&self) -> bool {
        self.search_enabled
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Subscribe to this session's domain events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Arc<DomainEvent>> {
        self.event_bus.subscribe()
    }

    // ── Settings ──────────────────────────────────────────────────────────

    pub fn set_search_enabled(&mut self, enabled: bool) {
        self.search_enabled = enabled;
        info!(enabled, "Live search toggled");
    }

    /// Store a new credential. Blank keys are rejected.
    pub fn set_credential(&mut self, raw: &str) -> Result<()> {
        let credential = Credential::new(raw).ok_or_else(|| Error::Config {
            message: "API key must not be blank".into(),
        })?;
        self.store.set(CREDENTIAL_KEY, credential.expose())?;
        self.credential = Some(credential);
        info!("Credential stored");
        Ok(())
    }

    pub fn clear_credential(&mut self) -> Result<()> {
        self.store.remove(CREDENTIAL_KEY)?;
        self.credential = None;
        info!("Credential cleared");
        Ok(())
    }

    /// Switch the model used for future replies.
    pub fn set_model(&mut self, model: &str) -> Result<()> {
        let model = model.trim();
        if model.is_empty() {
            return Err(Error::Config {
                message: "model must not be blank".into(),
            });
        }
        self.store.set(MODEL_KEY, model)?;
        self.model = model.to_string();
        info!(model, "Model changed");
        Ok(())
    }

    // ── Operations ────────────────────────────────────────────────────────

    /// Submit a user message and get the assistant's reply.
    ///
    /// Completion and lookup failures are recovered into the transcript and
    /// reported through [`TurnOutcome::recovered`]. Only blank input and
    /// persistence failures are returned as errors.
    pub async fn send_turn(&mut self, text: &str) -> Result<TurnOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyInput);
        }

        let Some(credential) = self.credential.clone() else {
            warn!("Message submitted without a credential");
            let reply = self.append_reply(&sanitize(CREDENTIAL_MISSING_MESSAGE), None)?;
            self.report(ErrorKind::CredentialMissing, CREDENTIAL_MISSING_MESSAGE);
            return Ok(TurnOutcome {
                reply,
                search: None,
                recovered: Some(ErrorKind::CredentialMissing),
            });
        };

        let history_len = self.transcript.len();
        let user_turn = self.transcript.push_user(text).clone();
        self.announce(&user_turn);
        self.persist()?;

        info!(turn = %user_turn.id, chars = text.chars().count(), "Processing message");

        // ── Search augmentation ──
        let search = match self.search_query(text) {
            Some(query) => Some(self.run_search(&query).await?),
            None => None,
        };

        // ── Assembly ──
        let context = self.assembler.assemble(&AssemblyInput {
            history: &self.transcript.turns()[..history_len],
            user_message: text,
            search: search.as_ref(),
        });
        debug!(
            messages = context.messages.len(),
            history = context.metadata.history_messages,
            stale_notice = context.metadata.stale_notice,
            search_note = ?context.metadata.search_note,
            "Context assembled"
        );

        // ── Completion ──
        let (reply, completion_failed) = match self.complete(context.messages, credential).await {
            Some((content, model)) => (self.append_reply(&content, Some(model))?, false),
            None => (self.append_reply(APOLOGY_MESSAGE, None)?, true),
        };

        let recovered = if completion_failed {
            Some(ErrorKind::CompletionFailure)
        } else if search.as_ref().is_some_and(|s| s.failure.is_some()) {
            Some(ErrorKind::LookupFailure)
        } else {
            None
        };

        Ok(TurnOutcome {
            reply,
            search,
            recovered,
        })
    }

    /// Replace the text of an earlier user message.
    ///
    /// Every later assistant reply is marked stale; the ids newly marked are
    /// returned. The provider is not contacted.
    pub fn edit_turn(&mut self, id: TurnId, new_text: &str) -> Result<Vec<TurnId>> {
        let newly_stale = self.transcript.edit_user_turn(id, new_text)?;
        self.persist()?;

        info!(turn = %id, newly_stale = newly_stale.len(), "Message edited");
        self.event_bus.publish(DomainEvent::TurnEdited {
            id,
            newly_stale: newly_stale.clone(),
            timestamp: Utc::now(),
        });
        Ok(newly_stale)
    }

    /// Wipe the conversation and start over with a fresh greeting.
    pub async fn reset_transcript(&mut self) -> Result<Turn> {
        snapshot::clear(self.store.as_ref())?;
        self.transcript.clear();
        info!("Transcript reset");
        self.event_bus.publish(DomainEvent::TranscriptReset {
            timestamp: Utc::now(),
        });
        self.greet().await
    }

    /// Greet the user if the conversation is empty.
    ///
    /// With no credential the key prompt comes back with id 0 and is not
    /// stored; the next call after a key is set greets for real.
    pub async fn ensure_greeting(&mut self) -> Result<Option<Turn>> {
        if !self.transcript.is_empty() {
            return Ok(None);
        }
        self.greet().await.map(Some)
    }

    /// The in-memory transcript as pretty-printed JSON.
    pub fn export_transcript(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self.transcript.turns())?)
    }

    /// Write the transcript snapshot.
    pub fn flush(&self) -> Result<()> {
        self.persist()
    }

    /// Flush and end the session.
    pub fn close(self) -> Result<()> {
        self.persist()?;
        info!(turns = self.transcript.len(), "Session closed");
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn search_query(&self, text: &str) -> Option<String> {
        if !self.search_enabled {
            return None;
        }
        self.classifier.classify(text)
    }

    async fn run_search(&mut self, query: &str) -> Result<SearchOutcome> {
        let outcome = self.augmenter.augment(&mut self.transcript, query).await;
        if let Some(turn) = self.transcript.last().cloned() {
            self.announce(&turn);
        }
        self.persist()?;

        self.event_bus.publish(DomainEvent::SearchPerformed {
            query: outcome.query.clone(),
            results: outcome.results.len(),
            timestamp: Utc::now(),
        });
        if let Some(e) = &outcome.failure {
            self.report(ErrorKind::LookupFailure, &e.to_string());
        }
        Ok(outcome)
    }

    /// Ask the provider for a reply. `None` means it failed and the failure
    /// has been logged and reported.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        credential: Credential,
    ) -> Option<(String, String)> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            credential,
        };

        match self.provider.complete(request).await {
            Ok(response) => {
                self.event_bus.publish(DomainEvent::ResponseGenerated {
                    model: response.model.clone(),
                    tokens_used: response.usage.as_ref().map(|u| u.total_tokens),
                    timestamp: Utc::now(),
                });
                debug!(model = %response.model, "Reply received");
                Some((sanitize(&response.content), response.model))
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Completion failed");
                self.report(ErrorKind::CompletionFailure, &e.to_string());
                None
            }
        }
    }

    /// Without a credential the key prompt is returned but not stored, so
    /// the real greeting still happens once a key is set.
    async fn greet(&mut self) -> Result<Turn> {
        let Some(credential) = self.credential.clone() else {
            debug!("No credential, asking for one instead of greeting");
            return Ok(Turn::assistant(TurnId::default(), CREDENTIAL_PROMPT_MESSAGE, None));
        };

        match self.complete(self.assembler.greeting(), credential).await {
            Some((content, model)) => self.append_reply(&content, Some(model)),
            None => self.append_reply(APOLOGY_MESSAGE, None),
        }
    }

    fn append_reply(&mut self, content: &str, model: Option<String>) -> Result<Turn> {
        let turn = self.transcript.push_assistant(content, model).clone();
        self.announce(&turn);
        self.persist()?;
        Ok(turn)
    }

    fn announce(&self, turn: &Turn) {
        self.event_bus.publish(DomainEvent::TurnAppended {
            id: turn.id,
            role: turn.role,
            timestamp: turn.created_at,
        });
    }

    fn report(&self, kind: ErrorKind, message: &str) {
        self.event_bus.publish(DomainEvent::ErrorOccurred {
            kind,
            error_message: message.to_string(),
            timestamp: Utc::now(),
        });
    }

    fn persist(&self) -> Result<()> {
        snapshot::save(self.store.as_ref(), &self.transcript, self.history_cap)?;
        Ok(())
    }
}

/// A session shared between tasks.
///
/// At most one operation runs at a time; an overlapping call fails fast
/// with [`Error::Busy`].
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<tokio::sync::Mutex<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(tokio::sync::Mutex::new(session)),
        }
    }

    pub async fn send_turn(&self, text: &str) -> Result<TurnOutcome> {
        self.claim()?.send_turn(text).await
    }

    pub fn edit_turn(&self, id: TurnId, new_text: &str) -> Result<Vec<TurnId>> {
        self.claim()?.edit_turn(id, new_text)
    }

    pub async fn reset_transcript(&self) -> Result<Turn> {
        self.claim()?.reset_transcript().await
    }

    /// Wait for exclusive access, e.g. to read the transcript.
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, Session> {
        self.inner.lock().await
    }

    fn claim(&self) -> Result<tokio::sync::MutexGuard<'_, Session>> {
        self.inner.try_lock().map_err(|_| Error::Busy)
    }
}
