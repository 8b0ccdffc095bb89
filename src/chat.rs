//! Chat session: one conversation against a selectable model

use crate::api::{ApiError, BenchService, ModelCatalog};
use crate::picker::{LoadOutcome, ModelPicker};
use crate::transcript::Transcript;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// System notice appended when a chat request fails
pub const CHAT_FAILED_NOTICE: &str = "Error: Failed to get response from the model.";

/// System notice appended when the transcript is cleared
pub const CLEARED_NOTICE: &str = "Chat cleared";

/// Outcome of a send operation
#[derive(Debug)]
pub enum SendOutcome {
    /// The input was empty after trimming; nothing happened
    Ignored,
    /// A bot reply was appended
    Replied,
    /// The request failed and a system error notice was appended
    Failed(ApiError),
}

/// Controller state for the chat view
///
/// One send is in flight at a time: every operation takes `&mut self` and is
/// awaited to completion, so overlapping requests cannot start.
pub struct ChatSession {
    service: Arc<dyn BenchService>,
    catalog: Arc<dyn ModelCatalog>,
    picker: ModelPicker,
    transcript: Transcript,
    current_model: String,
}

impl ChatSession {
    /// Create a session with an unpopulated model picker
    pub fn new(service: Arc<dyn BenchService>, catalog: Arc<dyn ModelCatalog>) -> Self {
        Self {
            service,
            catalog,
            picker: ModelPicker::new(),
            transcript: Transcript::new(),
            current_model: String::new(),
        }
    }

    /// Populate the model picker from the catalog (run once on mount)
    ///
    /// A non-empty listing selects the first model and records the switch in
    /// the transcript, so the visible state matches a manual selection.
    pub async fn load_models(&mut self) -> LoadOutcome {
        let outcome = self.picker.populate(self.catalog.list_models().await);

        if outcome == LoadOutcome::Loaded {
            let first = self.picker.selected_id().to_string();
            self.select_model(&first);
        }

        outcome
    }

    /// Switch to one of the populated models; no network call
    pub fn select_model(&mut self, id: &str) -> bool {
        if !self.picker.select(id) {
            warn!(model = id, "ignoring selection of unlisted model");
            return false;
        }

        self.current_model = id.to_string();
        self.transcript
            .push_system(format!("Switched to model: {id}"));
        info!(model = id, "switched model");
        true
    }

    /// Send a message to the selected model and append the reply
    ///
    /// Empty or whitespace-only input is a no-op. The user's message is
    /// retained even when the request fails.
    pub async fn send(&mut self, input: &str) -> SendOutcome {
        let message = input.trim();
        if message.is_empty() {
            return SendOutcome::Ignored;
        }

        self.transcript.push_user(message);
        let model_id = self.picker.selected_id().to_string();

        self.transcript.begin_thinking();
        debug!(model = %model_id, chars = message.len(), "sending chat message");
        let result = self.service.chat(&model_id, message).await;
        self.transcript.end_thinking();

        match result {
            Ok(reply) => {
                self.transcript.push_bot(reply.reply);
                SendOutcome::Replied
            }
            Err(error) => {
                warn!(%error, "chat request failed");
                self.transcript.push_system(CHAT_FAILED_NOTICE);
                SendOutcome::Failed(error)
            }
        }
    }

    /// Drop the transcript, reset the counter, and record the clear
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.transcript.push_system(CLEARED_NOTICE);
        info!("chat cleared");
    }

    /// Label of the model messages are currently sent to
    pub fn current_model(&self) -> &str {
        &self.current_model
    }

    pub fn picker(&self) -> &ModelPicker {
        &self.picker
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// User+bot messages since the last clear
    pub fn message_count(&self) -> usize {
        self.transcript.message_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{BenchmarkInfo, ChatReply, EvaluationSummary, ModelEntry};
    use crate::picker::{LOAD_ERROR_LABEL, NO_MODELS_LABEL};
    use crate::transcript::Role;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubBench {
        reply: Option<String>,
        chat_calls: AtomicUsize,
    }

    impl StubBench {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                chat_calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                chat_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl BenchService for StubBench {
        async fn chat(&self, _model_id: &str, _message: &str) -> Result<ChatReply, ApiError> {
            self.chat_calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Some(reply) => Ok(ChatReply {
                    reply: reply.clone(),
                }),
                None => Err(ApiError::Status {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    body: "Ollama API Error".to_string(),
                }),
            }
        }

        async fn list_benchmarks(&self) -> Result<BTreeMap<String, BenchmarkInfo>, ApiError> {
            Ok(BTreeMap::new())
        }

        async fn run_evaluation(
            &self,
            _model_id: &str,
            _benchmark_name: &str,
        ) -> Result<EvaluationSummary, ApiError> {
            Ok(EvaluationSummary {
                status: "Completed".to_string(),
                results: Vec::new(),
            })
        }
    }

    struct StubCatalog {
        models: Option<Vec<ModelEntry>>,
        list_calls: AtomicUsize,
    }

    impl StubCatalog {
        fn with_models(names: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                models: Some(
                    names
                        .iter()
                        .map(|name| ModelEntry {
                            name: name.to_string(),
                            details: None,
                        })
                        .collect(),
                ),
                list_calls: AtomicUsize::new(0),
            })
        }

        fn unreachable_server() -> Arc<Self> {
            Arc::new(Self {
                models: None,
                list_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ModelCatalog for StubCatalog {
        async fn list_models(&self) -> Result<Vec<ModelEntry>, ApiError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            match &self.models {
                Some(models) => Ok(models.clone()),
                None => Err(ApiError::Status {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    body: String::new(),
                }),
            }
        }
    }

    fn roles(session: &ChatSession) -> Vec<Role> {
        session
            .transcript()
            .entries()
            .iter()
            .map(|entry| entry.role)
            .collect()
    }

    #[tokio::test]
    async fn test_load_models_selects_first_and_records_switch() {
        let service = StubBench::replying("hi");
        let catalog = StubCatalog::with_models(&["llama3.2:3b", "phi3:3.8b"]);
        let mut session = ChatSession::new(service, catalog);

        let outcome = session.load_models().await;
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(session.current_model(), "llama3.2:3b");
        assert_eq!(session.picker().options().len(), 2);

        let entries = session.transcript().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].role, Role::System);
        assert_eq!(entries[0].text, "Switched to model: llama3.2:3b");
        assert_eq!(session.message_count(), 0);
    }

    #[tokio::test]
    async fn test_load_models_empty_listing_has_no_side_effects() {
        let service = StubBench::replying("hi");
        let catalog = StubCatalog::with_models(&[]);
        let mut session = ChatSession::new(service, catalog);

        let outcome = session.load_models().await;
        assert_eq!(outcome, LoadOutcome::Empty);
        assert_eq!(session.picker().selected_label(), NO_MODELS_LABEL);
        assert_eq!(session.current_model(), "");
        assert!(session.transcript().entries().is_empty());
    }

    #[tokio::test]
    async fn test_load_models_unreachable_listing() {
        let service = StubBench::replying("hi");
        let catalog = StubCatalog::unreachable_server();
        let mut session = ChatSession::new(service, catalog);

        let outcome = session.load_models().await;
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(session.picker().options().len(), 1);
        assert_eq!(session.picker().selected_label(), LOAD_ERROR_LABEL);
        assert!(session.transcript().entries().is_empty());
    }

    #[tokio::test]
    async fn test_send_appends_user_then_bot() {
        let service = StubBench::replying("4");
        let catalog = StubCatalog::with_models(&["llama3.2:3b"]);
        let mut session = ChatSession::new(service.clone(), catalog);
        session.load_models().await;

        let outcome = session.send("what is 2+2?").await;
        assert!(matches!(outcome, SendOutcome::Replied));
        assert_eq!(service.chat_calls.load(Ordering::SeqCst), 1);

        assert_eq!(roles(&session), vec![Role::System, Role::User, Role::Bot]);
        let entries = session.transcript().entries();
        assert_eq!(entries[1].text, "what is 2+2?");
        assert_eq!(entries[2].text, "4");
        assert_eq!(session.message_count(), 2);
        assert!(!session.transcript().is_thinking());
    }

    #[tokio::test]
    async fn test_send_trims_input() {
        let service = StubBench::replying("hello");
        let catalog = StubCatalog::with_models(&["llama3.2:3b"]);
        let mut session = ChatSession::new(service, catalog);
        session.load_models().await;

        session.send("  hi there  ").await;
        assert_eq!(session.transcript().entries()[1].text, "hi there");
    }

    #[tokio::test]
    async fn test_send_failure_keeps_user_message() {
        let service = StubBench::failing();
        let catalog = StubCatalog::with_models(&["llama3.2:3b"]);
        let mut session = ChatSession::new(service.clone(), catalog);
        session.load_models().await;

        let outcome = session.send("hello?").await;
        assert!(matches!(outcome, SendOutcome::Failed(_)));
        assert_eq!(service.chat_calls.load(Ordering::SeqCst), 1);

        assert_eq!(
            roles(&session),
            vec![Role::System, Role::User, Role::System]
        );
        let entries = session.transcript().entries();
        assert_eq!(entries[1].text, "hello?");
        assert_eq!(entries[2].text, CHAT_FAILED_NOTICE);
        assert_eq!(session.message_count(), 1);
        assert!(!session.transcript().is_thinking());
    }

    #[tokio::test]
    async fn test_empty_send_is_a_no_op() {
        let service = StubBench::replying("hi");
        let catalog = StubCatalog::with_models(&["llama3.2:3b"]);
        let mut session = ChatSession::new(service.clone(), catalog);
        session.load_models().await;

        assert!(matches!(session.send("").await, SendOutcome::Ignored));
        assert!(matches!(session.send("   \t  ").await, SendOutcome::Ignored));
        assert_eq!(service.chat_calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.transcript().entries().len(), 1);
        assert_eq!(session.message_count(), 0);
    }

    #[tokio::test]
    async fn test_clear_resets_counter_and_leaves_one_notice() {
        let service = StubBench::replying("hi");
        let catalog = StubCatalog::with_models(&["llama3.2:3b"]);
        let mut session = ChatSession::new(service, catalog);
        session.load_models().await;
        session.send("hello").await;
        assert_eq!(session.message_count(), 2);

        session.clear();
        let entries = session.transcript().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].role, Role::System);
        assert_eq!(entries[0].text, CLEARED_NOTICE);
        assert_eq!(session.message_count(), 0);
    }

    #[tokio::test]
    async fn test_select_model_issues_no_request() {
        let service = StubBench::replying("hi");
        let catalog = StubCatalog::with_models(&["llama3.2:3b", "phi3:3.8b"]);
        let mut session = ChatSession::new(service.clone(), catalog.clone());
        session.load_models().await;
        let listing_calls = catalog.list_calls.load(Ordering::SeqCst);

        assert!(session.select_model("phi3:3.8b"));
        assert_eq!(session.current_model(), "phi3:3.8b");
        assert_eq!(
            session.transcript().entries().last().unwrap().text,
            "Switched to model: phi3:3.8b"
        );
        assert_eq!(service.chat_calls.load(Ordering::SeqCst), 0);
        assert_eq!(catalog.list_calls.load(Ordering::SeqCst), listing_calls);
    }

    #[tokio::test]
    async fn test_select_unknown_model_is_ignored() {
        let service = StubBench::replying("hi");
        let catalog = StubCatalog::with_models(&["llama3.2:3b"]);
        let mut session = ChatSession::new(service, catalog);
        session.load_models().await;
        let entries_before = session.transcript().entries().len();

        assert!(!session.select_model("missing:1b"));
        assert_eq!(session.current_model(), "llama3.2:3b");
        assert_eq!(session.transcript().entries().len(), entries_before);
    }
}
