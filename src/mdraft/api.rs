//! # API Facade
//!
//! Thin entry point wiring the store, the save coordinator, the editing
//! buffer and the AI assistant into one editor instance. UI shells talk to
//! this type only.
//!
//! The facade dispatches and normalizes; it holds no business logic of its
//! own. It never writes to stdout or stderr and never assumes a terminal or
//! browser environment, so the same core can sit behind any shell.
//!
//! Generic over both seams:
//! - `S: DocumentStore` (production `FileStore`, tests `InMemoryStore`)
//! - `G: TextGenerator` (production `GeminiClient`, tests static doubles)

use std::ops::Range;

use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use crate::ai::{AiAssistant, TextGenerator, TransformOutcome};
use crate::config::MdraftConfig;
use crate::error::Result;
use crate::model::DocumentRecord;
use crate::selection::EditorBuffer;
use crate::session::{EditSession, SaveCoordinator, SessionEvent};
use crate::store::DocumentStore;

pub struct EditorApi<S: DocumentStore, G: TextGenerator> {
    coordinator: SaveCoordinator<S>,
    assistant: AiAssistant<G>,
    buffer: EditorBuffer,
}

impl<S: DocumentStore, G: TextGenerator> EditorApi<S, G> {
    /// Open an editor instance, loading `document_id` when given. An
    /// unknown id falls back to a fresh draft rather than failing the
    /// whole editor.
    pub fn open(store: S, generator: G, document_id: Option<Uuid>) -> Result<Self> {
        Self::open_with_config(store, generator, document_id, &MdraftConfig::default())
    }

    pub fn open_with_config(
        store: S,
        generator: G,
        document_id: Option<Uuid>,
        config: &MdraftConfig,
    ) -> Result<Self> {
        let session = match document_id {
            Some(id) => match store.find_by_id(&id)? {
                Some(record) => EditSession::for_document(&record),
                None => {
                    tracing::warn!(%id, "document not found, opening a fresh draft");
                    EditSession::new_draft()
                }
            },
            None => EditSession::new_draft(),
        };

        let buffer = EditorBuffer::new(session.buffer_content.clone());
        let coordinator = SaveCoordinator::with_delay(store, session, config.autosave_delay());
        Ok(Self {
            coordinator,
            assistant: AiAssistant::new(generator),
            buffer,
        })
    }

    pub fn session(&self) -> &EditSession {
        self.coordinator.session()
    }

    pub fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    /// Event receiver for the rendering layer; `None` after the first call.
    pub fn take_events(&mut self) -> Option<UnboundedReceiver<SessionEvent>> {
        self.coordinator.take_events()
    }

    /// Change notification from the editing surface.
    pub fn set_content(&mut self, content: &str) {
        self.buffer.set_content(content);
        self.coordinator.edit_content(content);
    }

    pub fn set_title(&mut self, title: &str) {
        self.coordinator.edit_title(title);
    }

    pub fn select(&mut self, range: Range<usize>) {
        self.buffer.select(range);
    }

    pub fn clear_selection(&mut self) {
        self.buffer.clear_selection();
    }

    pub fn save(&mut self) -> Result<()> {
        self.coordinator.manual_save()
    }

    pub fn poll_autosave(&mut self) -> bool {
        self.coordinator.poll_autosave()
    }

    pub async fn debounce_elapsed(&self) {
        self.coordinator.debounce_elapsed().await;
    }

    /// Run one AI transform. The mutated buffer feeds back through the
    /// coordinator's change detection, so the result is picked up by the
    /// next autosave like any other edit.
    pub async fn transform(&mut self, prompt: &str) -> Result<TransformOutcome> {
        let outcome = self.assistant.execute(&mut self.buffer, prompt).await?;
        let content = self.buffer.content().to_string();
        self.coordinator.edit_content(content);
        Ok(outcome)
    }

    pub fn documents(&self) -> Result<Vec<DocumentRecord>> {
        self.coordinator.store().list_all()
    }

    pub fn delete_document(&mut self, id: &Uuid) -> Result<()> {
        self.coordinator.store_mut().remove(id)
    }

    /// Session teardown: drops any scheduled autosave.
    pub fn close(&mut self) {
        self.coordinator.cancel_autosave();
    }
}
