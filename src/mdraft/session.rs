//! # Save Pipeline
//!
//! One [`EditSession`] exists per open editor instance. The
//! [`SaveCoordinator`] owns it together with the store and runs the save
//! state machine:
//!
//! ```text
//!           edit_content / edit_title
//!   Saved ─────────────────────────────▶ Unsaved
//!   Saving ────────────────────────────▶ Unsaved
//!   Unsaved ──(manual save / debounce)─▶ Saving ──▶ Saved
//! ```
//!
//! Every edit rearms a single trailing-debounce deadline. The deadline is
//! only armed once the session has been manually saved at least once, so a
//! brand-new document never silently creates a store entry in the
//! background.
//!
//! The coordinator never renders anything. UI fragments observe it through
//! [`SessionEvent`]s drained from the channel handed out by
//! [`SaveCoordinator::take_events`].

use std::future;

use chrono::{Local, Utc};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{self, Duration, Instant};
use uuid::Uuid;

use crate::error::{MdraftError, Result};
use crate::model::{count_words, DocumentRecord};
use crate::store::DocumentStore;

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(2000);

const UNTITLED: &str = "Untitled Document";

/// Seed content for a fresh draft session.
pub const WELCOME_DRAFT: &str = r#"# Welcome to Smart Markdown Editor

Start writing your document here. This intelligent editor supports all markdown features including:

- **Bold** and *italic* text
- [Links](https://example.com)
- Code blocks
- Tables
- And much more!

## Getting Started

Just start typing to begin your document. Press **Ctrl+S** or click the **Save** button to save your document and enable auto-save for future changes.

## Code Block Examples

Try creating code blocks in two ways:

1. **Using the toolbar button**: Click the code block button in the toolbar
2. **Using markdown syntax**: Type three backticks ``` followed by optional language

```javascript
function hello() {
  console.log("Hello, world!");
}
```

You can also try:
- ```python for Python
- ```css for CSS
- ``` for plain text

Inline code works too: `console.log("test")`"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    Saving,
    Unsaved,
}

/// Notifications for the rendering layer and the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StatusChanged(SaveStatus),
    /// First persist of a brand-new document assigned this id; the host
    /// should update its location so reload resolves to the same record.
    DocumentAssigned(Uuid),
    /// A persist failed; transient warning, the user may retry.
    SaveFailed(String),
}

/// Live editing state, not yet necessarily persisted.
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Absent until the first persist of a new document.
    pub document_id: Option<Uuid>,
    pub buffer_title: String,
    pub buffer_content: String,
    pub save_status: SaveStatus,
    /// Autosave stays disabled until one explicit save has completed.
    pub ever_manually_saved: bool,
}

impl EditSession {
    /// Session over a document loaded from the store.
    pub fn for_document(record: &DocumentRecord) -> Self {
        Self {
            document_id: Some(record.id),
            buffer_title: record.title.clone(),
            buffer_content: record.content.clone(),
            save_status: SaveStatus::Saved,
            ever_manually_saved: true,
        }
    }

    /// Fresh draft with a timestamped placeholder title and welcome content.
    pub fn new_draft() -> Self {
        Self {
            document_id: None,
            buffer_title: draft_title(),
            buffer_content: WELCOME_DRAFT.to_string(),
            save_status: SaveStatus::Saved,
            ever_manually_saved: false,
        }
    }
}

pub fn draft_title() -> String {
    format!("{} - {}", UNTITLED, Local::now().format("%Y-%m-%d"))
}

/// Owns the save state machine, the debounce deadline and the persist path.
///
/// Hosts either call [`poll_autosave`](Self::poll_autosave) from their tick
/// loop or await [`debounce_elapsed`](Self::debounce_elapsed) in a select
/// loop; both resolve against the same single owned deadline.
pub struct SaveCoordinator<S: DocumentStore> {
    store: S,
    session: EditSession,
    autosave_delay: Duration,
    autosave_deadline: Option<Instant>,
    events: UnboundedSender<SessionEvent>,
    event_rx: Option<UnboundedReceiver<SessionEvent>>,
}

impl<S: DocumentStore> SaveCoordinator<S> {
    pub fn new(store: S, session: EditSession) -> Self {
        Self::with_delay(store, session, DEFAULT_AUTOSAVE_DELAY)
    }

    pub fn with_delay(store: S, session: EditSession, autosave_delay: Duration) -> Self {
        let (events, event_rx) = mpsc::unbounded_channel();
        Self {
            store,
            session,
            autosave_delay,
            autosave_deadline: None,
            events,
            event_rx: Some(event_rx),
        }
    }

    /// Hand the event receiver to the rendering layer. Yields `None` after
    /// the first call.
    pub fn take_events(&mut self) -> Option<UnboundedReceiver<SessionEvent>> {
        self.event_rx.take()
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn autosave_deadline(&self) -> Option<Instant> {
        self.autosave_deadline
    }

    /// Record a buffer content change from the editing surface.
    pub fn edit_content(&mut self, content: impl Into<String>) {
        self.session.buffer_content = content.into();
        self.mark_dirty();
    }

    /// Record a title change.
    pub fn edit_title(&mut self, title: impl Into<String>) {
        self.session.buffer_title = title.into();
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.set_status(SaveStatus::Unsaved);
        if self.session.ever_manually_saved {
            self.autosave_deadline = Some(Instant::now() + self.autosave_delay);
            tracing::debug!(
                delay_ms = self.autosave_delay.as_millis() as u64,
                "autosave rescheduled"
            );
        }
    }

    /// Explicit save. Works whether or not autosave is enabled yet, and
    /// opens the autosave gate once it completes.
    pub fn manual_save(&mut self) -> Result<()> {
        self.set_status(SaveStatus::Saving);
        match self.persist() {
            Ok(()) => {
                self.session.ever_manually_saved = true;
                self.autosave_deadline = None;
                Ok(())
            }
            Err(err) => {
                self.set_status(SaveStatus::Unsaved);
                if !matches!(err, MdraftError::Validation(_)) {
                    let _ = self
                        .events
                        .send(SessionEvent::SaveFailed(err.to_string()));
                }
                Err(err)
            }
        }
    }

    /// Fire the autosave if its quiet period has elapsed. Returns whether
    /// an autosave ran. Intended to be called from the host's tick.
    pub fn poll_autosave(&mut self) -> bool {
        let Some(deadline) = self.autosave_deadline else {
            return false;
        };
        if Instant::now() < deadline {
            return false;
        }
        self.autosave_deadline = None;
        self.autosave();
        true
    }

    /// Completes when the debounce window elapses. Pends forever while no
    /// autosave is scheduled, which makes it safe inside `select!`.
    pub async fn debounce_elapsed(&self) {
        match self.autosave_deadline {
            Some(deadline) => time::sleep_until(deadline).await,
            None => future::pending::<()>().await,
        }
    }

    /// Drop any scheduled autosave. Called on session teardown.
    pub fn cancel_autosave(&mut self) {
        self.autosave_deadline = None;
    }

    fn autosave(&mut self) {
        tracing::debug!("autosave firing");
        self.set_status(SaveStatus::Saving);
        match self.persist() {
            Ok(()) => {}
            // An emptied-out buffer is not worth a warning in the background
            Err(MdraftError::Validation(_)) => self.set_status(SaveStatus::Unsaved),
            Err(err) => {
                self.set_status(SaveStatus::Unsaved);
                let _ = self
                    .events
                    .send(SessionEvent::SaveFailed(err.to_string()));
            }
        }
    }

    fn persist(&mut self) -> Result<()> {
        let title_blank = self.session.buffer_title.trim().is_empty();
        if title_blank && self.session.buffer_content.trim().is_empty() {
            return Err(MdraftError::Validation(
                "Nothing to save: the document is empty.".to_string(),
            ));
        }

        let id = self.session.document_id.unwrap_or_else(Uuid::new_v4);
        let record = DocumentRecord {
            id,
            title: if title_blank {
                UNTITLED.to_string()
            } else {
                self.session.buffer_title.clone()
            },
            content: self.session.buffer_content.clone(),
            last_modified: Utc::now(),
            word_count: count_words(&self.session.buffer_content),
        };
        self.store.upsert(&record)?;

        let newly_assigned = self.session.document_id.is_none();
        self.session.document_id = Some(id);
        self.set_status(SaveStatus::Saved);
        if newly_assigned {
            let _ = self.events.send(SessionEvent::DocumentAssigned(id));
        }
        Ok(())
    }

    fn set_status(&mut self, status: SaveStatus) {
        if self.session.save_status != status {
            self.session.save_status = status;
            let _ = self.events.send(SessionEvent::StatusChanged(status));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn draft_coordinator() -> SaveCoordinator<InMemoryStore> {
        SaveCoordinator::new(InMemoryStore::new(), EditSession::new_draft())
    }

    fn drain(rx: &mut UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn edits_mark_the_session_unsaved() {
        let mut coord = draft_coordinator();
        assert_eq!(coord.session().save_status, SaveStatus::Saved);

        coord.edit_content("changed");
        assert_eq!(coord.session().save_status, SaveStatus::Unsaved);
    }

    #[test]
    fn title_edits_also_mark_unsaved() {
        let mut coord = draft_coordinator();
        coord.edit_title("New title");
        assert_eq!(coord.session().save_status, SaveStatus::Unsaved);
    }

    #[test]
    fn manual_save_assigns_an_id_and_opens_the_gate() {
        let mut coord = draft_coordinator();
        let mut rx = coord.take_events().unwrap();

        coord.edit_content("body");
        coord.manual_save().unwrap();

        let session = coord.session();
        assert!(session.document_id.is_some());
        assert!(session.ever_manually_saved);
        assert_eq!(session.save_status, SaveStatus::Saved);

        let events = drain(&mut rx);
        let id = session.document_id.unwrap();
        assert!(events.contains(&SessionEvent::DocumentAssigned(id)));
    }

    #[test]
    fn document_assigned_fires_only_once() {
        let mut coord = draft_coordinator();
        let mut rx = coord.take_events().unwrap();

        coord.edit_content("body");
        coord.manual_save().unwrap();
        coord.edit_content("body v2");
        coord.manual_save().unwrap();

        let assigned = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::DocumentAssigned(_)))
            .count();
        assert_eq!(assigned, 1);
    }

    #[test]
    fn saving_an_empty_document_is_rejected() {
        let mut coord = draft_coordinator();
        coord.edit_title("   ");
        coord.edit_content("  \n ");

        let err = coord.manual_save().unwrap_err();
        assert!(matches!(err, MdraftError::Validation(_)));
        assert!(coord.store().list_all().unwrap().is_empty());
        assert!(!coord.session().ever_manually_saved);
        assert_eq!(coord.session().save_status, SaveStatus::Unsaved);
    }

    #[test]
    fn blank_title_falls_back_to_untitled() {
        let mut coord = draft_coordinator();
        coord.edit_title("");
        coord.edit_content("some body");
        coord.manual_save().unwrap();

        let records = coord.store().list_all().unwrap();
        assert_eq!(records[0].title, UNTITLED);
    }

    #[test]
    fn repeated_saves_keep_id_and_word_count_stable() {
        let mut coord = draft_coordinator();
        coord.edit_content("alpha beta gamma");
        coord.manual_save().unwrap();

        let first = coord.store().list_all().unwrap().remove(0);
        coord.manual_save().unwrap();
        let second = coord.store().list_all().unwrap().remove(0);

        assert_eq!(coord.store().list_all().unwrap().len(), 1);
        assert_eq!(first.id, second.id);
        assert_eq!(first.word_count, second.word_count);
        assert_eq!(second.word_count, 3);
        assert!(second.last_modified >= first.last_modified);
    }

    #[test]
    fn write_failure_reverts_to_unsaved_and_warns() {
        let mut coord = draft_coordinator();
        let mut rx = coord.take_events().unwrap();
        coord.store_mut().fail_writes(true);

        coord.edit_content("body");
        let err = coord.manual_save().unwrap_err();
        assert!(matches!(err, MdraftError::Store(_)));
        assert_eq!(coord.session().save_status, SaveStatus::Unsaved);
        assert!(!coord.session().ever_manually_saved);

        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::SaveFailed(_))));

        // A later retry succeeds
        coord.store_mut().fail_writes(false);
        coord.manual_save().unwrap();
        assert_eq!(coord.session().save_status, SaveStatus::Saved);
    }

    #[test]
    fn loaded_documents_start_saved_with_the_gate_open() {
        let record = DocumentRecord::new("Existing".into(), "text".into());
        let session = EditSession::for_document(&record);
        assert_eq!(session.save_status, SaveStatus::Saved);
        assert!(session.ever_manually_saved);
        assert_eq!(session.document_id, Some(record.id));
    }

    #[test]
    fn draft_sessions_seed_welcome_content() {
        let session = EditSession::new_draft();
        assert!(session.buffer_title.starts_with(UNTITLED));
        assert_eq!(session.buffer_content, WELCOME_DRAFT);
        assert!(!session.ever_manually_saved);
        assert!(session.document_id.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn autosave_never_fires_before_the_first_manual_save() {
        let mut coord = draft_coordinator();
        coord.edit_content("typed but never saved");

        time::advance(ms(60_000)).await;
        assert!(!coord.poll_autosave());
        assert!(coord.autosave_deadline().is_none());
        assert!(coord.store().list_all().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn autosave_becomes_eligible_after_a_manual_save() {
        let mut coord = draft_coordinator();
        coord.edit_content("body");
        coord.manual_save().unwrap();

        coord.edit_content("body v2");
        assert!(coord.autosave_deadline().is_some());

        time::advance(ms(2100)).await;
        assert!(coord.poll_autosave());
        assert_eq!(coord.session().save_status, SaveStatus::Saved);
        assert_eq!(coord.store().list_all().unwrap()[0].content, "body v2");
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_restarts_on_every_edit_and_fires_once() {
        let mut coord = draft_coordinator();
        coord.edit_content("seed");
        coord.manual_save().unwrap();

        // t = 0
        coord.edit_content("edit one");
        time::advance(ms(1500)).await;
        // t = 1500, window ends at 2000
        assert!(!coord.poll_autosave());

        coord.edit_content("edit two");
        // window now ends at 3500
        time::advance(ms(1900)).await;
        // t = 3400
        assert!(!coord.poll_autosave());

        time::advance(ms(200)).await;
        // t = 3600
        assert!(coord.poll_autosave());
        assert_eq!(coord.store().list_all().unwrap()[0].content, "edit two");

        // Fired exactly once
        assert!(!coord.poll_autosave());
        assert_eq!(coord.store().list_all().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn emptying_the_buffer_makes_autosave_back_off_quietly() {
        let mut coord = draft_coordinator();
        let mut rx = coord.take_events().unwrap();
        coord.edit_content("body");
        coord.manual_save().unwrap();

        coord.edit_title("");
        coord.edit_content("   ");
        time::advance(ms(2100)).await;
        assert!(coord.poll_autosave());

        assert_eq!(coord.session().save_status, SaveStatus::Unsaved);
        let events = drain(&mut rx);
        assert!(!events
            .iter()
            .any(|e| matches!(e, SessionEvent::SaveFailed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_the_scheduled_autosave() {
        let mut coord = draft_coordinator();
        coord.edit_content("body");
        coord.manual_save().unwrap();

        coord.edit_content("body v2");
        coord.cancel_autosave();
        time::advance(ms(10_000)).await;
        assert!(!coord.poll_autosave());
        assert_eq!(coord.store().list_all().unwrap()[0].content, "body");
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_elapsed_resolves_at_the_deadline() {
        let mut coord = draft_coordinator();
        coord.edit_content("body");
        coord.manual_save().unwrap();
        coord.edit_content("body v2");

        let deadline = coord.autosave_deadline().unwrap();
        coord.debounce_elapsed().await;
        assert!(Instant::now() >= deadline);
        assert!(coord.poll_autosave());
    }
}
