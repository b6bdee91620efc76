//! # Mdraft Architecture
//!
//! Mdraft is the **UI-agnostic core of a markdown document editor**: the
//! persistence, autosave synchronization and AI transform machinery, with
//! no rendering of its own. The WYSIWYG surface, routing and styling live
//! in the host shell; this crate owns everything that must not lose data.
//!
//! ## The Layers
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  Host shell (editor surface, dialogs, router)              │
//! │  - Renders, forwards change notifications, drains events   │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  API Facade (api.rs)                                       │
//! │  - One editor instance: buffer + coordinator + assistant   │
//! │  - Returns structured Result types, no I/O assumptions     │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  Core (session.rs, selection.rs, ai/)                      │
//! │  - Save state machine with trailing-debounce autosave      │
//! │  - Selection bridge and transform protocol                 │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                    │
//! │  - Abstract DocumentStore trait                            │
//! │  - FileStore (production), InMemoryStore (testing)         │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No Silent Data Loss
//!
//! The save pipeline guarantees:
//! - every buffer edit flips the status to unsaved on the same tick;
//! - autosave is gated behind the first explicit save, so abandoned
//!   drafts never create store entries in the background;
//! - the store commits its whole collection atomically, so a failed
//!   write leaves the previous durable state intact;
//! - persist failures revert to unsaved and surface a retryable warning.
//!
//! ## Concurrency Model
//!
//! Single-threaded and event-driven. The only suspension points are the
//! debounce deadline and the generator call; there is no concurrent
//! writer, so the coordinator needs no locking. Hosts drive the debounce
//! either by polling from a tick or by awaiting it in a select loop.
//!
//! ## Testing Strategy
//!
//! - **Core** (`session`, `selection`, `ai`): unit tests next to the
//!   code, including debounce timelines on the paused tokio clock. This
//!   is where the lion's share of testing lives.
//! - **Storage** (`store/`): contract tests against both backends, plus
//!   corruption and failure-injection cases.
//! - **Facade** (`api.rs` + `tests/`): end-to-end flows over an
//!   in-memory store and a scripted generator.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade; entry point for host shells
//! - [`session`]: edit session, save state machine, autosave debounce
//! - [`selection`]: selection bridge and the plain editing buffer
//! - [`ai`]: generator capability, transform protocol, Gemini client
//! - [`store`]: storage abstraction and implementations
//! - [`model`]: core data types (`DocumentRecord`)
//! - [`config`]: configuration management
//! - [`error`]: error types

pub mod ai;
pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod selection;
pub mod session;
pub mod store;
