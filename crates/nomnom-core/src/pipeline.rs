//! # Command Pipeline
//!
//! Binds a command to the model, runs its single mutation, then persists.
//!
//! ## State machine
//!
//! | From | To | When |
//! |------|----|------|
//! | Idle | Executing | `execute` is called |
//! | Executing | Persisting | the mutation succeeded |
//! | Persisting | Idle | all three stores were written |
//! | Executing / Persisting | Failed | the mutation or a write failed |
//! | Failed | Idle | immediately after the error is reported |
//!
//! ## Partial failure
//!
//! Stores are written in [`StoreKind::SAVE_ORDER`]. The first failing write
//! stops the sequence and surfaces as `NomError::Persistence`. Earlier writes
//! are kept and the in-memory mutation is not reverted; the next successful
//! command rewrites all three stores.

use crate::sink::{LogLevel, LogSink};
use crate::storage::Storage;
use crate::{Command, CommandResult, Model, ModelListener, ModelOps, NomError, StoreKind};
use std::fmt;
use std::sync::Arc;

const TARGET: &str = "nomnom_core::pipeline";

/// Lifecycle state of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Idle,
    Executing,
    Persisting,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Executing => "executing",
            Self::Persisting => "persisting",
            Self::Failed => "failed",
        })
    }
}

/// Executes commands against a [`Model`] and saves the result to a [`Storage`].
pub struct CommandPipeline<S: Storage> {
    model: Model,
    storage: S,
    sink: Arc<dyn LogSink>,
    state: PipelineState,
}

impl<S: Storage + fmt::Debug> fmt::Debug for CommandPipeline<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandPipeline")
            .field("model", &self.model)
            .field("storage", &self.storage)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S: Storage> CommandPipeline<S> {
    pub fn new(model: Model, storage: S, sink: Arc<dyn LogSink>) -> Self {
        Self {
            model,
            storage,
            sink,
            state: PipelineState::Idle,
        }
    }

    /// Read access to the model. Mutation only happens through `execute`.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Register a model change listener.
    pub fn subscribe(&mut self, listener: ModelListener) {
        self.model.subscribe(listener);
    }

    /// Run `command` and persist all three stores.
    ///
    /// # Errors
    ///
    /// - the command's own error when the mutation fails (nothing is written)
    /// - `NomError::Persistence` when a write fails after the mutation
    pub fn execute(&mut self, command: &Command) -> Result<CommandResult, NomError> {
        self.transition(PipelineState::Executing, command.word());

        let result = match command.execute(&mut self.model) {
            Ok(result) => result,
            Err(e) => {
                self.fail(command.word(), &e);
                return Err(e);
            }
        };

        self.transition(PipelineState::Persisting, command.word());
        if let Err(e) = self.persist() {
            self.fail(command.word(), &e);
            return Err(e);
        }

        self.transition(PipelineState::Idle, command.word());
        Ok(result)
    }

    /// Write catalog, record and goal, in that order, stopping at the first
    /// failure.
    fn persist(&self) -> Result<(), NomError> {
        for store in StoreKind::SAVE_ORDER {
            self.save(store).map_err(|e| match e {
                NomError::Persistence { .. } => e,
                other => NomError::Persistence {
                    store,
                    reason: other.to_string(),
                },
            })?;
            self.sink
                .log(LogLevel::Debug, TARGET, &format!("Saved {} store", store));
        }
        Ok(())
    }

    fn save(&self, store: StoreKind) -> Result<(), NomError> {
        match store {
            StoreKind::Catalog => self.storage.save_catalog(self.model.catalog()),
            StoreKind::Record => self.storage.save_record(self.model.record()),
            StoreKind::Goal => self.storage.save_goal(self.model.goal()),
        }
    }

    fn transition(&mut self, next: PipelineState, word: &str) {
        self.sink.log(
            LogLevel::Debug,
            TARGET,
            &format!("{} -> {} ({})", self.state, next, word),
        );
        self.state = next;
    }

    fn fail(&mut self, word: &str, error: &NomError) {
        self.transition(PipelineState::Failed, word);
        let level = if error.is_storage_failure() {
            LogLevel::Error
        } else {
            LogLevel::Debug
        };
        self.sink
            .log(level, TARGET, &format!("{} failed: {}", word, error));
        self.transition(PipelineState::Idle, word);
    }
}

// =============================================================================
// TESTS
// =============================================================================
