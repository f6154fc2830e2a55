//! Per-operation state for the asynchronous editor actions.

use std::fmt;

use serde::Serialize;

use crate::error::EditorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Generate,
    Render,
    Persist,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Render => "render",
            Self::Persist => "persist",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "kebab-case")]
pub enum OpState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Operations {
    generate: OpState,
    render: OpState,
    persist: OpState,
}

impl Operations {
    #[must_use]
    pub fn get(&self, op: Operation) -> &OpState {
        match op {
            Operation::Generate => &self.generate,
            Operation::Render => &self.render,
            Operation::Persist => &self.persist,
        }
    }

    #[must_use]
    pub fn is_in_flight(&self, op: Operation) -> bool {
        *self.get(op) == OpState::InFlight
    }

    /// Mark `op` in flight.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Busy`] if `op` is already in flight.
    pub fn begin(&mut self, op: Operation) -> Result<(), EditorError> {
        if self.is_in_flight(op) {
            return Err(EditorError::Busy(op));
        }
        *self.slot(op) = OpState::InFlight;
        Ok(())
    }

    pub fn succeed(&mut self, op: Operation) {
        *self.slot(op) = OpState::Succeeded;
    }

    pub fn fail(&mut self, op: Operation, message: impl Into<String>) {
        *self.slot(op) = OpState::Failed(message.into());
    }

    fn slot(&mut self, op: Operation) -> &mut OpState {
        match op {
            Operation::Generate => &mut self.generate,
            Operation::Render => &mut self.render,
            Operation::Persist => &mut self.persist,
        }
    }
}

#[cfg(test)]
#[path = "ops_test.rs"]
mod tests;
