use bevy::prelude::*;

use super::{GalaxyParameters, ParameterField, ParameterValue};
use crate::error::Result;

/// Asks for the galaxy to be rebuilt from `parameters`.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct RegenerationRequest {
    pub parameters: GalaxyParameters,
    pub generation: u32,
}

/// Live parameter values plus the snapshot the displayed galaxy was last built from.
///
/// Widgets stage values with [`set`](Self::set) while the user is still dragging and call
/// [`commit`](Self::commit) once the edit is finished, so a large field is rebuilt once per
/// edit rather than once per frame.
#[derive(Resource, Debug)]
pub struct ParameterStore {
    current: GalaxyParameters,
    committed: Option<GalaxyParameters>,
    generation: u32,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(GalaxyParameters::default())
    }
}

impl ParameterStore {
    pub fn new(parameters: GalaxyParameters) -> Self {
        Self {
            current: parameters,
            committed: None,
            generation: 0,
        }
    }

    pub fn current(&self) -> &GalaxyParameters {
        &self.current
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn set(&mut self, field: ParameterField, value: ParameterValue) -> Result<()> {
        self.current.apply(field, value)
    }

    /// The user finished editing `field`. Hands out a snapshot only when something changed
    /// since the last commit.
    pub fn commit(&mut self, field: ParameterField) -> Option<RegenerationRequest> {
        if !self.has_pending_edits() {
            return None;
        }
        debug!("Committed edit to {field}");
        Some(self.request_full())
    }

    pub fn commit_edit(
        &mut self,
        field: ParameterField,
        value: ParameterValue,
    ) -> Result<Option<RegenerationRequest>> {
        self.set(field, value)?;
        Ok(self.commit(field))
    }

    /// Snapshot of the current values regardless of pending edits.
    pub fn request_full(&mut self) -> RegenerationRequest {
        self.generation += 1;
        self.committed = Some(self.current.clone());
        RegenerationRequest {
            parameters: self.current.clone(),
            generation: self.generation,
        }
    }

    pub fn has_pending_edits(&self) -> bool {
        self.committed.as_ref() != Some(&self.current)
    }
}
