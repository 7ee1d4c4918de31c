//! Lifecycle of a store instance.
//!
//! ```text
//! Idle --> Loading --> Ready
//!             |------> Error
//! Ready/Error --> Loading (next operation)
//! Ready/Error --> Idle    (logout)
//! ```

use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

impl StoreStatus {
    /// Returns true if transition from self to target is valid.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        use StoreStatus::*;
        matches!(
            (self, target),
            (Idle, Loading)
                | (Idle, Ready)
                | (Loading, Ready)
                | (Loading, Error)
                | (Ready, Loading)
                | (Error, Loading)
                | (Ready, Idle)
                | (Error, Idle)
        )
    }

    /// Performs transition with validation.
    pub fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "store_status",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, StoreStatus::Loading)
    }
}
