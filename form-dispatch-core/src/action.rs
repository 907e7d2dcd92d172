//! Action trait for type-safe store mutations

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to the store
///
/// Actions describe an intended change to the form store. They should be:
/// - Clone: middleware may log or forward them after the reducer ran
/// - Debug: for tracing output and test assertions
///
/// Use `#[derive(Action)]` from `form-dispatch-macros` to auto-implement this trait.
/// Variants can override their action type with `#[action(name = "...")]`.
pub trait Action: Clone + Debug + 'static {
    /// Get the action type name for logging and filtering
    fn name(&self) -> &'static str;
}
