//! Core traits and types for form-dispatch
//!
//! This crate binds schema-driven forms to a centralized, Redux-style store.
//! Each mounted form owns one slice of the store, keyed by its id.
//!
//! # Core Concepts
//!
//! - **Store**: Centralized state container with reducer pattern
//! - **Slice**: The [`FormModel`] stored under one form id
//! - **FormDispatcher**: The create/update/remove/read capability a form gets
//! - **FormController**: Mounts a slice, writes field edits, gates submission
//! - **SchemaRenderer**: Draws fields and reports back through [`FormCapabilities`]
//!
//! # Basic Example
//!
//! ```ignore
//! use form_dispatch_core::prelude::*;
//!
//! let mut store = Store::new(FormsState::default(), forms_reducer);
//! let props = FormProps::builder()
//!     .id("f1")
//!     .schema(json!({"type": "object"}))
//!     .model(model)
//!     .component_map(components)
//!     .on_submit(|clean| println!("submitted {clean:?}"))
//!     .build()?;
//!
//! let mut form = FormController::mount(props, &mut store);
//! form.register_validator(|dirty| ValidationResult::valid("name").dirty(dirty));
//! assert_eq!(form.submit(), SubmitOutcome::Submitted);
//! form.unmount();
//! ```

pub mod action;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod model;
#[cfg(feature = "poller")]
pub mod poller;
pub mod props;
pub mod renderer;
pub mod slices;
pub mod store;
pub mod testing;
pub mod validation;

pub use action::Action;
pub use controller::{FormController, SubmitOutcome};
pub use dispatcher::FormDispatcher;
pub use error::FormError;
pub use event::EventKind;
pub use model::{is_truthy, CleanModel, FieldState, FormModel, RawModel};
pub use props::{FormDefinition, FormLayout, FormProps, FormPropsBuilder, SubmitHandler};
pub use renderer::{
    ComponentMap, FieldComponent, FieldFactory, FieldProps, FormCapabilities, SchemaFormProps,
    SchemaRenderer,
};
pub use slices::{forms_reducer, FormAction, FormsState};
pub use store::{LoggingMiddleware, Middleware, NoopMiddleware, Reducer, Store, StoreWithMiddleware};
pub use validation::{ValidationResult, Validator, ValidatorRegistry};

#[cfg(feature = "poller")]
pub use poller::spawn_event_poller;

// Re-export ratatui types for convenience
pub use ratatui::{layout::Rect, Frame};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::controller::{FormController, SubmitOutcome};
    pub use crate::dispatcher::FormDispatcher;
    pub use crate::event::EventKind;
    pub use crate::model::{CleanModel, FieldState, FormModel, RawModel};
    pub use crate::props::{FormDefinition, FormLayout, FormProps};
    pub use crate::renderer::{
        ComponentMap, FieldComponent, FieldProps, FormCapabilities, SchemaFormProps,
        SchemaRenderer,
    };
    pub use crate::slices::{forms_reducer, FormAction, FormsState};
    pub use crate::store::{LoggingMiddleware, Middleware, Store, StoreWithMiddleware};
    pub use crate::validation::ValidationResult;

    pub use ratatui::{layout::Rect, Frame};
}
