//! form-dispatch: schema-driven forms bound to a centralized store
//!
//! Each mounted [`FormController`] owns one slice of a Redux-style store,
//! keyed by its form id. Field edits are dispatched as actions, validators are
//! collected from the renderer on every pass, and submission only reaches the
//! completion callback when every field is valid.
//!
//! # Example
//! ```ignore
//! use form_dispatch::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(screaming)]
//! enum AppAction {
//!     Quit,
//!     SubmitDidSucceed(CleanModel),
//! }
//!
//! let store = Rc::new(RefCell::new(StoreWithMiddleware::new(
//!     FormsState::default(),
//!     forms_reducer,
//!     LoggingMiddleware::new(),
//! )));
//! let mut form = FormController::mount(props, Rc::clone(&store));
//! ```

// Re-export everything from core
pub use form_dispatch_core::*;

// Re-export derive macros
pub use form_dispatch_macros::Action;

/// Prelude for convenient imports
pub mod prelude {
    // Traits
    pub use form_dispatch_core::{
        Action, FieldComponent, FormCapabilities, FormDispatcher, Middleware, SchemaRenderer,
    };

    // Forms
    pub use form_dispatch_core::{
        CleanModel, ComponentMap, EventKind, FieldProps, FieldState, FormController,
        FormDefinition, FormError, FormLayout, FormModel, FormProps, RawModel, SchemaFormProps,
        SubmitOutcome, ValidationResult,
    };

    // Store
    pub use form_dispatch_core::{
        forms_reducer, FormAction, FormsState, LoggingMiddleware, NoopMiddleware, Store,
        StoreWithMiddleware,
    };

    // Derive macros
    pub use form_dispatch_macros::Action;

    // Ratatui re-exports
    pub use form_dispatch_core::{Frame, Rect};
}
