//! Dispatcher capability handed to a form controller
//!
//! [`FormDispatcher`] is the only way a controller reaches the store. It is
//! implemented for the plain and middleware stores over [`FormsState`], and
//! for shared (`Rc<RefCell<_>>`) and borrowed (`&mut _`) handles to them.

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::{FormModel, RawModel};
use crate::slices::{FormAction, FormsState};
use crate::store::{Middleware, Store, StoreWithMiddleware};
use crate::validation::ValidationResult;

/// Create/update/remove/read operations against the keyed form store
///
/// Write methods return `true` if the store changed.
pub trait FormDispatcher {
    fn create_slice(&mut self, id: &str, model: &RawModel) -> bool;

    fn remove_slice(&mut self, id: &str) -> bool;

    fn set_field(&mut self, id: &str, key: &str, result: ValidationResult) -> bool;

    /// Current slice for `id`, or `None` if no slice exists
    fn read_slice(&self, id: &str) -> Option<FormModel>;
}

fn create_action(id: &str, model: &RawModel) -> FormAction {
    FormAction::CreateSchemaFormStore {
        id: id.to_string(),
        model: model.clone(),
    }
}

fn remove_action(id: &str) -> FormAction {
    FormAction::RemoveSchemaFormStore { id: id.to_string() }
}

fn set_action(id: &str, key: &str, result: ValidationResult) -> FormAction {
    FormAction::SetSchemaFormData {
        id: id.to_string(),
        key: key.to_string(),
        result,
    }
}

impl FormDispatcher for Store<FormsState, FormAction> {
    fn create_slice(&mut self, id: &str, model: &RawModel) -> bool {
        self.dispatch(create_action(id, model))
    }

    fn remove_slice(&mut self, id: &str) -> bool {
        self.dispatch(remove_action(id))
    }

    fn set_field(&mut self, id: &str, key: &str, result: ValidationResult) -> bool {
        self.dispatch(set_action(id, key, result))
    }

    fn read_slice(&self, id: &str) -> Option<FormModel> {
        self.state().get(id).cloned()
    }
}

impl<M: Middleware<FormAction>> FormDispatcher for StoreWithMiddleware<FormsState, FormAction, M> {
    fn create_slice(&mut self, id: &str, model: &RawModel) -> bool {
        self.dispatch(create_action(id, model))
    }

    fn remove_slice(&mut self, id: &str) -> bool {
        self.dispatch(remove_action(id))
    }

    fn set_field(&mut self, id: &str, key: &str, result: ValidationResult) -> bool {
        self.dispatch(set_action(id, key, result))
    }

    fn read_slice(&self, id: &str) -> Option<FormModel> {
        self.state().get(id).cloned()
    }
}

impl<D: FormDispatcher + ?Sized> FormDispatcher for &mut D {
    fn create_slice(&mut self, id: &str, model: &RawModel) -> bool {
        (**self).create_slice(id, model)
    }

    fn remove_slice(&mut self, id: &str) -> bool {
        (**self).remove_slice(id)
    }

    fn set_field(&mut self, id: &str, key: &str, result: ValidationResult) -> bool {
        (**self).set_field(id, key, result)
    }

    fn read_slice(&self, id: &str) -> Option<FormModel> {
        (**self).read_slice(id)
    }
}

/// Shared handle, so several controllers can mount against one store
impl<D: FormDispatcher + ?Sized> FormDispatcher for Rc<RefCell<D>> {
    fn create_slice(&mut self, id: &str, model: &RawModel) -> bool {
        self.borrow_mut().create_slice(id, model)
    }

    fn remove_slice(&mut self, id: &str) -> bool {
        self.borrow_mut().remove_slice(id)
    }

    fn set_field(&mut self, id: &str, key: &str, result: ValidationResult) -> bool {
        self.borrow_mut().set_field(id, key, result)
    }

    fn read_slice(&self, id: &str) -> Option<FormModel> {
        self.borrow().read_slice(id)
    }
}
