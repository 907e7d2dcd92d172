//! Form configuration checked at construction time
//!
//! [`FormProps`] can only be obtained through [`FormPropsBuilder::build`], which
//! rejects a missing or empty id, a non-object schema, a missing model, and
//! an empty component map. A mounted controller can therefore rely on every
//! required prop being present.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FormError;
use crate::model::{CleanModel, RawModel};
use crate::renderer::ComponentMap;

/// Completion callback invoked with the cleaned model after a valid submit
pub type SubmitHandler = Box<dyn FnMut(CleanModel)>;

/// Layout descriptor handed to the renderer untouched
///
/// Defaults to the wildcard `["*"]`, meaning "render every schema field".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormLayout(Vec<Value>);

impl Default for FormLayout {
    fn default() -> Self {
        Self::wildcard()
    }
}

impl FormLayout {
    pub fn wildcard() -> Self {
        Self(vec![Value::String("*".to_string())])
    }

    pub fn new(items: Vec<Value>) -> Self {
        Self(items)
    }

    /// Layout listing plain field keys in display order
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(|k| Value::String(k.into())).collect())
    }

    pub fn items(&self) -> &[Value] {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.0.iter().any(|item| item.as_str() == Some("*"))
    }
}

/// Serializable part of a form's props, e.g. loaded from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub id: String,
    pub schema: Value,
    #[serde(default)]
    pub form: FormLayout,
    #[serde(default)]
    pub model: RawModel,
}

impl FormDefinition {
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Start a builder pre-filled with this definition
    pub fn into_builder(self) -> FormPropsBuilder {
        FormProps::builder()
            .id(self.id)
            .schema(self.schema)
            .form(self.form)
            .model(self.model)
    }
}

/// Validated props of a form controller
pub struct FormProps {
    pub(crate) id: String,
    pub(crate) schema: Value,
    pub(crate) form: FormLayout,
    pub(crate) model: RawModel,
    pub(crate) on_submit: Option<SubmitHandler>,
    pub(crate) component_map: ComponentMap,
}

impl fmt::Debug for FormProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormProps")
            .field("id", &self.id)
            .field("form", &self.form)
            .field("model", &self.model)
            .field("on_submit", &self.on_submit.is_some())
            .field("component_map", &self.component_map)
            .finish_non_exhaustive()
    }
}

impl FormProps {
    pub fn builder() -> FormPropsBuilder {
        FormPropsBuilder::default()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn form(&self) -> &FormLayout {
        &self.form
    }

    /// Initial raw model
    pub fn model(&self) -> &RawModel {
        &self.model
    }

    pub fn component_map(&self) -> &ComponentMap {
        &self.component_map
    }

    pub fn has_submit_handler(&self) -> bool {
        self.on_submit.is_some()
    }
}

/// Builder for [`FormProps`]
#[derive(Default)]
pub struct FormPropsBuilder {
    id: Option<String>,
    schema: Option<Value>,
    form: Option<FormLayout>,
    model: Option<RawModel>,
    on_submit: Option<SubmitHandler>,
    component_map: Option<ComponentMap>,
}

impl FormPropsBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn form(mut self, form: FormLayout) -> Self {
        self.form = Some(form);
        self
    }

    pub fn model(mut self, model: RawModel) -> Self {
        self.model = Some(model);
        self
    }

    pub fn on_submit(mut self, handler: impl FnMut(CleanModel) + 'static) -> Self {
        self.on_submit = Some(Box::new(handler));
        self
    }

    pub fn component_map(mut self, component_map: ComponentMap) -> Self {
        self.component_map = Some(component_map);
        self
    }

    pub fn build(self) -> Result<FormProps, FormError> {
        let id = self.id.ok_or(FormError::MissingProp("id"))?;
        if id.trim().is_empty() {
            return Err(FormError::EmptyId);
        }

        let schema = self.schema.ok_or(FormError::MissingProp("schema"))?;
        if !schema.is_object() {
            return Err(FormError::InvalidSchema);
        }

        let model = self.model.ok_or(FormError::MissingProp("model"))?;

        let component_map = self
            .component_map
            .ok_or(FormError::MissingProp("component_map"))?;
        if component_map.is_empty() {
            return Err(FormError::EmptyComponentMap);
        }

        Ok(FormProps {
            id,
            schema,
            form: self.form.unwrap_or_default(),
            model,
            on_submit: self.on_submit,
            component_map,
        })
    }
}
