//! Procedural macros for form-dispatch

use darling::{FromDeriveInput, FromVariant};
use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::quote;
use std::collections::HashMap;
use syn::{parse_macro_input, DeriveInput};

/// Container-level attributes for #[derive(Action)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct ActionOpts {
    ident: syn::Ident,
    data: darling::ast::Data<ActionVariant, ()>,

    /// Derive names as SCREAMING_SNAKE_CASE (`SetData` -> `SET_DATA`)
    #[darling(default)]
    screaming: bool,

    /// Prefix prepended to every derived name (`"form/"` -> `form/SetData`)
    #[darling(default)]
    prefix: Option<String>,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(action))]
struct ActionVariant {
    ident: syn::Ident,
    fields: darling::ast::Fields<()>,

    /// Explicit action type, used verbatim
    #[darling(default)]
    name: Option<String>,
}

/// Convert PascalCase to SCREAMING_SNAKE_CASE
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() && i > 0 {
            result.push('_');
        }
        result.extend(ch.to_uppercase());
    }
    result
}

/// Derive macro for the Action trait
///
/// Generates a `name()` method returning the action type as a static string.
/// By default the type is the variant name. Container options:
/// - `#[action(screaming)]` derives `SET_SCHEMA_FORM_DATA` from `SetSchemaFormData`
/// - `#[action(prefix = "form/")]` prepends a namespace to every derived name
///
/// A variant can set its type outright with `#[action(name = "...")]`.
/// Two variants resolving to the same type is a compile error.
///
/// # Example
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// #[action(screaming)]
/// enum AppAction {
///     FormSubmit,
///     #[action(name = "app/quit")]
///     Quit,
/// }
///
/// assert_eq!(AppAction::FormSubmit.name(), "FORM_SUBMIT");
/// assert_eq!(AppAction::Quit.name(), "app/quit");
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ActionOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;

    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let mut seen: HashMap<String, &Ident> = HashMap::new();
    let mut name_arms = Vec::with_capacity(variants.len());

    for v in variants.iter() {
        let variant_name = &v.ident;
        let action_type = match &v.name {
            Some(explicit) => explicit.clone(),
            None => {
                let base = if opts.screaming {
                    to_screaming_snake_case(&variant_name.to_string())
                } else {
                    variant_name.to_string()
                };
                format!("{}{}", opts.prefix.as_deref().unwrap_or(""), base)
            }
        };

        if let Some(previous) = seen.insert(action_type.clone(), variant_name) {
            return syn::Error::new_spanned(
                variant_name,
                format!(
                    "action type `{}` is already used by variant `{}`",
                    action_type, previous
                ),
            )
            .to_compile_error()
            .into();
        }

        let arm = match &v.fields.style {
            darling::ast::Style::Unit => quote! {
                #name::#variant_name => #action_type
            },
            darling::ast::Style::Tuple => quote! {
                #name::#variant_name(..) => #action_type
            },
            darling::ast::Style::Struct => quote! {
                #name::#variant_name { .. } => #action_type
            },
        };
        name_arms.push(arm);
    }

    let expanded = quote! {
        impl form_dispatch::Action for #name {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }
        }
    };

    TokenStream::from(expanded)
}
