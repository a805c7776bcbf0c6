//! Descriptor-registry binder.
//!
//! A record describes its fields once by implementing [`Bind`]. Binding walks
//! those declarations depth-first in registration order, keeping a
//! [`FieldPath`] of the current position. Each leaf yields a deferred loader
//! keyed by its dotted lookup key and, when the leaf declares a flag alias,
//! a flag named by the `-`-joined alias chain.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use triconf::{Bind, BindError, FieldDecl, Fields};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! struct Log {
//!     level: String,
//! }
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! struct Config {
//!     port: u16,
//!     log: Log,
//! }
//!
//! impl Bind for Log {
//!     fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
//!         fields.leaf(FieldDecl::new("level").flag("level", None), |l| &mut l.level)?;
//!         Ok(())
//!     }
//! }
//!
//! impl Bind for Config {
//!     fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
//!         fields
//!             .leaf(FieldDecl::new("port").flag("port", Some('p')), |c| &mut c.port)?
//!             .record(FieldDecl::new("log").flag("log", None), |c| &mut c.log)?;
//!         Ok(())
//!     }
//! }
//! ```

mod decl;
mod leaf;
mod registry;

use std::sync::Arc;

use crate::annotation::FieldOptions;
use crate::error::{BindError, ConversionError};
use crate::path::{FieldNames, FieldPath};
use crate::merge::merge_value;
use crate::scalar::ValueKind;

pub use decl::FieldDecl;
pub use leaf::Leaf;
pub use registry::FlagSpec;
pub(crate) use registry::{FieldBinding, Registry};

/// Projection from the root record to a nested value.
type Access<R, T> = Arc<dyn for<'a> Fn(&'a mut R) -> &'a mut T + Send + Sync>;

fn access_fn<R, T, F>(f: F) -> F
where
    F: for<'a> Fn(&'a mut R) -> &'a mut T,
{
    f
}

fn identity<R: 'static>() -> Access<R, R> {
    Arc::new(access_fn(|root: &mut R| root))
}

fn compose<R, T, U, A>(parent: Access<R, T>, child: A) -> Access<R, U>
where
    R: 'static,
    T: 'static,
    U: 'static,
    A: for<'a> Fn(&'a mut T) -> &'a mut U + Send + Sync + 'static,
{
    Arc::new(access_fn(move |root: &mut R| child(parent(root))))
}

/// A record whose fields can be registered with the binder.
pub trait Bind: Sized + 'static {
    /// Register every field of `Self`, in declaration order.
    ///
    /// # Errors
    ///
    /// Propagates the first [`BindError`] raised by a registration.
    fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError>;
}

pub(crate) struct BindContext<R> {
    path: FieldPath,
    env_prefix: String,
    registry: Registry<R>,
}

/// Registration handle for the fields of `T`, nested somewhere inside the
/// bound root `R`.
pub struct Fields<'a, R, T> {
    ctx: &'a mut BindContext<R>,
    root: &'a mut R,
    access: Access<R, T>,
}

impl<R: 'static, T: 'static> Fields<'_, R, T> {
    /// Register a leaf field.
    ///
    /// # Errors
    ///
    /// Fails when the leaf's kind is unsupported, its annotations do not
    /// parse, or its flag collides with an earlier one.
    pub fn leaf<L, A>(&mut self, decl: FieldDecl, access: A) -> Result<&mut Self, BindError>
    where
        L: Leaf,
        A: for<'x> Fn(&'x mut T) -> &'x mut L + Send + Sync + 'static,
    {
        let full = compose(Arc::clone(&self.access), access);
        self.visit(decl, |fields, decl, options| {
            fields.register_leaf::<L>(decl, options, full)
        })?;
        Ok(self)
    }

    /// Register a nested record and all of its fields.
    ///
    /// # Errors
    ///
    /// Propagates failures from the nested record's fields.
    pub fn record<U, A>(&mut self, decl: FieldDecl, access: A) -> Result<&mut Self, BindError>
    where
        U: Bind,
        A: for<'x> Fn(&'x mut T) -> &'x mut U + Send + Sync + 'static,
    {
        let full = compose(Arc::clone(&self.access), access);
        self.visit(decl, |fields, _, _| fields.descend::<U>(full))?;
        Ok(self)
    }

    /// Register an optional nested record, allocating its default when it is
    /// `None`.
    ///
    /// # Errors
    ///
    /// Propagates failures from the nested record's fields.
    pub fn optional_record<U, A>(
        &mut self,
        decl: FieldDecl,
        access: A,
    ) -> Result<&mut Self, BindError>
    where
        U: Bind + Default,
        A: for<'x> Fn(&'x mut T) -> &'x mut Option<U> + Send + Sync + 'static,
    {
        let parent = Arc::clone(&self.access);
        let full: Access<R, U> = Arc::new(access_fn(move |root: &mut R| {
            access(parent(root)).get_or_insert_with(U::default)
        }));
        self.visit(decl, |fields, _, _| fields.descend::<U>(full))?;
        Ok(self)
    }

    /// Push the field's names, run `register`, and pop again whatever the
    /// outcome.
    fn visit<F>(&mut self, decl: FieldDecl, register: F) -> Result<(), BindError>
    where
        F: FnOnce(&mut Self, FieldDecl, FieldOptions) -> Result<(), BindError>,
    {
        let options = decl.resolve().map_err(|source| BindError::Annotation {
            type_name: self.ctx.registry.type_name,
            path: self.child_path(decl.ident()),
            source,
        })?;
        let alias = options.flag.as_ref().map(|f| f.name.as_str());
        self.ctx
            .path
            .push(FieldNames::new(decl.ident(), decl.rename_ref(), alias));
        let result = register(self, decl, options);
        self.ctx.path.pop();
        result
    }

    fn child_path(&self, ident: &str) -> String {
        let parent = self.ctx.path.lookup_key();
        if parent.is_empty() {
            ident.to_owned()
        } else {
            format!("{parent}.{ident}")
        }
    }

    fn descend<U: Bind>(&mut self, access: Access<R, U>) -> Result<(), BindError> {
        let mut nested = Fields {
            ctx: &mut *self.ctx,
            root: &mut *self.root,
            access,
        };
        U::bind(&mut nested)
    }

    fn register_leaf<L: Leaf>(
        &mut self,
        decl: FieldDecl,
        options: FieldOptions,
        access: Access<R, L>,
    ) -> Result<(), BindError> {
        let path = &self.ctx.path;
        if let ValueKind::Unsupported(kind) = L::KIND {
            return Err(BindError::Unbindable {
                type_name: self.ctx.registry.type_name,
                path: path.lookup_key(),
                kind,
            });
        }
        let key = path.lookup_key();
        let env_var = path.env_var(&self.ctx.env_prefix);
        // Only a leaf with its own alias surfaces as a flag.
        let flag = options
            .flag
            .filter(|alias| !alias.name.is_empty())
            .and_then(|alias| {
                path.flag_key().map(|name| FlagSpec {
                    name,
                    shorthand: alias.shorthand,
                    help: decl.into_doc(),
                })
            });
        access(self.root).prepare();
        let reader = Arc::clone(&access);
        self.ctx.registry.register(FieldBinding {
            key,
            env_var,
            flag,
            kind: L::KIND,
            validations: options.validations,
            apply: applier::<R, L>(access),
            read: Arc::new(move |root: &mut R| serde_json::to_value(&*reader(root)).ok()),
        })
    }
}

/// Assign a store value to the leaf. Map leaves keep keys the value does not
/// mention, matching the file overlay of generated loaders.
fn applier<R: 'static, L: Leaf>(access: Access<R, L>) -> registry::Applier<R> {
    Arc::new(move |root: &mut R, value: serde_json::Value| {
        let slot = access(root);
        let value = if matches!(L::KIND, ValueKind::Map) {
            let mut current = serde_json::to_value(&*slot).map_err(json_error::<L>(&value))?;
            merge_value(&mut current, value);
            current
        } else {
            value
        };
        *slot = L::deserialize(&value).map_err(json_error::<L>(&value))?;
        Ok(())
    })
}

fn json_error<L>(
    value: &serde_json::Value,
) -> impl FnOnce(serde_json::Error) -> ConversionError + '_ {
    move |source| ConversionError::Json {
        value: value.to_string(),
        target: std::any::type_name::<L>(),
        source,
    }
}

/// Register every field of `record`, allocating optional values on the way.
pub(crate) fn bind_record<R: Bind>(
    record: &mut R,
    env_prefix: &str,
) -> Result<Registry<R>, BindError> {
    let mut ctx = BindContext {
        path: FieldPath::new(),
        env_prefix: env_prefix.to_owned(),
        registry: Registry::new(),
    };
    let mut fields = Fields {
        ctx: &mut ctx,
        root: record,
        access: identity(),
    };
    R::bind(&mut fields)?;
    Ok(ctx.registry)
}

#[cfg(test)]
mod tests;
