//! Core types for property resolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Handle to a fully resolved (generics-substituted) structured type.
///
/// Opaque to the resolution engine: equality is by value and the engine never
/// inspects anything beyond the names. Owned by the caller and cloned into
/// resolved property descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Simple type name (e.g., "Point").
    pub name: String,
    /// Fully qualified name used as the substitution-table key.
    pub qualified_name: String,
}

impl TypeDescriptor {
    /// Create a descriptor whose qualified name equals its simple name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            qualified_name: name.clone(),
            name,
        }
    }

    /// Create a descriptor with distinct simple and qualified names.
    pub fn qualified(name: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualified_name: qualified_name.into(),
        }
    }
}

/// Direction of the resolution.
///
/// Determines whether the type is being resolved as produced output
/// (a return/response model) or consumed input (a request model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Producing output: accessor return types, serialization view.
    Read,
    /// Consuming input: setter/constructor parameters, deserialization view.
    Write,
}

impl Direction {
    /// True when resolving a return/response model.
    pub fn is_return_type(&self) -> bool {
        matches!(self, Direction::Read)
    }
}

/// Documentation output format tag carried through to plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocFormat {
    Swagger2,
    #[default]
    OpenApi3,
}

/// Allowable-values constraint on a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllowableValues {
    /// Closed enumeration of permitted values.
    List(Vec<Value>),
    /// Inclusive numeric range.
    Range { min: f64, max: f64 },
}

/// Context for one resolution subtree.
///
/// Carries the direction, an optional visibility-scope token, the
/// alternate-type substitution table and the documentation format. Contexts
/// form a tree: [`ResolutionContext::from_parent`] builds a child context
/// rooted at an unwrapped member's value type, inheriting everything else.
/// The ancestry of root type names doubles as the unwrap cycle guard.
///
/// Immutable once constructed; one instance flows through one subtree.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    root: TypeDescriptor,
    direction: Direction,
    view: Option<String>,
    alternates: HashMap<String, TypeDescriptor>,
    format: DocFormat,
    ancestry: Vec<String>,
}

impl ResolutionContext {
    /// Create a root context for resolving `root` in the given direction.
    pub fn new(root: TypeDescriptor, direction: Direction) -> Self {
        let ancestry = vec![root.name.clone()];
        Self {
            root,
            direction,
            view: None,
            alternates: HashMap::new(),
            format: DocFormat::default(),
            ancestry,
        }
    }

    /// Build a child context rooted at `root`, inheriting direction, view,
    /// substitutions and format from `parent` and extending the ancestry.
    pub fn from_parent(parent: &Self, root: TypeDescriptor) -> Self {
        let mut ancestry = parent.ancestry.clone();
        ancestry.push(root.name.clone());
        Self {
            root,
            direction: parent.direction,
            view: parent.view.clone(),
            alternates: parent.alternates.clone(),
            format: parent.format,
            ancestry,
        }
    }

    /// Restrict resolution to members visible under the given scope token.
    pub fn with_view(mut self, scope: impl Into<String>) -> Self {
        self.view = Some(scope.into());
        self
    }

    /// Substitute `from` (a qualified type name) with `to` wherever a member
    /// of that type is resolved.
    pub fn with_alternate(mut self, from: impl Into<String>, to: TypeDescriptor) -> Self {
        self.alternates.insert(from.into(), to);
        self
    }

    /// Set the documentation output format.
    pub fn with_format(mut self, format: DocFormat) -> Self {
        self.format = format;
        self
    }

    /// The type this context is rooted at.
    pub fn root(&self) -> &TypeDescriptor {
        &self.root
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// True when resolving a return/response model.
    pub fn is_return_type(&self) -> bool {
        self.direction.is_return_type()
    }

    /// Active visibility-scope token, if any.
    pub fn view(&self) -> Option<&str> {
        self.view.as_deref()
    }

    pub fn format(&self) -> DocFormat {
        self.format
    }

    /// Apply the alternate-type table to `ty`. A single lookup by qualified
    /// name; no chaining.
    pub fn alternate_for(&self, ty: &TypeDescriptor) -> TypeDescriptor {
        self.alternates
            .get(&ty.qualified_name)
            .cloned()
            .unwrap_or_else(|| ty.clone())
    }

    /// True if `ty` is already a root somewhere up this context chain.
    pub fn has_seen(&self, ty: &TypeDescriptor) -> bool {
        self.ancestry.iter().any(|name| name == &ty.name)
    }

    /// Nesting depth of this context (1 for a root context).
    pub fn depth(&self) -> usize {
        self.ancestry.len()
    }

    /// Root type names from the outermost context down to this one.
    pub fn ancestry(&self) -> &[String] {
        &self.ancestry
    }
}
