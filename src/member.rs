//! Member model: candidate members reported by the enumerator and the
//! concretely resolved members located by introspection.
//!
//! A logical property can surface through up to three raw forms (an accessor
//! method, a field, a constructor/factory parameter); the enumerator picks
//! one primary form per canonical internal name and reports it as a
//! [`CandidateMember`]. The engine then correlates that raw form with the
//! introspector's resolved members by structural equality.

use serde_json::Value;

use crate::types::{AllowableValues, TypeDescriptor};

/// Erased method signature used for structural accessor matching.
///
/// Generic substitution can produce distinct-but-equivalent method objects,
/// so accessor lookup compares signatures by value, never by identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub name: String,
    /// Erased parameter type names, in order.
    pub param_types: Vec<String>,
    /// Erased return type name ("()" for setters).
    pub return_type: String,
}

impl MethodRef {
    /// A getter-shaped reference: no parameters, returns `value_type`.
    pub fn getter(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_types: Vec::new(),
            return_type: value_type.into(),
        }
    }

    /// A setter-shaped reference: one parameter of `value_type`, returns unit.
    pub fn setter(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_types: vec![value_type.into()],
            return_type: "()".to_string(),
        }
    }
}

/// Signature of a constructor or designated factory method, compared by
/// value when locating the factory a parameter member belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FactorySignature {
    /// Name of the owning type (or factory function).
    pub owner: String,
    /// Erased parameter type names, in order.
    pub param_types: Vec<String>,
}

/// Reference to one parameter of a constructor/factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRef {
    pub factory: FactorySignature,
    /// Zero-based position in the factory's parameter list.
    pub index: usize,
}

/// The raw member backing a candidate property.
///
/// Closed variant set: the engine dispatches exhaustively, so a new discovery
/// strategy cannot silently fall through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawMember {
    /// Accessor method, matched structurally against introspected accessors.
    Accessor(MethodRef),
    /// Field, matched by exact name.
    Field(String),
    /// Constructor/factory parameter, matched by owning signature and index.
    Parameter(ParameterRef),
}

/// Flatten directive on a member: the value type's own properties are spliced
/// into the enclosing type's property list instead of one nested property.
///
/// The optional prefix/suffix are applied by the naming resolver to every
/// flattened child, to keep renamed children from colliding with the parent's
/// own properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unwrap {
    pub prefix: String,
    pub suffix: String,
}

impl Unwrap {
    /// Flatten without renaming children.
    pub fn bare() -> Self {
        Self::default()
    }

    /// Flatten and prefix every child name.
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: String::new(),
        }
    }

    /// Flatten with both a prefix and a suffix on child names.
    pub fn with_affixes(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

/// Bean-property metadata attached to a candidate member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMeta {
    /// Explicit rename; the naming resolver prefers this over the internal name.
    pub explicit_name: Option<String>,
    pub description: Option<String>,
    pub required: bool,
    /// Declaration-order position when known.
    pub position: Option<u32>,
    pub allowable_values: Option<AllowableValues>,
    pub example: Option<Value>,
    /// Pre-hidden directive. Only honored for field-backed properties; the
    /// accessor and parameter builders force visibility.
    pub hidden: bool,
}

/// One logical property as reported by the member enumerator.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMember {
    /// Canonical internal name correlating the accessor/field/parameter views
    /// of this property. Also the field-lookup key.
    pub internal_name: String,
    /// Set when the member's value type should be flattened into the parent.
    pub unwrapped: Option<Unwrap>,
    /// Scope tokens this member is visible under. Empty means unbound, which
    /// passes only while no scope restriction is active.
    pub views: Vec<String>,
    pub member: RawMember,
    pub meta: PropertyMeta,
}

impl CandidateMember {
    pub fn new(internal_name: impl Into<String>, member: RawMember) -> Self {
        Self {
            internal_name: internal_name.into(),
            unwrapped: None,
            views: Vec::new(),
            member,
            meta: PropertyMeta::default(),
        }
    }

    pub fn is_unwrapped(&self) -> bool {
        self.unwrapped.is_some()
    }
}

/// Accessor method located on a concrete type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccessor {
    /// Raw erased signature, compared against candidate references.
    pub raw: MethodRef,
    /// The property value type: return type for getters, parameter type for
    /// setters.
    pub value_type: TypeDescriptor,
}

/// Field located on a concrete type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub name: String,
    pub value_type: TypeDescriptor,
}

/// One parameter of a resolved constructor/factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParameter {
    pub index: usize,
    pub name: String,
    pub value_type: TypeDescriptor,
}

/// Constructor or designated factory method located on a concrete type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFactory {
    pub signature: FactorySignature,
    pub parameters: Vec<ResolvedParameter>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_ref_shapes() {
        let getter = MethodRef::getter("x", "i32");
        assert!(getter.param_types.is_empty());
        assert_eq!(getter.return_type, "i32");

        let setter = MethodRef::setter("x", "i32");
        assert_eq!(setter.param_types, ["i32"]);
        assert_eq!(setter.return_type, "()");
    }

    #[test]
    fn method_ref_structural_equality() {
        // Two independently built references to the same erased signature
        // must compare equal.
        let a = MethodRef::getter("value", "String");
        let b = MethodRef {
            name: "value".into(),
            param_types: vec![],
            return_type: "String".into(),
        };
        assert_eq!(a, b);
        assert_ne!(a, MethodRef::getter("value", "i32"));
    }

    #[test]
    fn unwrap_affixes() {
        assert_eq!(Unwrap::bare(), Unwrap::default());

        let prefixed = Unwrap::prefixed("addr_");
        assert_eq!(prefixed.prefix, "addr_");
        assert!(prefixed.suffix.is_empty());

        let both = Unwrap::with_affixes("a_", "_z");
        assert_eq!((both.prefix.as_str(), both.suffix.as_str()), ("a_", "_z"));
    }

    #[test]
    fn candidate_defaults() {
        let candidate = CandidateMember::new("x", RawMember::Field("x".into()));
        assert!(!candidate.is_unwrapped());
        assert!(candidate.views.is_empty());
        assert!(!candidate.meta.hidden);
    }
}
