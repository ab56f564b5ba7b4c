//! Visibility-scope (view) matching.
//!
//! Scope tokens form a hierarchy: a token can extend any number of parent
//! tokens, mirroring class/interface view hierarchies. A member restricted to
//! some tokens is included when the active token's reflexive-transitive
//! closure intersects them.

use std::collections::{HashMap, HashSet};

/// Registry of scope-token hierarchies.
///
/// Read-only configuration shared across resolve calls. Tokens never
/// registered are still valid: their closure is just themselves.
#[derive(Debug, Clone, Default)]
pub struct ScopeRegistry {
    extends: HashMap<String, Vec<String>>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `scope` extends the given parent tokens.
    pub fn register(&mut self, scope: impl Into<String>, extends: &[&str]) {
        self.extends
            .entry(scope.into())
            .or_default()
            .extend(extends.iter().map(|s| s.to_string()));
    }

    /// Reflexive-transitive closure of `scope` over the hierarchy.
    ///
    /// Walks outward with an explicit visited set, so diamond and even cyclic
    /// hierarchies terminate.
    pub fn closure(&self, scope: &str) -> HashSet<String> {
        let mut visited = HashSet::new();
        let mut pending = vec![scope.to_string()];
        while let Some(current) = pending.pop() {
            if let Some(parents) = self.extends.get(&current) {
                for parent in parents {
                    if !visited.contains(parent) {
                        pending.push(parent.clone());
                    }
                }
            }
            visited.insert(current);
        }
        visited
    }
}

/// Visibility test for one member.
///
/// With no active scope every member passes. With an active scope, the member
/// passes only when its declared tokens intersect the scope's closure; a
/// member declaring no tokens is excluded.
pub fn member_passes_view(
    views: &[String],
    active_scope: Option<&str>,
    registry: &ScopeRegistry,
) -> bool {
    let Some(scope) = active_scope else {
        return true;
    };
    let expected = registry.closure(scope);
    views.iter().any(|view| expected.contains(view))
}
