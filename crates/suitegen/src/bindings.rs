use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// How the harness exposes one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    /// Live value plus setter.
    ReadWrite,
    /// Live value only.
    ReadOnly,
}

/// One harness-exposed cell, deduplicated across the whole schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Binding {
    pub key: String,
    pub access: Access,
}

/// Collect the live bindings the harness must expose, in first-seen order.
///
/// Writables bind read+write. Setter targets bind read+write next, so a
/// setter target that is also a readable cell is never double-bound as
/// read-only below. Remaining readables bind read-only. Access is the kind
/// assigned at first encounter; it is never downgraded.
pub fn collect(schema: &Schema) -> Vec<Binding> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut bindings = Vec::new();

    for w in &schema.writables {
        if seen.insert(&w.key) {
            bindings.push(Binding {
                key: w.key.clone(),
                access: Access::ReadWrite,
            });
        }
    }
    for case in &schema.setters {
        if let Some(setter) = &case.setter {
            if seen.insert(&setter.key) {
                bindings.push(Binding {
                    key: setter.key.clone(),
                    access: Access::ReadWrite,
                });
            }
        }
    }
    for r in &schema.readables {
        if seen.insert(&r.key) {
            bindings.push(Binding {
                key: r.key.clone(),
                access: Access::ReadOnly,
            });
        }
    }
    bindings
}
