//! Mutability-classified field diffing.
//!
//! The schema layer declares, per attribute, whether it can change in place;
//! the diff only decides which remote mutations that classification implies.
//! Attributes left unspecified in the desired configuration are wildcards
//! and never produce a change.

use serde_json::Value;

use crate::error::ReconcileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// Changing this attribute requires replacing the entity.
    Immutable,
    /// Changes are sent as partial update calls.
    Mutable,
    /// Server-assigned; read back, never sent.
    Computed,
}

pub struct AttributeSchema {
    pub name: &'static str,
    pub mutability: Mutability,
}

impl AttributeSchema {
    pub const fn new(name: &'static str, mutability: Mutability) -> Self {
        Self { name, mutability }
    }
}

/// One mutable attribute whose desired value differs from the previous
/// state record.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub attribute: &'static str,
    pub previous: Value,
    pub desired: Value,
}

/// Field-level difference between the previous state record and the desired
/// configuration, both as JSON objects.
///
/// Returns the changed mutable attributes, or `NotSupported` as soon as a
/// changed attribute is declared immutable — in that case the caller must
/// not have issued any remote call yet, so replacement stays the host's
/// decision.
pub fn changes(
    schema: &[AttributeSchema],
    previous: &Value,
    desired: &Value,
) -> Result<Vec<Change>, ReconcileError> {
    let mut out = Vec::new();

    for attribute in schema {
        let Some(want) = desired.get(attribute.name) else {
            continue;
        };
        if want.is_null() {
            // Unspecified — wildcard.
            continue;
        }

        let have = previous.get(attribute.name).cloned().unwrap_or(Value::Null);
        if *want == have {
            continue;
        }

        match attribute.mutability {
            Mutability::Computed => {}
            Mutability::Mutable => out.push(Change {
                attribute: attribute.name,
                previous: have,
                desired: want.clone(),
            }),
            Mutability::Immutable => {
                return Err(ReconcileError::NotSupported(format!(
                    "attribute \"{}\" cannot be changed in place; the resource must be replaced",
                    attribute.name
                )));
            }
        }
    }

    Ok(out)
}

/// Whether the change set touches the given attribute.
pub fn touches(changes: &[Change], attribute: &str) -> bool {
    changes.iter().any(|c| c.attribute == attribute)
}
