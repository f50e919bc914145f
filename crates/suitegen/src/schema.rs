use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SynthError;

/// A store cell with both a live value and a setter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WritableCell {
    pub key: String,
}

/// A derived, read-only store cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadableCell {
    pub key: String,
}

/// Expected value of a cell immediately after harness construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialExpectation {
    pub key: String,
    pub new_value: Value,
}

/// One recorded state write inside a snapshot or setter case.
///
/// `updated` marks the writes that changed in the scenario (and are asserted
/// after the trigger); the rest are context-only seeds. `previous` is the
/// prior value a setter case restores before invoking the setter under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateEntry {
    pub key: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub updated: bool,
    #[serde(default)]
    pub previous: Option<Value>,
}

/// Expected derived value after a snapshot's state is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorExpectation {
    pub key: String,
    pub new_value: Value,
}

/// One recorded "apply inputs, observe derived outputs" scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub state: Vec<StateEntry>,
    #[serde(default)]
    pub selectors: Vec<SelectorExpectation>,
}

/// The triggering call of a setter case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetterInvocation {
    pub key: String,
    pub new_value: Value,
}

/// One recorded direct invocation of a setter. A `None` setter means the
/// capture produced no independent setter test for this binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetterCase {
    #[serde(default)]
    pub state: Vec<StateEntry>,
    #[serde(default)]
    pub setter: Option<SetterInvocation>,
}

/// A complete captured store description: the input to one synthesis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default)]
    pub writables: Vec<WritableCell>,
    #[serde(default)]
    pub readables: Vec<ReadableCell>,
    #[serde(default)]
    pub initial_render: Vec<InitialExpectation>,
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
    #[serde(default)]
    pub setters: Vec<SetterCase>,
}

/// Eager structural validation. Keys become raw property names in the
/// rendered suite, so every key must be a non-empty identifier; setter-case
/// seeds must carry a `previous` value. Cross-references between cases and
/// cells are trusted, not checked.
pub fn validate(schema: &Schema) -> Result<(), SynthError> {
    for (i, w) in schema.writables.iter().enumerate() {
        check_key(&w.key, &format!("writables[{i}]"))?;
    }
    for (i, r) in schema.readables.iter().enumerate() {
        check_key(&r.key, &format!("readables[{i}]"))?;
    }
    for (i, exp) in schema.initial_render.iter().enumerate() {
        check_key(&exp.key, &format!("initialRender[{i}]"))?;
    }
    for (i, snap) in schema.snapshots.iter().enumerate() {
        for (j, entry) in snap.state.iter().enumerate() {
            check_key(&entry.key, &format!("snapshots[{i}].state[{j}]"))?;
        }
        for (j, sel) in snap.selectors.iter().enumerate() {
            check_key(&sel.key, &format!("snapshots[{i}].selectors[{j}]"))?;
        }
    }
    for (i, case) in schema.setters.iter().enumerate() {
        for (j, entry) in case.state.iter().enumerate() {
            let context = format!("setters[{i}].state[{j}]");
            check_key(&entry.key, &context)?;
            if entry.previous.is_none() {
                return Err(SynthError::MalformedSchema {
                    context,
                    msg: "missing required field 'previous'".into(),
                });
            }
        }
        if let Some(setter) = &case.setter {
            check_key(&setter.key, &format!("setters[{i}].setter"))?;
        }
    }
    Ok(())
}

fn check_key(key: &str, context: &str) -> Result<(), SynthError> {
    let mut chars = key.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$');
    let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if key.is_empty() {
        return Err(SynthError::MalformedSchema {
            context: context.to_string(),
            msg: "empty key".into(),
        });
    }
    if !head_ok || !tail_ok {
        return Err(SynthError::MalformedSchema {
            context: context.to_string(),
            msg: format!("key '{key}' is not an identifier"),
        });
    }
    Ok(())
}
