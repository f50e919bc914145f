use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::Schema;

/// One step in a test case's action sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// Write a cell to seed or trigger state.
    Set { key: String, value: Value },
    /// Invoke the setter under test with its recorded argument.
    Invoke { key: String, value: Value },
}

/// One structural-equality assertion against a live cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    pub key: String,
    pub expected: Value,
}

/// A compiled test case: description, ordered steps, then assertions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub description: String,
    pub steps: Vec<Step>,
    pub assertions: Vec<Assertion>,
}

/// Input indices of snapshots and setter cases dropped by the skip rules.
/// Skips are expected no-ops, reported for diagnostics, never errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkipReport {
    pub snapshots: Vec<usize>,
    pub setter_cases: Vec<usize>,
}

impl SkipReport {
    pub fn total(&self) -> usize {
        self.snapshots.len() + self.setter_cases.len()
    }
}

/// The compiled suite, grouped the way the rendered output groups cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledSuite {
    pub initial_render: Vec<TestCase>,
    pub selectors: Vec<TestCase>,
    pub setters: Vec<TestCase>,
    pub skipped: SkipReport,
}

/// Compile every initial expectation, snapshot, and setter case into
/// structured test cases, in input order.
pub fn compile(schema: &Schema) -> CompiledSuite {
    let mut skipped = SkipReport::default();

    let initial_render = schema
        .initial_render
        .iter()
        .map(|exp| TestCase {
            description: format!("{} should initialize correctly", exp.key),
            steps: Vec::new(),
            assertions: vec![Assertion {
                key: exp.key.clone(),
                expected: exp.new_value.clone(),
            }],
        })
        .collect();

    let mut selectors = Vec::new();
    for (i, snap) in schema.snapshots.iter().enumerate() {
        let triggers: Vec<&str> = snap
            .state
            .iter()
            .filter(|e| e.updated)
            .map(|e| e.key.as_str())
            .collect();
        let targets: Vec<&str> = snap.selectors.iter().map(|s| s.key.as_str()).collect();

        // A snapshot with no observed change or no observable effect is not
        // independently testable.
        if triggers.is_empty() || targets.is_empty() {
            skipped.snapshots.push(i);
            continue;
        }

        // The full state list seeds the scenario, context entries included.
        let steps = snap
            .state
            .iter()
            .map(|e| Step::Set {
                key: e.key.clone(),
                value: e.value.clone(),
            })
            .collect();
        let assertions = snap
            .selectors
            .iter()
            .map(|s| Assertion {
                key: s.key.clone(),
                expected: s.new_value.clone(),
            })
            .collect();

        selectors.push(TestCase {
            description: selector_description(&targets, &triggers),
            steps,
            assertions,
        });
    }

    let mut setters = Vec::new();
    for (i, case) in schema.setters.iter().enumerate() {
        let Some(invocation) = &case.setter else {
            skipped.setter_cases.push(i);
            continue;
        };

        // Seed prior state in input order, then the triggering call. A setter
        // whose target also appears in the seeds writes that cell twice,
        // seed first.
        let mut steps: Vec<Step> = case
            .state
            .iter()
            .map(|e| Step::Set {
                key: e.key.clone(),
                value: e.previous.clone().unwrap_or(Value::Null),
            })
            .collect();
        steps.push(Step::Invoke {
            key: invocation.key.clone(),
            value: invocation.new_value.clone(),
        });

        // Post-update expectations come from `value`, not `previous`.
        let assertions = case
            .state
            .iter()
            .filter(|e| e.updated)
            .map(|e| Assertion {
                key: e.key.clone(),
                expected: e.value.clone(),
            })
            .collect();

        setters.push(TestCase {
            description: format!("{} should properly set state", invocation.key),
            steps,
            assertions,
        });
    }

    CompiledSuite {
        initial_render,
        selectors,
        setters,
        skipped,
    }
}

fn selector_description(targets: &[&str], triggers: &[&str]) -> String {
    let subject = join_with_conjunction(targets, "and");
    let trigger = if triggers.len() == 1 {
        format!("{} updates", triggers[0])
    } else {
        format!("{} update", join_with_conjunction(triggers, "and"))
    };
    format!("{subject} should properly derive state when {trigger}")
}

/// Join items with `", "`, prefixing the final item with the conjunction when
/// there is more than one: `["a"]` joins as `"a"`, `["a", "b"]` as
/// `"a, and b"`, `["a", "b", "c"]` as `"a, b, and c"`.
pub fn join_with_conjunction(items: &[&str], conjunction: &str) -> String {
    match items {
        [] => String::new(),
        [only] => (*only).to_string(),
        _ => {
            let mut out = String::new();
            for (i, item) in items.iter().enumerate() {
                if i == items.len() - 1 {
                    out.push_str(conjunction);
                    out.push(' ');
                    out.push_str(item);
                } else {
                    out.push_str(item);
                    out.push_str(", ");
                }
            }
            out
        }
    }
}
