use serde_json::Value;

use crate::bindings::{Access, Binding};
use crate::compile::{CompiledSuite, Step, TestCase};
use crate::error::SynthError;

/// Module specifier the caller replaces with the real store path.
pub const STORE_PATH_PLACEHOLDER: &str = "<ADD STORE FILEPATH>";

/// Test-framework idiom the renderer targets: grouping blocks, case blocks,
/// the assertion call, the structural-equality matcher, and the action
/// wrapper. Compilation never looks at these; only rendering does.
#[derive(Debug, Clone)]
pub struct Dialect {
    pub group_fn: String,
    pub case_fn: String,
    pub assert_fn: String,
    pub equality_fn: String,
    pub act_fn: String,
}

impl Dialect {
    /// jest + react-recoil-hooks-testing-library.
    pub fn jest() -> Self {
        Dialect {
            group_fn: "describe".into(),
            case_fn: "it".into(),
            assert_fn: "expect".into(),
            equality_fn: "toStrictEqual".into(),
            act_fn: "act".into(),
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::jest()
    }
}

/// Serialize bindings and compiled cases into a single test-suite source
/// blob: harness setup, then one group each for initial render, selectors,
/// and setters. All-or-nothing: the first unrenderable value aborts the run.
pub fn render(
    bindings: &[Binding],
    suite: &CompiledSuite,
    dialect: &Dialect,
) -> Result<String, SynthError> {
    let mut out = String::new();
    render_header(&mut out, bindings, dialect);
    render_hook(&mut out, bindings);
    render_group(&mut out, dialect, "INITIAL RENDER", &suite.initial_render, true)?;
    out.push('\n');
    render_group(&mut out, dialect, "SELECTORS", &suite.selectors, false)?;
    out.push('\n');
    render_group(&mut out, dialect, "SETTERS", &suite.setters, false)?;
    Ok(out)
}

fn render_header(out: &mut String, bindings: &[Binding], dialect: &Dialect) {
    out.push_str(&format!(
        "import {{ renderRecoilHook, {} }} from 'react-recoil-hooks-testing-library';\n",
        dialect.act_fn
    ));
    out.push_str("import { useRecoilValue, useRecoilState } from 'recoil';\n");
    out.push_str("import {\n");
    for b in bindings {
        out.push_str(&format!("  {},\n", b.key));
    }
    out.push_str(&format!("}} from '{STORE_PATH_PLACEHOLDER}';\n\n"));
    out.push_str("// Suppress 'Batcher' warnings from React / Recoil conflict\n");
    out.push_str("console.error = jest.fn();\n\n");
}

/// The store hook exposes `<key>Value` for every binding and `set<key>` for
/// the read+write ones.
fn render_hook(out: &mut String, bindings: &[Binding]) {
    out.push_str("const useStoreHook = () => {\n");
    for b in bindings {
        match b.access {
            Access::ReadWrite => out.push_str(&format!(
                "  const [{key}Value, set{key}] = useRecoilState({key});\n",
                key = b.key
            )),
            Access::ReadOnly => out.push_str(&format!(
                "  const {key}Value = useRecoilValue({key});\n",
                key = b.key
            )),
        }
    }
    out.push_str("  return {\n");
    for b in bindings {
        out.push_str(&format!("    {}Value,\n", b.key));
        if b.access == Access::ReadWrite {
            out.push_str(&format!("    set{},\n", b.key));
        }
    }
    out.push_str("  };\n};\n\n");
}

fn render_group(
    out: &mut String,
    dialect: &Dialect,
    name: &str,
    cases: &[TestCase],
    shared_harness: bool,
) -> Result<(), SynthError> {
    out.push_str(&format!("{}('{}', () => {{\n", dialect.group_fn, name));
    if shared_harness {
        out.push_str("  const { result } = renderRecoilHook(useStoreHook);\n");
    }
    for (i, case) in cases.iter().enumerate() {
        if i > 0 || shared_harness {
            out.push('\n');
        }
        render_case(out, dialect, case, shared_harness)?;
    }
    out.push_str("});\n");
    Ok(())
}

fn render_case(
    out: &mut String,
    dialect: &Dialect,
    case: &TestCase,
    shared_harness: bool,
) -> Result<(), SynthError> {
    out.push_str(&format!(
        "  {}('{}', () => {{\n",
        dialect.case_fn, case.description
    ));
    if !shared_harness {
        out.push_str("    const { result } = renderRecoilHook(useStoreHook);\n");
    }
    // Consecutive steps of one kind share an action scope, so a setter case
    // seeds in one block and triggers in a second.
    for run in step_runs(&case.steps) {
        out.push_str(&format!("    {}(() => {{\n", dialect.act_fn));
        for step in run {
            let (key, value) = match step {
                Step::Set { key, value } | Step::Invoke { key, value } => (key, value),
            };
            out.push_str(&format!(
                "      result.current.set{}({});\n",
                key,
                literal(value, key, &case.description)?
            ));
        }
        out.push_str("    });\n");
    }
    for a in &case.assertions {
        out.push_str(&format!(
            "    {}(result.current.{}Value).{}({});\n",
            dialect.assert_fn,
            a.key,
            dialect.equality_fn,
            literal(&a.expected, &a.key, &case.description)?
        ));
    }
    out.push_str("  });\n");
    Ok(())
}

fn step_runs(steps: &[Step]) -> Vec<&[Step]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..steps.len() {
        if std::mem::discriminant(&steps[i]) != std::mem::discriminant(&steps[i - 1]) {
            runs.push(&steps[start..i]);
            start = i;
        }
    }
    if start < steps.len() {
        runs.push(&steps[start..]);
    }
    runs
}

/// Embed a captured value as a compact JSON literal, so the generated
/// assertion reproduces the input bit-exactly.
fn literal(value: &Value, key: &str, case: &str) -> Result<String, SynthError> {
    serde_json::to_string(value).map_err(|e| SynthError::NonSerializable {
        key: key.to_string(),
        case: case.to_string(),
        msg: e.to_string(),
    })
}
