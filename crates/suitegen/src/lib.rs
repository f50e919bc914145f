pub mod schema;
pub mod bindings;
pub mod compile;
pub mod render;
pub mod error;

pub use error::SynthError;
pub use render::Dialect;

use bindings::Binding;
use compile::SkipReport;
use schema::Schema;

/// Output of one synthesis run.
#[derive(Debug, Clone)]
pub struct Synthesis {
    /// The complete test-suite source.
    pub source: String,
    /// Every cell the generated harness exposes, in first-seen order.
    pub bindings: Vec<Binding>,
    /// Snapshots and setter cases dropped by the skip rules.
    pub skipped: SkipReport,
}

/// Synthesize a test suite in the default jest dialect.
pub fn synthesize(schema: &Schema) -> Result<Synthesis, SynthError> {
    synthesize_with(schema, &Dialect::default())
}

/// Synthesize a test suite targeting a specific framework dialect.
pub fn synthesize_with(schema: &Schema, dialect: &Dialect) -> Result<Synthesis, SynthError> {
    schema::validate(schema)?;
    let bindings = bindings::collect(schema);
    let suite = compile::compile(schema);
    let source = render::render(&bindings, &suite, dialect)?;
    Ok(Synthesis {
        source,
        bindings,
        skipped: suite.skipped,
    })
}
