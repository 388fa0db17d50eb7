#[path = "common/mod.rs"]
mod common;

#[path = "generate/generate_scenarios.rs"]
mod generate_scenarios;
#[path = "generate/generate_policy.rs"]
mod generate_policy;
#[path = "generate/generate_templates.rs"]
mod generate_templates;

#[path = "expand/expand_numeric.rs"]
mod expand_numeric;
#[path = "expand/expand_shapes.rs"]
mod expand_shapes;

#[path = "typemap/typemap_load.rs"]
mod typemap_load;
#[path = "typemap/typemap_resolve.rs"]
mod typemap_resolve;

#[path = "naming/naming_sanitize.rs"]
mod naming_sanitize;

#[path = "grammar/grammar_load.rs"]
mod grammar_load;
#[path = "grammar/grammar_annotate.rs"]
mod grammar_annotate;
