//! Add `hlsl_type` hints to a raw grammar document.
use anyhow::{anyhow, Result};
use serde_json::Value;

const HLSL_TYPE_FIELD: &str = "hlsl_type";

/// Annotate every named (or `IdResultType`) instruction operand with
/// `default_type` and every `BuiltIn` enumerant with `static const
/// <default_type>`. Returns the number of fields written.
pub fn annotate_grammar(grammar: &mut Value, default_type: &str) -> Result<usize> {
    let mut written = 0usize;
    let instructions = grammar
        .get_mut("instructions")
        .and_then(|v| v.as_array_mut())
        .ok_or_else(|| anyhow!("grammar missing instructions array"))?;
    for instruction in instructions {
        let Some(operands) = instruction
            .get_mut("operands")
            .and_then(|v| v.as_array_mut())
        else {
            continue;
        };
        for operand in operands {
            let Some(obj) = operand.as_object_mut() else {
                continue;
            };
            let is_result_type = obj.get("kind").and_then(|v| v.as_str()) == Some("IdResultType");
            if obj.contains_key("name") || is_result_type {
                obj.insert(
                    HLSL_TYPE_FIELD.to_string(),
                    Value::String(default_type.to_string()),
                );
                written += 1;
            }
        }
    }

    let builtin_type = format!("static const {default_type}");
    let builtins = grammar
        .get_mut("operand_kinds")
        .and_then(|v| v.as_array_mut())
        .and_then(|kinds| {
            kinds
                .iter_mut()
                .find(|k| k.get("kind").and_then(|v| v.as_str()) == Some("BuiltIn"))
        })
        .and_then(|k| k.get_mut("enumerants"))
        .and_then(|v| v.as_array_mut());
    if let Some(builtins) = builtins {
        for enumerant in builtins {
            if let Some(obj) = enumerant.as_object_mut() {
                obj.insert(
                    HLSL_TYPE_FIELD.to_string(),
                    Value::String(builtin_type.clone()),
                );
                written += 1;
            }
        }
    }
    Ok(written)
}
