use anyhow::Result;
use intrinsics_generator::annotate_grammar;
use serde_json::{json, Value};

#[test]
fn annotates_named_operands_and_builtins() -> Result<()> {
    let mut grammar = json!({
        "instructions": [{
            "opname": "OpLoad",
            "operands": [
                { "kind": "IdResultType" },
                { "kind": "IdResult" },
                { "kind": "IdRef", "name": "'Pointer'" },
                { "kind": "MemoryAccess", "quantifier": "?" }
            ]
        }],
        "operand_kinds": [{
            "kind": "BuiltIn",
            "enumerants": [{ "enumerant": "Position", "value": 0 }]
        }]
    });
    let written = annotate_grammar(&mut grammar, "uint32_t")?;
    assert_eq!(written, 3);

    let operands = &grammar["instructions"][0]["operands"];
    assert_eq!(operands[0]["hlsl_type"], json!("uint32_t"));
    assert_eq!(operands[1].get("hlsl_type"), None);
    assert_eq!(operands[2]["hlsl_type"], json!("uint32_t"));
    assert_eq!(operands[3].get("hlsl_type"), None);
    assert_eq!(
        grammar["operand_kinds"][0]["enumerants"][0]["hlsl_type"],
        json!("static const uint32_t")
    );
    Ok(())
}

#[test]
fn rejects_document_without_instructions() {
    let mut grammar: Value = json!({ "operand_kinds": [] });
    assert!(annotate_grammar(&mut grammar, "uint32_t").is_err());
}
