use anyhow::Result;
use intrinsics_generator::numeric::{
    capability_admits, find_discriminator, strip_discriminator, TypeClass,
};
use intrinsics_generator::{expand, ExpandRequest, Expansion, TypeMap, TypeResolver};

use crate::common::instruction;

#[test]
fn discriminator_letters() {
    let add = find_discriminator("atomicIAdd");
    assert_eq!(add.map(|d| (d.class, d.position)), Some((TypeClass::Integer, 6)));
    assert_eq!(
        find_discriminator("groupNonUniformFMul").map(|d| d.class),
        Some(TypeClass::Float)
    );
    assert_eq!(
        find_discriminator("atomicSMin").map(|d| d.class),
        Some(TypeClass::Signed)
    );
    assert_eq!(find_discriminator("controlBarrier"), None);
    assert_eq!(find_discriminator("beginInvocationInterlockEXT"), None);
}

#[test]
fn stripping_is_pure() {
    let name = "atomicUMax".to_string();
    let Some(d) = find_discriminator(&name) else {
        panic!("expected discriminator");
    };
    assert_eq!(strip_discriminator(&name, d), "atomicMax");
    assert_eq!(name, "atomicUMax");
}

#[test]
fn width_capabilities_admit_matching_types() {
    assert!(capability_admits("AtomicFloat16AddEXT", "float16_t"));
    assert!(!capability_admits("AtomicFloat16AddEXT", "float32_t"));
    assert!(capability_admits("Int64Atomics", "uint64_t"));
    assert!(!capability_admits("Int64Atomics", "int32_t"));
    assert!(capability_admits("GroupNonUniformArithmetic", "int16_t"));
    assert!(!capability_admits("Float64", ""));
}

#[test]
fn unsigned_mnemonic_expands_to_unsigned_types() -> Result<()> {
    let inst = instruction(
        r#"{"opname":"OpAtomicUMax","class":"Atomic","opcode":239,"operands":[
            {"kind":"IdResultType"},{"kind":"IdResult"},
            {"kind":"IdRef","name":"'Pointer'"},
            {"kind":"IdScope","name":"'Memory'"},
            {"kind":"IdMemorySemantics","name":"'Semantics'"},
            {"kind":"IdRef","name":"'Value'"}]}"#,
    )?;
    let type_map = TypeMap::embedded()?;
    let resolver = TypeResolver::new(&type_map);
    let Expansion::Declarations(decls) = expand(&inst, &ExpandRequest::default(), &resolver)? else {
        panic!("expected declarations");
    };
    let results: Vec<&str> = decls.iter().map(|d| d.result.as_str()).collect();
    assert_eq!(results, vec!["uint16_t", "uint32_t", "uint64_t"]);
    assert!(decls.iter().all(|d| d.name == "atomicMax"));
    assert_eq!(decls[0].capabilities, vec!["Int16".to_string()]);
    Ok(())
}

#[test]
fn class_type_class_applies_without_discriminator() -> Result<()> {
    let inst = instruction(
        r#"{"opname":"OpBitCount","class":"Bit","opcode":205,"operands":[
            {"kind":"IdResultType"},{"kind":"IdResult"},
            {"kind":"IdRef","name":"'Base'"}]}"#,
    )?;
    let type_map = TypeMap::embedded()?;
    let resolver = TypeResolver::new(&type_map);
    let request = ExpandRequest {
        type_class: Some(TypeClass::Integer),
        ..ExpandRequest::default()
    };
    let Expansion::Declarations(decls) = expand(&inst, &request, &resolver)? else {
        panic!("expected declarations");
    };
    assert_eq!(decls.len(), 6);
    assert_eq!(
        decls[1].render(),
        "[[vk::ext_instruction(spv::OpBitCount)]]\nint32_t bitCount(int32_t base);\n\n"
    );
    Ok(())
}
