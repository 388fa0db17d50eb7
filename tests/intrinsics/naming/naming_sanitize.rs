use intrinsics_generator::sanitize::{
    escape_reserved, function_name, generic_names, param_name, strip_name,
};

#[test]
fn strip_removes_grammar_quoting() {
    assert_eq!(strip_name("'Resident Code'"), "ResidentCode");
    assert_eq!(strip_name("'Ray-Flags'"), "Ray_Flags");
    assert_eq!(strip_name("'Operand 1'"), "Operand1");
    assert_eq!(strip_name("'Image Operands', +\n'Sample'"), "ImageOperandsSample");
}

#[test]
fn param_names_are_lower_camel_and_escaped() {
    assert_eq!(param_name("'Pointer'"), "pointer");
    assert_eq!(param_name("'Default'"), "_default");
    assert_eq!(param_name("'Sample'"), "_sample");
    assert_eq!(escape_reserved("3D"), "_3D");
    assert_eq!(escape_reserved("value"), "value");
}

#[test]
fn function_names_drop_op_prefix() {
    assert_eq!(function_name("OpAtomicIAdd"), "atomicIAdd");
    assert_eq!(function_name("OpGroupNonUniformElect"), "groupNonUniformElect");
    assert_eq!(function_name("OpSNegate"), "sNegate");
}

#[test]
fn generic_extraction_finds_standalone_letters() {
    assert_eq!(
        generic_names("[[ns::ext<W,uint32_t>]] const ptr_T&"),
        vec!["W".to_string()]
    );
    assert_eq!(
        generic_names("pointer_t<spv::StorageClassPhysicalStorageBuffer, T>"),
        vec!["T".to_string()]
    );
    assert_eq!(generic_names("vector<T, N> T"), vec!["T".to_string(), "N".to_string()]);
    assert!(generic_names("uint32_t4").is_empty());
}
