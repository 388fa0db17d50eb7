use anyhow::{anyhow, Result};
use intrinsics_generator::{GenerateOptions, SkipReason, TypeMap};
use pretty_assertions::assert_eq;

use crate::common::{data_path, generate_mini, generate_with, instructions_section, load_grammar};

#[test]
fn bitcast_is_templated_without_capability() -> Result<()> {
    let grammar = load_grammar("bitcast_grammar.json")?;
    let type_map = TypeMap::load(data_path("bitcast_type_map.json"))?;
    let generated = generate_with(&grammar, &type_map, GenerateOptions::default())?;

    let instructions = instructions_section(&generated.text)?;
    assert_eq!(
        instructions,
        "template<typename T, typename U>\n\
         [[vk::ext_instruction(spv::OpBitcast)]]\n\
         enable_if_t<sizeof(T) == sizeof(U) && (is_spirv_type_v<T> || is_vector_v<T>), T> bitcast(U operand);\n\n\
         }\n\n#endif\n}\n}\n\n#endif\n"
    );
    assert!(!instructions.contains("vk::ext_capability"));
    assert_eq!(generated.report.emitted, vec!["OpBitcast".to_string()]);
    Ok(())
}

#[test]
fn physical_pointer_bitcasts_stay_in_header() -> Result<()> {
    let grammar = load_grammar("bitcast_grammar.json")?;
    let type_map = TypeMap::load(data_path("bitcast_type_map.json"))?;
    let generated = generate_with(&grammar, &type_map, GenerateOptions::default())?;
    let (header, _) = generated
        .text
        .split_once("//! Instructions\n")
        .ok_or_else(|| anyhow!("missing instructions section"))?;

    assert!(header.contains(
        "template<typename T>\n\
         [[vk::ext_capability(spv::CapabilityPhysicalStorageBufferAddresses)]]\n\
         [[vk::ext_instruction(spv::OpBitcast)]]\n\
         pointer_t<spv::StorageClassPhysicalStorageBuffer, T> bitcast(uint64_t);\n"
    ));
    assert!(header.contains(
        "uint64_t bitcast(pointer_t<spv::StorageClassPhysicalStorageBuffer, T>);\n"
    ));
    assert!(header.contains(
        "enable_if_t<is_pointer_v<spv::StorageClassPhysicalStorageBuffer, T>, T> bitcast(U);\n"
    ));
    assert_eq!(header.matches("bitcast(").count(), 3);
    Ok(())
}

#[test]
fn missing_enumerant_kinds_leave_sections_empty() -> Result<()> {
    let grammar = load_grammar("bitcast_grammar.json")?;
    let type_map = TypeMap::embedded()?;
    let generated = generate_with(&grammar, &type_map, GenerateOptions::default())?;
    assert!(generated
        .text
        .contains("\n//! Builtins\nnamespace builtin\n{\n}\n"));
    assert!(generated
        .text
        .contains("\n//! Group Operations\nnamespace group_operation\n{\n}\n"));
    Ok(())
}

#[test]
fn subgroup_size_builtin_is_input_with_capability() -> Result<()> {
    let generated = generate_mini()?;
    assert!(generated.text.contains(
        "[[vk::ext_capability(spv::CapabilityGroupNonUniform)]]\n\
         [[vk::ext_builtin_input(spv::BuiltInSubgroupSize)]]\n\
         static const uint32_t SubgroupSize;\n"
    ));
    assert!(generated.text.contains(
        "[[vk::ext_builtin_output(spv::BuiltInPosition)]]\nstatic float32_t4 Position;\n"
    ));
    assert!(!generated.text.contains("FragDepth"));
    Ok(())
}

#[test]
fn enumerant_sections_follow_grammar() -> Result<()> {
    let generated = generate_mini()?;
    let text = &generated.text;
    assert!(text.contains(
        "\n\tvoid localSize()\n\t{\n\t\tvk::ext_execution_mode(spv::ExecutionModeLocalSize);\n\t}\n"
    ));
    assert!(!text.contains("RoundingModeRTPINTEL"));
    assert!(text.contains("\tstatic const uint32_t ClusteredReduce = 3;\n"));

    let builtins = text.find("namespace builtin").unwrap_or(usize::MAX);
    let modes = text.find("namespace execution_mode").unwrap_or(usize::MAX);
    let ops = text.find("namespace group_operation").unwrap_or(usize::MAX);
    let insts = text.find("//! Instructions").unwrap_or(usize::MAX);
    assert!(builtins < modes && modes < ops && ops < insts && insts < usize::MAX);
    Ok(())
}

#[test]
fn output_is_deterministic() -> Result<()> {
    let first = generate_mini()?;
    let second = generate_mini()?;
    assert_eq!(first.text, second.text);
    Ok(())
}

#[test]
fn instruction_without_capabilities_has_no_capability_line() -> Result<()> {
    let generated = generate_mini()?;
    assert!(generated.text.contains(
        "\n\n[[vk::ext_instruction(spv::OpControlBarrier)]]\n\
         void controlBarrier(uint32_t executionScope, uint32_t memoryScope, uint32_t semantics);\n\n"
    ));
    Ok(())
}

#[test]
fn skipped_instructions_are_reported_and_absent() -> Result<()> {
    let generated = generate_mini()?;
    let skipped: Vec<&str> = generated
        .report
        .skipped
        .iter()
        .map(|s| s.opname.as_str())
        .collect();
    assert_eq!(skipped, vec!["OpShiftRightLogical", "OpGroupNonUniformQuadSwap"]);
    assert_eq!(
        generated.report.skipped[0].reason,
        SkipReason::UnsupportedOperand {
            kind: "IdRef".into(),
            name: "Shift".into(),
        }
    );
    assert!(!generated.text.contains("OpShiftRightLogical"));
    assert!(!generated.text.contains("OpGroupNonUniformQuadSwap"));
    // later instructions still emitted
    assert!(generated.text.contains("spv::OpBeginInvocationInterlockEXT"));
    Ok(())
}

#[test]
fn comments_label_instruction_groups() -> Result<()> {
    let grammar = load_grammar("mini_grammar.json")?;
    let type_map = TypeMap::embedded()?;
    let generated = generate_with(&grammar, &type_map, GenerateOptions { comments: true })?;
    assert!(generated.text.contains("// OpBitcast (opcode 124)\ntemplate<typename T, typename U>\n"));
    assert!(!generated.text.contains("// OpShiftRightLogical"));
    Ok(())
}
