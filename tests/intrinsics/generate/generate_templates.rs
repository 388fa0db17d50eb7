use std::collections::HashSet;

use anyhow::Result;
use intrinsics_generator::declaration::{Declaration, TemplateParam};
use intrinsics_generator::sanitize::{generic_names, identifiers};
use intrinsics_generator::{expand, Expansion, Policy, TypeMap, TypeResolver};

use crate::common::load_grammar;

fn mini_declarations() -> Result<Vec<Declaration>> {
    let grammar = load_grammar("mini_grammar.json")?;
    let policy = Policy::embedded()?;
    let type_map = TypeMap::embedded()?;
    let resolver = TypeResolver::new(&type_map);
    let mut decls = Vec::new();
    for inst in &grammar.instructions {
        let Some(strategy) = policy.strategy(inst) else {
            continue;
        };
        for request in strategy.requests() {
            if let Expansion::Declarations(list) = expand(inst, &request, &resolver)? {
                decls.extend(list);
            }
        }
    }
    Ok(decls)
}

fn signature_texts(decl: &Declaration) -> Vec<&str> {
    let mut texts = vec![decl.result.as_str()];
    for param in &decl.params {
        texts.push(param.ty.as_str());
        if let Some(default) = &param.default {
            texts.push(default.as_str());
        }
    }
    texts
}

#[test]
fn template_parameters_match_signature() -> Result<()> {
    let decls = mini_declarations()?;
    assert!(!decls.is_empty());
    for decl in &decls {
        let names: Vec<&str> = decl.templates.iter().map(TemplateParam::name).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), unique.len(), "duplicate template in {}", decl.render());

        let tokens: HashSet<&str> = signature_texts(decl)
            .into_iter()
            .flat_map(identifiers)
            .collect();
        for name in &names {
            assert!(tokens.contains(name), "unused template {name} in {}", decl.render());
        }
        for text in signature_texts(decl) {
            for letter in generic_names(text) {
                assert!(
                    unique.contains(letter.as_str()),
                    "missing template {letter} in {}",
                    decl.render()
                );
            }
        }
    }
    Ok(())
}

#[test]
fn overloads_are_unique_per_signature() -> Result<()> {
    let decls = mini_declarations()?;
    let mut seen = HashSet::new();
    for decl in &decls {
        let params: Vec<String> = decl.params.iter().map(ToString::to_string).collect();
        let key = (decl.name.clone(), decl.result.clone(), params);
        assert!(seen.insert(key), "duplicate overload {}", decl.render());
    }
    Ok(())
}
