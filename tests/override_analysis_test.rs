//! Scenario tests for override discovery across built hierarchies.

use pretty_assertions::assert_eq;
use sigmap::{
    analyze, ClassDeclaration, DiscrepancyKind, HierarchyAnalyzer, HierarchyBuilder,
    MethodSignature, ParameterPair, ParameterSignature, TypeRef,
};

fn foo(param_type: &str) -> MethodSignature {
    MethodSignature::new("foo").param(ParameterSignature::new("x").typed(TypeRef::scalar(param_type)))
}

fn kinds_of(records: Vec<ClassDeclaration>) -> Vec<(String, String, DiscrepancyKind)> {
    let forest = HierarchyBuilder::build(records);
    analyze(&forest)
        .into_iter()
        .map(|r| (r.ancestor_id(), r.descendant_id(), r.kind))
        .collect()
}

#[test]
fn test_override_is_checked_against_nearest_declaring_ancestor() {
    let records = vec![
        ClassDeclaration::new("A").with_method(foo("int")),
        ClassDeclaration::new("B").extends("A").with_method(foo("string")),
        ClassDeclaration::new("C").extends("B").with_method(foo("string")),
    ];

    assert_eq!(
        kinds_of(records),
        vec![(
            "A::foo".to_string(),
            "B::foo".to_string(),
            DiscrepancyKind::ParameterTypeMismatch
        )]
    );
}

#[test]
fn test_ancestors_without_the_method_are_skipped() {
    let records = vec![
        ClassDeclaration::new("C").extends("B").with_method(foo("string")),
        ClassDeclaration::new("B").extends("A"),
        ClassDeclaration::new("A").with_method(foo("int")),
    ];

    assert_eq!(
        kinds_of(records),
        vec![(
            "A::foo".to_string(),
            "C::foo".to_string(),
            DiscrepancyKind::ParameterTypeMismatch
        )]
    );
}

#[test]
fn test_constructors_and_siblings_are_not_compared() {
    let records = vec![
        ClassDeclaration::new("Base").with_method(
            MethodSignature::new("__construct").param(ParameterSignature::new("db")),
        ),
        ClassDeclaration::new("Left")
            .extends("Base")
            .with_method(MethodSignature::new("__construct"))
            .with_method(foo("int")),
        ClassDeclaration::new("Right")
            .extends("Base")
            .with_method(foo("string")),
    ];

    assert!(kinds_of(records).is_empty());
}

#[test]
fn test_orphan_subtree_is_still_analyzed() {
    let records = vec![
        ClassDeclaration::new("Controller")
            .extends("Framework\\BaseController")
            .with_method(MethodSignature::new("handle").by_reference()),
        ClassDeclaration::new("HomeController")
            .extends("Controller")
            .with_method(MethodSignature::new("handle")),
    ];

    let forest = HierarchyBuilder::build(records);
    assert_eq!(forest.stats().orphans, 1);

    let reports = analyze(&forest);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].kind, DiscrepancyKind::ReferenceMismatch);
    assert_eq!(
        reports[0].parameter_pairs,
        vec![ParameterPair {
            ancestor: None,
            descendant: None
        }]
    );
}

#[test]
fn test_parallel_analysis_keeps_root_order() {
    let records: Vec<ClassDeclaration> = (0..16)
        .flat_map(|i| {
            let base = format!("Base{i}");
            vec![
                ClassDeclaration::new(base.clone()).with_method(foo("int")),
                ClassDeclaration::new(format!("Child{i}"))
                    .extends(base)
                    .with_method(foo("float")),
            ]
        })
        .collect();

    let forest = HierarchyBuilder::build(records);
    let analyzer = HierarchyAnalyzer::new(&forest);
    let sequential = analyzer.analyze();

    assert_eq!(sequential.len(), 16);
    assert_eq!(analyzer.analyze_parallel(), sequential);
    assert_eq!(sequential[0].descendant_class, "Child0");
    assert_eq!(sequential[15].descendant_class, "Child15");
}
