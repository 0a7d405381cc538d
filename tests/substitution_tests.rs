//! Integration tests for substituting bound arguments into dependent trees.

mod test_harness;

use cppmeta::ParamKind;
use cppmeta::ast::{BinaryOp, expand_pack};
use cppmeta::prelude::*;
use test_harness::*;

fn dependent_value(name: &str, index: usize) -> Node {
    Node::dependent_value(name, index, span())
}

#[test]
fn substitution_leaves_the_pattern_untouched() {
    let ctx = SemaContext::new();
    // (N + 1) * 2
    let pattern = Node::binary(
        BinaryOp::Mul,
        Node::paren(
            Node::binary(BinaryOp::Add, dependent_value("N", 0), value(1), span()),
            span(),
        ),
        value(2),
        span(),
    );
    assert!(pattern.is_dependent());
    let before = pattern.clone();

    let args = TemplateArguments::new(vec![TemplateArgument::Value(ConstValue::Int(3))]);
    let resolved = pattern.resolve_dependent(&args).unwrap();
    assert_eq!(pattern, before);
    assert!(!resolved.is_dependent());
    assert_eq!(resolved.evaluate(ctx.table()), Ok(ConstValue::Int(8)));
    assert_eq!(resolved.to_string(), "(3 + 1) * 2");
}

#[test]
fn missing_arguments_and_bare_packs_are_errors() {
    let pattern = Node::binary(BinaryOp::Add, dependent_value("N", 1), value(1), span());
    let one = TemplateArguments::new(vec![TemplateArgument::Value(ConstValue::Int(3))]);
    let err = pattern.resolve_dependent(&one).unwrap_err();
    assert!(
        matches!(err, SemaError::ParamIndexOutOfRange { index: 1, len: 1, .. }),
        "{err}"
    );

    let pack = TemplateArguments::new(vec![TemplateArgument::Pack {
        kind: ParamKind::NonType,
        elements: vec![TemplateArgument::Value(ConstValue::Int(1))],
    }]);
    let err = dependent_value("Ns", 0).resolve_dependent(&pack).unwrap_err();
    assert!(matches!(err, SemaError::InvalidPackExpansion { .. }), "{err}");
}

#[test]
fn expansion_repeats_the_pattern_per_element() {
    let ctx = SemaContext::new();
    let args = TemplateArguments::new(vec![
        TemplateArgument::Value(ConstValue::Int(10)),
        TemplateArgument::Pack {
            kind: ParamKind::NonType,
            elements: vec![
                TemplateArgument::Value(ConstValue::Int(1)),
                TemplateArgument::Value(ConstValue::Int(2)),
                TemplateArgument::Value(ConstValue::Int(3)),
            ],
        },
    ]);
    // Base + Ns...
    let pattern = Node::binary(BinaryOp::Add, dependent_value("Base", 0), dependent_value("Ns", 1), span());
    let values: Vec<_> = expand_pack(&pattern, &args, span())
        .unwrap()
        .iter()
        .map(|node| node.evaluate(ctx.table()).unwrap())
        .collect();
    assert_eq!(values, vec![ConstValue::Int(11), ConstValue::Int(12), ConstValue::Int(13)]);

    let err = expand_pack(&dependent_value("Base", 0), &args, span()).unwrap_err();
    assert!(matches!(err, SemaError::InvalidPackExpansion { .. }), "{err}");
}

#[test]
fn template_id_arguments_expand_packs() {
    let mut s = Session::new();
    let tup = s
        .define_class_template("Tup", vec![type_param("Ts").pack()], |_, spec| spec)
        .unwrap();
    // template<typename... Ts> struct Wrap : Tup<Ts*...> {};
    let wrap = s
        .define_class_template("Wrap", vec![type_param("Ts").pack()], |_, spec| {
            let expansion = Node::pack_expansion(pointer_to(dependent("Ts", 0)), span());
            spec.with_base(public_base(Node::template_id(tup, "Tup", vec![expansion], span())))
        })
        .unwrap();

    let instance = s
        .instantiate(wrap, vec![int(), prim(DeclFlags::CHAR)])
        .unwrap();
    let bases = bases_of(&s.ctx, instance);
    assert_eq!(bases.len(), 1);
    assert_eq!(s.ctx.symbol(bases[0]).name(), "Tup<int*, char*>");
    assert_eq!(s.ctx.symbol(bases[0]).mangled_name(), "3TupIJPiPcEE");

    let empty = s.instantiate(wrap, vec![]).unwrap();
    let bases = bases_of(&s.ctx, empty);
    assert_eq!(s.ctx.symbol(bases[0]).name(), "Tup<>");
}

#[test]
fn non_type_arguments_are_computed_from_parameters() {
    let mut s = Session::new();
    let count = s
        .define_class_template("Count", vec![value_param("V", Primitive::Int)], |_, spec| spec)
        .unwrap();
    // template<int N> struct Next : Count<N + 1> {};
    let next = s
        .define_class_template("Next", vec![value_param("N", Primitive::Int)], |_, spec| {
            let arg = Node::binary(BinaryOp::Add, dependent_value("N", 0), value(1), span());
            spec.with_base(public_base(Node::template_id(count, "Count", vec![arg], span())))
        })
        .unwrap();

    let instance = s.instantiate(next, vec![value(3)]).unwrap();
    let base = bases_of(&s.ctx, instance)[0];
    assert_eq!(s.ctx.symbol(base).name(), "Count<3 + 1>");
    assert_eq!(s.instantiate(count, vec![value(4)]).unwrap(), base);
}
