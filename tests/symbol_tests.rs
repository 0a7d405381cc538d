//! Integration tests for declarations, redeclaration rules and lookup over a
//! small translation unit.

mod test_harness;

use cppmeta::ast::{ClassKey, ClassSpecifier, DeclSpecifiers, DeclaratorOp, ParameterNode};
use cppmeta::prelude::*;
use test_harness::*;

fn function_of(params: &[DeclFlags]) -> DeclaratorOp {
    DeclaratorOp::Function {
        params: params
            .iter()
            .map(|&flags| ParameterNode::new(DeclSpecifiers::primitive(flags), None, span()))
            .collect(),
        variadic: false,
        cv: CvQualifiers::empty(),
    }
}

fn declare_function(s: &mut Session, ret: DeclFlags, name: &str, params: &[DeclFlags]) -> SemaResult<SymbolId> {
    let span = s.next_span();
    let declarator = declarator(name, vec![function_of(params)], span);
    s.ctx
        .declare_simple(&DeclSpecifiers::primitive(ret), Some(&declarator), None, span)
}

/// Declarations a grammar would produce for:
///
/// ```text
/// namespace app {
///   struct Widget {};
///   enum Color { Red, Green };
///   typedef Widget* WidgetPtr;
///   int area(int);
///   int area(double);
///   const int limit = 8;
///   template<typename T, int N = 4> struct Array {};
/// }
/// ```
fn translation_unit() -> (Session, SymbolId) {
    let mut s = Session::new();
    let span = s.next_span();
    s.ctx.open_namespace("app", span).unwrap();

    let widget = s.class("Widget");

    let span = s.next_span();
    let color = s.ctx.declare_enum("Color", false, None, span).unwrap();
    s.ctx
        .define_enum(
            color,
            &[EnumeratorDecl::new("Red", span), EnumeratorDecl::new("Green", span)],
            span,
        )
        .unwrap();

    let span = s.next_span();
    let specifiers = DeclSpecifiers::named(named(&s.ctx, widget)).with_flags(DeclFlags::TYPEDEF);
    let ptr = declarator("WidgetPtr", vec![DeclaratorOp::Pointer(CvQualifiers::empty())], span);
    s.ctx.declare_simple(&specifiers, Some(&ptr), None, span).unwrap();

    declare_function(&mut s, DeclFlags::INT, "area", &[DeclFlags::INT]).unwrap();
    declare_function(&mut s, DeclFlags::INT, "area", &[DeclFlags::DOUBLE]).unwrap();

    let span = s.next_span();
    let limit = declarator("limit", vec![], span);
    s.ctx
        .declare_simple(
            &DeclSpecifiers::primitive(DeclFlags::CONST | DeclFlags::INT),
            Some(&limit),
            Some(&value(8)),
            span,
        )
        .unwrap();

    let array = s
        .define_class_template(
            "Array",
            vec![
                type_param("T"),
                value_param("N", Primitive::Int).with_default(value(4)),
            ],
            |_, spec| spec,
        )
        .unwrap();

    let span = s.next_span();
    s.ctx.close_namespace(span).unwrap();
    (s, array)
}

#[test]
fn translation_unit_outline() {
    let (mut s, array) = translation_unit();
    let limit = s
        .ctx
        .lookup_path(&["app", "limit"], LookupMask::OBJECT)
        .unwrap();
    s.instantiate(array, vec![int()]).unwrap();
    s.instantiate(array, vec![int(), named(&s.ctx, limit)]).unwrap();

    let expected = "\
namespace app
  struct Widget [6Widget]
  enum Color
    Red = 0
    Green = 1
  typedef app::Widget* WidgetPtr
  function area [4areai]: int(int)
  function area [4aread]: int(double)
  object limit: const int = 8
  template<typename T, int N = 4> struct Array
  struct Array<int, 4> [5ArrayIiLi4EE]
  struct Array<int, limit> [5ArrayIiLi8EE]
";
    assert_eq!(s.dump(), expected);
}

#[test]
fn qualified_lookup_through_namespaces() {
    let (s, _) = translation_unit();
    let ctx = &s.ctx;

    assert!(ctx.lookup("Widget", LookupMask::CLASS).is_none());
    let widget = ctx.lookup_path(&["app", "Widget"], LookupMask::TYPE).unwrap();
    assert_eq!(ctx.qualified_name(widget), "app::Widget");

    // Unscoped enumerators are visible in the enclosing scope
    let red = ctx.lookup_path(&["app", "Red"], LookupMask::ENUMERATOR).unwrap();
    assert_eq!(ctx.qualified_name(red), "app::Color::Red");
    assert_eq!(ctx.lookup_path(&["app", "Color", "Red"], LookupMask::ENUMERATOR), Some(red));

    let err = ctx.require("Missing", LookupMask::ANY, Span::at(9, 3)).unwrap_err();
    assert!(matches!(err, SemaError::UnknownName { .. }));
}

#[test]
fn redeclaration_rules() {
    let mut s = Session::new();

    // Same kind: the existing symbol comes back
    let first = s.forward_class("Node");
    let again = s.forward_class("Node");
    assert_eq!(first, again);

    // Another kind under the same name
    let span = s.next_span();
    let err = s.ctx.declare_enum("Node", false, None, span).unwrap_err();
    assert!(matches!(err, SemaError::DifferentKind { .. }), "{err}");
    assert_eq!(err.category(), ErrorCategory::Redeclaration);

    // Overloads with distinct parameter lists coexist
    let f_int = declare_function(&mut s, DeclFlags::VOID, "f", &[DeclFlags::INT]).unwrap();
    let f_char = declare_function(&mut s, DeclFlags::VOID, "f", &[DeclFlags::CHAR]).unwrap();
    assert_ne!(f_int, f_char);
    assert_eq!(
        declare_function(&mut s, DeclFlags::VOID, "f", &[DeclFlags::INT]).unwrap(),
        f_int
    );

    // Same parameters, different return type
    let err = declare_function(&mut s, DeclFlags::INT, "f", &[DeclFlags::INT]).unwrap_err();
    assert!(matches!(err, SemaError::Redefinition { .. }), "{err}");

    // Functions do not share names with objects
    let span = s.next_span();
    let object = declarator("f", vec![], span);
    let err = s
        .ctx
        .declare_simple(&DeclSpecifiers::primitive(DeclFlags::INT), Some(&object), None, span)
        .unwrap_err();
    assert!(matches!(err, SemaError::DifferentKind { .. }), "{err}");

    // A typedef may be repeated only with the same type
    s.typedef("Size", DeclSpecifiers::primitive(DeclFlags::UNSIGNED | DeclFlags::LONG), vec![]);
    s.typedef(
        "Size",
        DeclSpecifiers::primitive(DeclFlags::UNSIGNED | DeclFlags::LONG | DeclFlags::INT),
        vec![],
    );
    let span = s.next_span();
    let size = declarator("Size", vec![], span);
    let err = s
        .ctx
        .declare_typedef("Size", &DeclSpecifiers::primitive(DeclFlags::INT), Some(&size), span)
        .unwrap_err();
    assert!(matches!(err, SemaError::Redefinition { .. }), "{err}");
}

#[test]
fn template_parameters_are_scoped_to_their_template() {
    let mut s = Session::new();
    let span = s.next_span();
    s.ctx
        .begin_template(TemplateParamList::new(vec![type_param("T")]), span)
        .unwrap();
    assert!(s.ctx.lookup("T", LookupMask::TEMPLATE_PARAM).is_some());

    let template = s.ctx.declare_class("Holder", ClassKey::Class, span).unwrap();
    // The template itself lands in the enclosing scope
    assert_eq!(s.ctx.symbol(template).enclosing(), s.ctx.global_scope());
    assert_eq!(s.ctx.symbol(template).kind(), SymbolKind::Template);
    assert!(s.ctx.lookup("T", LookupMask::TEMPLATE_PARAM).is_some());
    s.ctx
        .define_class(template, ClassSpecifier::new(ClassKey::Class, "Holder", span))
        .unwrap();
    assert_eq!(s.ctx.end_template(span).unwrap(), template);

    assert_eq!(s.ctx.current_scope(), s.ctx.global_scope());
    assert!(s.ctx.lookup("T", LookupMask::TEMPLATE_PARAM).is_none());
    assert_eq!(s.ctx.lookup("Holder", LookupMask::TEMPLATE), Some(template));
    assert_eq!(s.ctx.qualified_name(template), "Holder");

    // A plain class cannot take over the template's name
    let err = s.ctx.declare_class("Holder", ClassKey::Class, span).unwrap_err();
    assert!(matches!(err, SemaError::DifferentKind { .. }), "{err}");
}

#[test]
fn redefinition_of_a_class_template() {
    let mut s = Session::new();
    s.define_class_template("Holder", vec![type_param("T")], |_, spec| spec)
        .unwrap();
    let err = s
        .define_class_template("Holder", vec![type_param("U")], |_, spec| spec)
        .unwrap_err();
    assert!(matches!(err, SemaError::Redefinition { .. }), "{err}");

    let mut s = Session::new();
    s.declare_class_template("Pair", vec![type_param("T"), type_param("U")])
        .unwrap();
    let err = s
        .declare_class_template("Pair", vec![type_param("T")])
        .unwrap_err();
    assert!(matches!(err, SemaError::TemplateParamMismatch { .. }), "{err}");
}
