//! Instance keys and display names.
//!
//! The key of an instance is the template's internal name followed by the
//! encoded argument list, `<template>I<args>E`. Type arguments encode their
//! canonical type-id, so two argument lists produce the same key exactly when
//! they bind the same types and values in the same order.

use super::{TemplateArgument, TemplateArguments};
use crate::symbols::SymbolTable;
use crate::type_id::TypeIdGraph;

/// Cache key of the instance of `template_mangled` for `args`.
pub fn instance_key(
    template_mangled: &str,
    args: &TemplateArguments,
    types: &TypeIdGraph,
    table: &SymbolTable,
) -> String {
    let mut out = String::from(template_mangled);
    out.push('I');
    for arg in args {
        encode_argument(arg, types, table, &mut out);
    }
    out.push('E');
    out
}

fn encode_argument(arg: &TemplateArgument, types: &TypeIdGraph, table: &SymbolTable, out: &mut String) {
    match arg {
        TemplateArgument::Type { type_id, .. } => out.push_str(&types.mangle(*type_id, table)),
        TemplateArgument::Value(value) => out.push_str(&value.mangle()),
        TemplateArgument::Pack { elements, .. } => {
            out.push('J');
            for element in elements {
                encode_argument(element, types, table, out);
            }
            out.push('E');
        }
    }
}

/// `Box<int, A, B>` from the source forms of the bound arguments.
pub fn display_name(template_name: &str, sources: &[String]) -> String {
    format!("{template_name}<{}>", sources.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ParamKind;
    use cppmeta_core::{ConstValue, CvQualifiers, Primitive};

    #[test]
    fn keys_encode_arguments_in_order() {
        let table = SymbolTable::new();
        let mut types = TypeIdGraph::new();
        let int = types.primitive(Primitive::Int, CvQualifiers::empty());
        let double = types.primitive(Primitive::Double, CvQualifiers::empty());
        let args = TemplateArguments::new(vec![
            TemplateArgument::type_arg(int, "int"),
            TemplateArgument::Value(ConstValue::Int(3)),
            TemplateArgument::Pack {
                kind: ParamKind::Type,
                elements: vec![TemplateArgument::type_arg(double, "double")],
            },
        ]);
        assert_eq!(instance_key("3Box", &args, &types, &table), "3BoxIiLi3EJdEE");
        let sources = ["int", "1 + 2", "double"].map(String::from);
        assert_eq!(display_name("Box", &sources), "Box<int, 1 + 2, double>");
    }

    #[test]
    fn empty_packs_still_distinguish_keys() {
        let table = SymbolTable::new();
        let types = TypeIdGraph::new();
        let empty = TemplateArguments::new(vec![TemplateArgument::Pack {
            kind: ParamKind::Type,
            elements: Vec::new(),
        }]);
        assert_eq!(instance_key("3Tup", &empty, &types, &table), "3TupIJEE");
        assert_eq!(instance_key("3Tup", &TemplateArguments::default(), &types, &table), "3TupIE");
        assert_eq!(display_name("Tup", &[]), "Tup<>");
    }

    #[test]
    fn display_text_does_not_affect_keys() {
        let table = SymbolTable::new();
        let mut types = TypeIdGraph::new();
        let int = types.primitive(Primitive::Int, CvQualifiers::empty());
        let a = TemplateArguments::new(vec![TemplateArgument::type_arg(int, "int")]);
        let b = TemplateArguments::new(vec![TemplateArgument::type_arg(int, "signed int")]);
        assert_eq!(
            instance_key("1X", &a, &types, &table),
            instance_key("1X", &b, &types, &table)
        );
    }
}
