//! Deterministic text outline of a symbol table.
//!
//! One line per declared symbol, nested by scope, in declaration order:
//!
//! ```text
//! namespace app
//!   struct A [1A]
//!   template<typename T, typename... Us> class Box
//!   class Box<int, A> [3BoxIiN3app1AEE] : public app::A
//! ```

use std::fmt::Write;

use super::{ScopeId, Symbol, SymbolData, SymbolTable, TemplateData};
use crate::template::ParamKind;
use crate::type_id::TypeIdGraph;

const INDENT: &str = "  ";

impl SymbolTable {
    /// Render every symbol reachable from the global scope.
    pub fn dump(&self, types: &TypeIdGraph) -> String {
        let mut out = String::new();
        self.dump_scope(self.global_scope(), types, 0, &mut out);
        out
    }

    fn dump_scope(&self, scope: ScopeId, types: &TypeIdGraph, depth: usize, out: &mut String) {
        for &id in self.members_of(scope) {
            let symbol = self.symbol(id);
            if matches!(symbol.data(), SymbolData::TemplateParam(_)) {
                continue;
            }
            out.push_str(&INDENT.repeat(depth));
            self.dump_line(symbol, types, out);
            out.push('\n');

            // A template's scope holds only its parameters, which the header shows.
            if symbol.as_template().is_some() {
                continue;
            }
            if let Some(own) = symbol.scope() {
                self.dump_scope(own, types, depth + 1, out);
            }
        }
    }

    fn dump_line(&self, symbol: &Symbol, types: &TypeIdGraph, out: &mut String) {
        let name = symbol.name();
        match symbol.data() {
            SymbolData::Namespace => {
                let _ = write!(out, "namespace {name}");
            }
            SymbolData::Class(class) => {
                let _ = write!(out, "{} {name} [{}]", class.key.as_str(), symbol.mangled_name());
                for (i, base) in class.bases.iter().enumerate() {
                    out.push_str(if i == 0 { " : " } else { ", " });
                    if base.is_virtual {
                        out.push_str("virtual ");
                    }
                    let _ = write!(out, "{} {}", base.access.as_str(), self.qualified_name(base.symbol));
                }
                if !symbol.is_defined() {
                    out.push_str(" (incomplete)");
                }
            }
            SymbolData::Enum(data) => {
                let key = if data.scoped { "enum class" } else { "enum" };
                let _ = write!(out, "{key} {name}");
                if !symbol.is_defined() {
                    out.push_str(" (incomplete)");
                }
            }
            SymbolData::Enumerator(value) => {
                let _ = write!(out, "{name} = {value}");
            }
            SymbolData::Typedef(target) => {
                let _ = write!(out, "typedef {} {name}", types.display(*target, self));
            }
            SymbolData::Function(function) => {
                let _ = write!(
                    out,
                    "function {name} [{}]: {}",
                    symbol.mangled_name(),
                    types.display(function.type_id, self)
                );
            }
            SymbolData::Object(object) => {
                let _ = write!(out, "object {name}: {}", types.display(object.type_id, self));
                if let Some(value) = object.value {
                    let _ = write!(out, " = {value}");
                }
            }
            SymbolData::Template(template) => {
                self.dump_template_header(template, out);
                let _ = write!(out, " {} {name}", template.entity.as_str());
                if !template.entity_defined {
                    out.push_str(" (incomplete)");
                }
            }
            SymbolData::TemplateParam(_) => {
                let _ = write!(out, "template parameter {name}");
            }
        }
    }

    fn dump_template_header(&self, template: &TemplateData, out: &mut String) {
        out.push_str("template<");
        for (i, param) in template.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            match (param.kind, param.value_type) {
                (ParamKind::NonType, Some(prim)) => out.push_str(prim.name()),
                _ => out.push_str("typename"),
            }
            if param.is_pack {
                out.push_str("...");
            }
            if !param.name.is_empty() {
                let _ = write!(out, " {}", param.name);
            }
            if let Some(default) = &param.default {
                let _ = write!(out, " = {default}");
            }
        }
        out.push('>');
    }
}
