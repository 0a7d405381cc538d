//! Canonical text forms of type-ids.
//!
//! [`TypeIdGraph::mangle`] produces an Itanium-style encoding that is equal
//! for two type-ids exactly when they are the same node; it is what template
//! instance keys are built from. [`TypeIdGraph::display`] produces a readable
//! spelling in suffix order (`const int*[3]`).

use std::fmt::Write;

use super::{BaseKey, TypeIdGraph, TypeIdRef, TypeNode, TypeOp};
use crate::symbols::SymbolTable;

impl TypeIdGraph {
    /// Encoding of a type for use inside internal names.
    pub fn mangle(&self, id: TypeIdRef, table: &SymbolTable) -> String {
        let mut out = String::new();
        self.mangle_into(id, table, &mut out);
        out
    }

    fn mangle_into(&self, id: TypeIdRef, table: &SymbolTable, out: &mut String) {
        match self.node(id) {
            TypeNode::Base(BaseKey::Primitive(prim, cv)) => {
                out.push_str(cv.mangle());
                out.push_str(prim.mangle());
            }
            TypeNode::Base(BaseKey::Symbol(symbol, cv)) => {
                out.push_str(cv.mangle());
                out.push_str(&table.nested_mangled_name(*symbol));
            }
            TypeNode::Derived { from, op } => match op {
                TypeOp::Pointer(cv) => {
                    out.push_str(cv.mangle());
                    out.push('P');
                    self.mangle_into(*from, table, out);
                }
                TypeOp::LvalueRef => {
                    out.push('R');
                    self.mangle_into(*from, table, out);
                }
                TypeOp::RvalueRef => {
                    out.push('O');
                    self.mangle_into(*from, table, out);
                }
                TypeOp::Array(bound) => {
                    match bound {
                        Some(n) => {
                            let _ = write!(out, "A{n}_");
                        }
                        None => out.push_str("A_"),
                    }
                    self.mangle_into(*from, table, out);
                }
                TypeOp::Function {
                    params,
                    variadic,
                    cv,
                } => {
                    out.push_str(cv.mangle());
                    out.push('F');
                    self.mangle_into(*from, table, out);
                    self.mangle_params_into(params, *variadic, table, out);
                    out.push('E');
                }
            },
        }
    }

    fn mangle_params_into(
        &self,
        params: &[TypeIdRef],
        variadic: bool,
        table: &SymbolTable,
        out: &mut String,
    ) {
        if params.is_empty() && !variadic {
            out.push('v');
            return;
        }
        for &param in params {
            self.mangle_into(param, table, out);
        }
        if variadic {
            out.push('z');
        }
    }

    /// Encoding of a function type's parameter list, which identifies an overload.
    ///
    /// Returns `None` when `id` is not a function type.
    pub fn mangle_signature(&self, id: TypeIdRef, table: &SymbolTable) -> Option<String> {
        match self.node(id) {
            TypeNode::Derived {
                op:
                    TypeOp::Function {
                        params,
                        variadic,
                        cv,
                    },
                ..
            } => {
                let mut out = String::from(cv.mangle());
                self.mangle_params_into(params, *variadic, table, &mut out);
                Some(out)
            }
            _ => None,
        }
    }

    /// Readable spelling of a type.
    pub fn display(&self, id: TypeIdRef, table: &SymbolTable) -> String {
        let mut out = String::new();
        self.display_into(id, table, &mut out);
        out
    }

    fn display_into(&self, id: TypeIdRef, table: &SymbolTable, out: &mut String) {
        match self.node(id) {
            TypeNode::Base(key) => {
                let cv = key.cv();
                if !cv.is_empty() {
                    let _ = write!(out, "{cv} ");
                }
                match key {
                    BaseKey::Primitive(prim, _) => out.push_str(prim.name()),
                    BaseKey::Symbol(symbol, _) => out.push_str(&table.qualified_name(*symbol)),
                }
            }
            TypeNode::Derived { from, op } => {
                self.display_into(*from, table, out);
                match op {
                    TypeOp::Pointer(cv) if cv.is_empty() => out.push('*'),
                    TypeOp::Pointer(cv) => {
                        let _ = write!(out, "* {cv}");
                    }
                    TypeOp::LvalueRef => out.push('&'),
                    TypeOp::RvalueRef => out.push_str("&&"),
                    TypeOp::Array(Some(n)) => {
                        let _ = write!(out, "[{n}]");
                    }
                    TypeOp::Array(None) => out.push_str("[]"),
                    TypeOp::Function {
                        params,
                        variadic,
                        cv,
                    } => {
                        out.push('(');
                        for (i, &param) in params.iter().enumerate() {
                            if i > 0 {
                                out.push_str(", ");
                            }
                            self.display_into(param, table, out);
                        }
                        if *variadic {
                            out.push_str(if params.is_empty() { "..." } else { ", ..." });
                        }
                        out.push(')');
                        if !cv.is_empty() {
                            let _ = write!(out, " {cv}");
                        }
                    }
                }
            }
        }
    }
}
