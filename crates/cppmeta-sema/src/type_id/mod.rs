//! The canonicalizing type-id graph.
//!
//! Every distinct type is exactly one node. Base nodes stand for a
//! fundamental type or a user-defined type, each with its cv-qualifiers.
//! Derived nodes are reached from another node through an edge labelled with
//! a declarator operator (pointer, reference, array, function). Walking an
//! operator from a node reuses the existing outgoing edge with that label or
//! creates one, so the same declarator chain applied to the same base always
//! lands on the same node and type identity is node identity.
//!
//! ```text
//!   int ──Pointer()──▶ int* ──Array(3)──▶ int*[3]
//!    │
//!    └──LvalueRef──▶ int&
//! ```

mod mangle;

use cppmeta_core::{CvQualifiers, DeclFlags, Primitive, SemaError, SemaResult, Span};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::symbols::SymbolId;

/// Handle to a canonical type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdRef(NodeIndex);

impl TypeIdRef {
    pub fn index(self) -> usize {
        self.0.index()
    }
}

/// What a base node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseKey {
    Primitive(Primitive, CvQualifiers),
    Symbol(SymbolId, CvQualifiers),
}

impl BaseKey {
    pub fn cv(self) -> CvQualifiers {
        match self {
            BaseKey::Primitive(_, cv) | BaseKey::Symbol(_, cv) => cv,
        }
    }

    fn with_cv(self, cv: CvQualifiers) -> Self {
        match self {
            BaseKey::Primitive(p, _) => BaseKey::Primitive(p, cv),
            BaseKey::Symbol(s, _) => BaseKey::Symbol(s, cv),
        }
    }
}

/// Edge label: the declarator operator that derives the target from the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeOp {
    Pointer(CvQualifiers),
    LvalueRef,
    RvalueRef,
    Array(Option<u64>),
    /// The source node is the return type.
    Function {
        params: Vec<TypeIdRef>,
        variadic: bool,
        cv: CvQualifiers,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    Base(BaseKey),
    Derived { from: TypeIdRef, op: TypeOp },
}

#[derive(Debug, Clone, Default)]
pub struct TypeIdGraph {
    graph: DiGraph<TypeNode, TypeOp>,
    bases: FxHashMap<BaseKey, TypeIdRef>,
}

impl TypeIdGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct types created so far.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node(&self, id: TypeIdRef) -> &TypeNode {
        &self.graph[id.0]
    }

    /// The base node for `key`, created on first use.
    pub fn base(&mut self, key: BaseKey) -> TypeIdRef {
        if let Some(&id) = self.bases.get(&key) {
            return id;
        }
        let id = TypeIdRef(self.graph.add_node(TypeNode::Base(key)));
        self.bases.insert(key, id);
        trace!(?key, node = id.index(), "new base type");
        id
    }

    pub fn primitive(&mut self, prim: Primitive, cv: CvQualifiers) -> TypeIdRef {
        self.base(BaseKey::Primitive(prim, cv))
    }

    pub fn symbol_type(&mut self, symbol: SymbolId, cv: CvQualifiers) -> TypeIdRef {
        self.base(BaseKey::Symbol(symbol, cv))
    }

    /// Base node for a decl-specifier set made of fundamental type keywords.
    pub fn get_base_node(&mut self, flags: DeclFlags, span: Span) -> SemaResult<TypeIdRef> {
        let prim = Primitive::from_flags(flags)
            .map_err(|detail| SemaError::InvalidTypeSpecifier { detail, span })?;
        Ok(self.primitive(prim, flags.cv()))
    }

    /// Follow the outgoing edge labelled `op`, creating it if needed.
    fn walk(&mut self, from: TypeIdRef, op: TypeOp) -> TypeIdRef {
        if let Some(edge) = self
            .graph
            .edges_directed(from.0, Direction::Outgoing)
            .find(|edge| *edge.weight() == op)
        {
            return TypeIdRef(edge.target());
        }
        let node = self.graph.add_node(TypeNode::Derived {
            from,
            op: op.clone(),
        });
        self.graph.add_edge(from.0, node, op);
        trace!(from = from.index(), node = node.index(), "new derived type");
        TypeIdRef(node)
    }

    pub fn walk_to_pointer(&mut self, from: TypeIdRef, cv: CvQualifiers) -> TypeIdRef {
        self.walk(from, TypeOp::Pointer(cv))
    }

    /// `T&`, collapsing references: `T& &` and `T&& &` are both `T&`.
    pub fn walk_to_ref(&mut self, from: TypeIdRef) -> TypeIdRef {
        let referee = match self.node(from) {
            TypeNode::Derived {
                from: referee,
                op: TypeOp::LvalueRef | TypeOp::RvalueRef,
            } => *referee,
            _ => from,
        };
        self.walk(referee, TypeOp::LvalueRef)
    }

    /// `T&&`, collapsing references: `T& &&` is `T&` and `T&& &&` is `T&&`.
    pub fn walk_to_rvref(&mut self, from: TypeIdRef) -> TypeIdRef {
        if self.is_reference(from) {
            return from;
        }
        self.walk(from, TypeOp::RvalueRef)
    }

    pub fn walk_to_array(&mut self, element: TypeIdRef, bound: Option<u64>) -> TypeIdRef {
        self.walk(element, TypeOp::Array(bound))
    }

    pub fn walk_to_function(
        &mut self,
        ret: TypeIdRef,
        params: &[TypeIdRef],
        variadic: bool,
        cv: CvQualifiers,
    ) -> TypeIdRef {
        self.walk(
            ret,
            TypeOp::Function {
                params: params.to_vec(),
                variadic,
                cv,
            },
        )
    }

    fn op_of(&self, id: TypeIdRef) -> Option<&TypeOp> {
        match self.node(id) {
            TypeNode::Derived { op, .. } => Some(op),
            TypeNode::Base(_) => None,
        }
    }

    pub fn is_reference(&self, id: TypeIdRef) -> bool {
        matches!(self.op_of(id), Some(TypeOp::LvalueRef | TypeOp::RvalueRef))
    }

    pub fn is_function(&self, id: TypeIdRef) -> bool {
        matches!(self.op_of(id), Some(TypeOp::Function { .. }))
    }

    pub fn is_array(&self, id: TypeIdRef) -> bool {
        matches!(self.op_of(id), Some(TypeOp::Array(_)))
    }

    pub fn is_void(&self, id: TypeIdRef) -> bool {
        matches!(
            self.node(id),
            TypeNode::Base(BaseKey::Primitive(Primitive::Void, _))
        )
    }

    /// The base a type is ultimately derived from.
    pub fn base_key(&self, id: TypeIdRef) -> BaseKey {
        let mut current = id;
        loop {
            match self.node(current) {
                TypeNode::Base(key) => return *key,
                TypeNode::Derived { from, .. } => current = *from,
            }
        }
    }

    /// The user-defined type this node names directly, ignoring cv-qualifiers.
    pub fn symbol_of(&self, id: TypeIdRef) -> Option<SymbolId> {
        match self.node(id) {
            TypeNode::Base(BaseKey::Symbol(symbol, _)) => Some(*symbol),
            _ => None,
        }
    }

    /// Top-level cv-qualifiers of a type.
    pub fn cv_of(&self, id: TypeIdRef) -> CvQualifiers {
        match self.node(id) {
            TypeNode::Base(key) => key.cv(),
            TypeNode::Derived {
                op: TypeOp::Pointer(cv),
                ..
            } => *cv,
            TypeNode::Derived {
                from,
                op: TypeOp::Array(_),
            } => self.cv_of(*from),
            TypeNode::Derived { .. } => CvQualifiers::empty(),
        }
    }

    /// The same type with additional top-level cv-qualifiers.
    ///
    /// cv on an array applies to its elements; references and functions
    /// ignore it.
    pub fn add_cv(&mut self, id: TypeIdRef, cv: CvQualifiers) -> TypeIdRef {
        if cv.is_empty() {
            return id;
        }
        match self.node(id).clone() {
            TypeNode::Base(key) => self.base(key.with_cv(key.cv() | cv)),
            TypeNode::Derived {
                from,
                op: TypeOp::Pointer(own),
            } => self.walk_to_pointer(from, own | cv),
            TypeNode::Derived {
                from,
                op: TypeOp::Array(bound),
            } => {
                let element = self.add_cv(from, cv);
                self.walk_to_array(element, bound)
            }
            TypeNode::Derived { .. } => id,
        }
    }

    /// The same type without top-level cv-qualifiers.
    pub fn strip_top_level_cv(&mut self, id: TypeIdRef) -> TypeIdRef {
        match self.node(id).clone() {
            TypeNode::Base(key) if !key.cv().is_empty() => self.base(key.with_cv(CvQualifiers::empty())),
            TypeNode::Derived {
                from,
                op: TypeOp::Pointer(cv),
            } if !cv.is_empty() => self.walk_to_pointer(from, CvQualifiers::empty()),
            _ => id,
        }
    }

    /// Parameter type adjustment: arrays and functions decay to pointers and
    /// top-level cv-qualifiers are dropped.
    pub fn adjust_parameter(&mut self, id: TypeIdRef) -> TypeIdRef {
        match self.node(id).clone() {
            TypeNode::Derived {
                from,
                op: TypeOp::Array(_),
            } => self.walk_to_pointer(from, CvQualifiers::empty()),
            TypeNode::Derived {
                op: TypeOp::Function { .. },
                ..
            } => self.walk_to_pointer(id, CvQualifiers::empty()),
            _ => self.strip_top_level_cv(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn none() -> CvQualifiers {
        CvQualifiers::empty()
    }

    #[test]
    fn same_chain_same_node() {
        let mut graph = TypeIdGraph::new();
        let int = graph.primitive(Primitive::Int, none());
        let a = graph.walk_to_pointer(int, none());
        let a = graph.walk_to_array(a, Some(3));
        let int_again = graph.get_base_node(DeclFlags::SIGNED | DeclFlags::INT, Span::default()).unwrap();
        assert_eq!(int, int_again);
        let b = graph.walk_to_pointer(int_again, none());
        let b = graph.walk_to_array(b, Some(3));
        assert_eq!(a, b);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn different_operators_different_nodes() {
        let mut graph = TypeIdGraph::new();
        let int = graph.primitive(Primitive::Int, none());
        let p = graph.walk_to_pointer(int, none());
        let cp = graph.walk_to_pointer(int, CvQualifiers::CONST);
        let r = graph.walk_to_ref(int);
        let a3 = graph.walk_to_array(int, Some(3));
        let a4 = graph.walk_to_array(int, Some(4));
        let all = [p, cp, r, a3, a4];
        for (i, x) in all.iter().enumerate() {
            for y in &all[i + 1..] {
                assert_ne!(x, y);
            }
        }
    }

    #[test]
    fn cv_distinguishes_bases() {
        let mut graph = TypeIdGraph::new();
        let int = graph.primitive(Primitive::Int, none());
        let cint = graph.get_base_node(DeclFlags::CONST | DeclFlags::INT, Span::default()).unwrap();
        assert_ne!(int, cint);
        assert_eq!(graph.strip_top_level_cv(cint), int);
        assert_eq!(graph.add_cv(int, CvQualifiers::CONST), cint);
        assert_eq!(graph.cv_of(cint), CvQualifiers::CONST);
    }

    #[test]
    fn invalid_specifiers_are_rejected() {
        let mut graph = TypeIdGraph::new();
        let err = graph
            .get_base_node(DeclFlags::SIGNED | DeclFlags::UNSIGNED, Span::at(1, 2))
            .unwrap_err();
        assert!(matches!(err, SemaError::InvalidTypeSpecifier { .. }));
        assert!(graph.get_base_node(DeclFlags::CONST, Span::default()).is_err());
    }

    #[test]
    fn references_collapse() {
        let mut graph = TypeIdGraph::new();
        let int = graph.primitive(Primitive::Int, none());
        let lref = graph.walk_to_ref(int);
        let rref = graph.walk_to_rvref(int);
        assert_eq!(graph.walk_to_ref(lref), lref);
        assert_eq!(graph.walk_to_ref(rref), lref);
        assert_eq!(graph.walk_to_rvref(lref), lref);
        assert_eq!(graph.walk_to_rvref(rref), rref);
    }

    #[test]
    fn cv_on_arrays_applies_to_elements() {
        let mut graph = TypeIdGraph::new();
        let int = graph.primitive(Primitive::Int, none());
        let arr = graph.walk_to_array(int, Some(2));
        let const_arr = graph.add_cv(arr, CvQualifiers::CONST);
        let cint = graph.primitive(Primitive::Int, CvQualifiers::CONST);
        assert_eq!(const_arr, graph.walk_to_array(cint, Some(2)));
        assert_eq!(graph.cv_of(const_arr), CvQualifiers::CONST);
    }

    #[test]
    fn parameters_decay() {
        let mut graph = TypeIdGraph::new();
        let int = graph.primitive(Primitive::Int, none());
        let cint = graph.primitive(Primitive::Int, CvQualifiers::CONST);
        let arr = graph.walk_to_array(int, Some(8));
        let ptr = graph.walk_to_pointer(int, none());
        assert_eq!(graph.adjust_parameter(arr), ptr);
        assert_eq!(graph.adjust_parameter(cint), int);

        let func = graph.walk_to_function(int, &[int], false, none());
        let fptr = graph.walk_to_pointer(func, none());
        assert_eq!(graph.adjust_parameter(func), fptr);

        let const_ptr = graph.walk_to_pointer(int, CvQualifiers::CONST);
        assert_eq!(graph.adjust_parameter(const_ptr), ptr);
    }

    #[test]
    fn structural_queries() {
        let mut graph = TypeIdGraph::new();
        let symbol = SymbolId::from_index(4);
        let widget = graph.symbol_type(symbol, CvQualifiers::CONST);
        let ptr = graph.walk_to_pointer(widget, none());
        assert_eq!(graph.symbol_of(widget), Some(symbol));
        assert_eq!(graph.symbol_of(ptr), None);
        assert_eq!(graph.base_key(ptr), BaseKey::Symbol(symbol, CvQualifiers::CONST));
        assert!(!graph.is_reference(ptr));
        let void = graph.primitive(Primitive::Void, none());
        assert!(graph.is_void(void));
    }
}
