//! Error types for semantic analysis.
//!
//! Every failure in the engine is fatal for the translation unit being
//! processed: there is no recovery inside the engine, errors propagate with
//! `?` up to whatever driver owns the session.
//!
//! ## Categories
//!
//! ```text
//! SemaError
//! ├── SemanticState  - arguments that cannot be bound, bad indices, non-constants
//! ├── Unsupported    - constructs outside the modelled C++ subset
//! ├── Redeclaration  - a name reused for a different entity, double definitions
//! └── Internal       - broken engine invariants
//! ```

use thiserror::Error;

use crate::Span;

/// Result alias used throughout the engine.
pub type SemaResult<T> = Result<T, SemaError>;

/// Coarse classification of a [`SemaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The program is syntactically fine but semantically impossible.
    SemanticState,
    /// The construct is valid C++ but not part of the supported subset.
    Unsupported,
    /// A name conflicts with an earlier declaration.
    Redeclaration,
    /// The engine itself reached an inconsistent state.
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::SemanticState => "semantic error",
            ErrorCategory::Unsupported => "unsupported construct",
            ErrorCategory::Redeclaration => "redeclaration conflict",
            ErrorCategory::Internal => "internal error",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while declaring, resolving or instantiating entities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemaError {
    // ------------------------------------------------------------------
    // Semantic state
    // ------------------------------------------------------------------
    /// A template argument does not match the kind of its parameter.
    #[error("at {span}: template argument {index} of '{template}' must be a {expected}")]
    ArgumentKindMismatch {
        template: String,
        index: usize,
        /// "type" or "non-type".
        expected: &'static str,
        span: Span,
    },

    /// Fewer arguments than non-defaulted parameters.
    #[error("at {span}: argument count mismatch for '{template}': expected at least {expected}, got {got}")]
    TooFewTemplateArguments {
        template: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    /// More arguments than parameters and no pack to absorb them.
    #[error("at {span}: too many template arguments for '{template}': expected at most {expected}, got {got}")]
    TooManyTemplateArguments {
        template: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    /// A dependent name refers to a parameter slot that was never bound.
    #[error("at {span}: template parameter index {index} out of range ({len} argument(s) bound)")]
    ParamIndexOutOfRange { index: usize, len: usize, span: Span },

    /// Constant evaluation failed.
    #[error("at {span}: expression is not a constant expression: {reason}")]
    NotConstant { reason: String, span: Span },

    /// A `static_assert` evaluated to false.
    #[error("at {span}: static assertion failed: {message}")]
    StaticAssertFailed { message: String, span: Span },

    /// A type-id was requested for a construct that still depends on template parameters.
    #[error("at {span}: '{name}' depends on a template parameter and has no type-id yet")]
    DependentType { name: String, span: Span },

    /// A name was used as a template-name but denotes something else.
    #[error("at {span}: '{name}' is not a template")]
    NotATemplate { name: String, span: Span },

    /// A name was used as a type but denotes something else.
    #[error("at {span}: '{name}' does not name a type")]
    NotAType { name: String, span: Span },

    /// A base-specifier does not denote a class.
    #[error("at {span}: base specifier '{name}' does not name a class")]
    NotAClass { name: String, span: Span },

    /// A base class is declared but not yet defined.
    #[error("at {span}: base class '{name}' is incomplete")]
    IncompleteBase { name: String, span: Span },

    /// Lookup found nothing.
    #[error("at {span}: unknown name '{name}'")]
    UnknownName { name: String, span: Span },

    /// Two declarations of the same template disagree about a parameter.
    #[error("at {span}: template '{name}' redeclared with different parameters: {detail}")]
    TemplateParamMismatch {
        name: String,
        detail: String,
        span: Span,
    },

    /// Both declarations of a template supply a default for the same parameter.
    #[error("at {span}: redefinition of default argument for parameter {index} of template '{name}'")]
    DefaultRedefinition {
        name: String,
        index: usize,
        span: Span,
    },

    /// A decl-specifier sequence does not form a type.
    #[error("at {span}: invalid type specifier: {detail}")]
    InvalidTypeSpecifier { detail: String, span: Span },

    /// A pack was used wrongly (no pack in an expansion, unexpanded pack, length mismatch).
    #[error("at {span}: invalid pack expansion: {detail}")]
    InvalidPackExpansion { detail: String, span: Span },

    /// Nested instantiations exceeded the configured limit.
    #[error("at {span}: instantiating '{template}' exceeded the maximum instantiation depth of {depth}")]
    InstantiationDepthExceeded {
        template: String,
        depth: usize,
        span: Span,
    },

    // ------------------------------------------------------------------
    // Unsupported constructs
    // ------------------------------------------------------------------
    /// The construct is outside the modelled subset.
    #[error("at {span}: {construct} is not supported")]
    Unsupported { construct: String, span: Span },

    /// Instantiation of a template whose entity is not a class.
    #[error("at {span}: unsupported template entity: '{name}' is a {entity} template")]
    UnsupportedTemplateEntity {
        name: String,
        entity: String,
        span: Span,
    },

    // ------------------------------------------------------------------
    // Redeclaration conflicts
    // ------------------------------------------------------------------
    /// A name is redeclared as a different kind of symbol.
    #[error("at {span}: '{name}' redeclared as different kind of symbol ({existing} vs {requested})")]
    DifferentKind {
        name: String,
        existing: String,
        requested: String,
        span: Span,
    },

    /// A class, enum or template entity is completed twice.
    #[error("at {span}: redefinition of '{name}'")]
    Redefinition { name: String, span: Span },

    // ------------------------------------------------------------------
    // Internal
    // ------------------------------------------------------------------
    /// An engine invariant was violated.
    #[error("internal error at {span}: {message}")]
    Internal { message: String, span: Span },
}

impl SemaError {
    /// Create an internal error.
    pub fn internal(message: impl Into<String>, span: Span) -> Self {
        SemaError::Internal {
            message: message.into(),
            span,
        }
    }

    /// Create a "not a constant expression" error.
    pub fn not_constant(reason: impl Into<String>, span: Span) -> Self {
        SemaError::NotConstant {
            reason: reason.into(),
            span,
        }
    }

    /// Create an "unsupported construct" error.
    pub fn unsupported(construct: impl Into<String>, span: Span) -> Self {
        SemaError::Unsupported {
            construct: construct.into(),
            span,
        }
    }

    /// Create an "invalid pack expansion" error.
    pub fn pack(detail: impl Into<String>, span: Span) -> Self {
        SemaError::InvalidPackExpansion {
            detail: detail.into(),
            span,
        }
    }

    /// Where the error was detected.
    pub fn span(&self) -> Span {
        match self {
            SemaError::ArgumentKindMismatch { span, .. }
            | SemaError::TooFewTemplateArguments { span, .. }
            | SemaError::TooManyTemplateArguments { span, .. }
            | SemaError::ParamIndexOutOfRange { span, .. }
            | SemaError::NotConstant { span, .. }
            | SemaError::StaticAssertFailed { span, .. }
            | SemaError::DependentType { span, .. }
            | SemaError::NotATemplate { span, .. }
            | SemaError::NotAType { span, .. }
            | SemaError::NotAClass { span, .. }
            | SemaError::IncompleteBase { span, .. }
            | SemaError::UnknownName { span, .. }
            | SemaError::TemplateParamMismatch { span, .. }
            | SemaError::DefaultRedefinition { span, .. }
            | SemaError::InvalidTypeSpecifier { span, .. }
            | SemaError::InvalidPackExpansion { span, .. }
            | SemaError::InstantiationDepthExceeded { span, .. }
            | SemaError::Unsupported { span, .. }
            | SemaError::UnsupportedTemplateEntity { span, .. }
            | SemaError::DifferentKind { span, .. }
            | SemaError::Redefinition { span, .. }
            | SemaError::Internal { span, .. } => *span,
        }
    }

    /// Which part of the error taxonomy this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            SemaError::Unsupported { .. } | SemaError::UnsupportedTemplateEntity { .. } => {
                ErrorCategory::Unsupported
            }
            SemaError::DifferentKind { .. } | SemaError::Redefinition { .. } => {
                ErrorCategory::Redeclaration
            }
            SemaError::Internal { .. } => ErrorCategory::Internal,
            _ => ErrorCategory::SemanticState,
        }
    }

    /// Whether this error is one of the argument-count failures.
    pub fn is_argument_count(&self) -> bool {
        matches!(
            self,
            SemaError::TooFewTemplateArguments { .. } | SemaError::TooManyTemplateArguments { .. }
        )
    }
}

/// Top-level error for drivers that run the engine over a translation unit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CppMetaError {
    /// Semantic analysis aborted the translation unit.
    #[error("{category}: {source}")]
    Sema {
        category: ErrorCategory,
        #[source]
        source: SemaError,
    },
}

impl From<SemaError> for CppMetaError {
    fn from(source: SemaError) -> Self {
        CppMetaError::Sema {
            category: source.category(),
            source,
        }
    }
}
