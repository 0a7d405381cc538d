//! Class templates: parameters, arguments and instantiation.
//!
//! ```text
//! Box<int, A, B>
//!   │ bind_arguments      positional binding, pack absorption, defaults
//!   ▼
//! [int, {A, B}]
//!   │ instance_key        3BoxIiJ1A1BEE
//!   ▼
//! memo lookup in the template's scope ── hit ──▶ existing instance
//!   │ miss
//!   ▼
//! instantiate             new class symbol, bases and members substituted
//! ```

mod argument;
mod binding;
mod instantiation;
mod key;
mod param;

pub use argument::{TemplateArgument, TemplateArguments};
pub use key::{display_name, instance_key};
pub use param::{ParamKind, TemplateParam, TemplateParamList};

pub(crate) use binding::convert_constant;
