#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![forbid(unsafe_code)]

//! Declarations (files, classes, functions) recovered from a token stream.

mod builder;
mod decl;
mod doc;
mod params;
mod report;
mod source;

pub use builder::{build, BuildOptions};
pub use decl::{DeclKind, Declaration, Modifiers, Parameter, Parameters, Visibility};
pub use report::{CoverageMap, DeclarationReport};
pub use source::SourceFile;
