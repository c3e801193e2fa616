#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod kind;
pub mod lexer;
mod scope;
mod stream;
mod token;

pub use kind::{TokenClass, TokenKind};
pub use stream::{CachedStream, LoadError, TokenStream};
pub use token::{RawToken, Token, TokenId};
