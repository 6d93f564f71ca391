//! Core library for ctorgen
//!
//! This crate implements the **Functional Core** of the ctorgen application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`ctorgen_core`** (this crate): Pure transformation functions with zero I/O
//! - **`ctorgen`**: Source parsing, prompting, file edits and orchestration (the Imperative Shell)
//!
//! The core never sees source text. It works on an immutable [`constructor::StructDecl`]
//! snapshot captured by the shell, and hands back the text of a constructor that the
//! shell decides where to put.
//!
//! # Module Organization
//!
//! - [`constructor`]: Struct analysis, parameter negotiation, constructor emission and
//!   the pipeline that ties them together
//!
//! # Example Usage
//!
//! ```rust
//! use ctorgen_core::constructor::{
//!     generate_constructor, Generation, RawField, Script, ScriptedPresenter, StructBody,
//!     StructDecl,
//! };
//!
//! let decl = StructDecl {
//!     name: "S".to_string(),
//!     generics: None,
//!     body: StructBody::Named(vec![RawField::named("n", "i32"), RawField::named("m", "i64")]),
//! };
//!
//! let mut presenter = ScriptedPresenter::new(Script::Names(vec!["n".to_string()]));
//! let Generation::Emitted(generated) = generate_constructor(&decl, &mut presenter).unwrap() else {
//!     panic!("not cancelled");
//! };
//!
//! assert_eq!(generated.function, "pub fn new(n: i32) -> Self {\n    S { n, m: () }\n}");
//! ```

pub mod constructor;
