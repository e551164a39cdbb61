//! Hand-rolled recursive descent parser for VHDL-2008.
//!
//! This crate provides a full VHDL-2008 parser with error recovery,
//! producing an AST with source spans for all nodes.

#![warn(missing_docs)]
