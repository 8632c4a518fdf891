//! This crate contains code for a minimal untyped lambda calculus
//! interpreter that reduces expressions to normal form by beta reduction.

pub mod box_tree_impl;
pub mod end_to_end;
pub mod lexical_analysis;
