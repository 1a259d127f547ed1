//! Integration tests for grouping and pin-tree reduction

mod cli_parse;
mod grouping_properties;
mod tree_reduction;
