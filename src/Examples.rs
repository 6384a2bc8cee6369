//! examples of usage of RustedNewton
/// Newton-Raphson and friction factor examples
pub mod root_finding_examples;
