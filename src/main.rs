#![allow(non_snake_case)]
use RustedNewton::Examples::root_finding_examples::root_finding_examples;
use std::env;

fn main() {
    // example number from the command line, 0 by default:
    // 0 - roots of x^3 - 1, 1 - friction factor, 2 - history to csv and txt, 3 - TOML + logging,
    // 4 - error cases
    let example = env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<usize>().ok())
        .unwrap_or(0);
    root_finding_examples(example);
}
