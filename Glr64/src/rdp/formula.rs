//! Human readable formula rendering
//!
//! Output is for annotations and logs only; nothing downstream parses it.

use super::blender::BlenderFormula;
use super::combiner::CombinerFormula;
use super::operand::Operand;

/// Render `(a - b) × c + d` with the trivial identities folded away.
pub fn show_combiner_formula(formula: &CombinerFormula) -> String {
    let [a, b, c, d] = formula.operands().map(|op| op.to_string());

    let sub = if a == b {
        "0".to_string()
    } else if b == "0" {
        a
    } else if a == "0" {
        format!("- {b}")
    } else {
        format!("({a} - {b})")
    };

    let mul = if sub == "0" || c == "0" {
        "0".to_string()
    } else if sub == "1" {
        c
    } else if c == "1" {
        sub
    } else {
        format!("{sub} × {c}")
    };

    if mul == "0" {
        d
    } else if d == "0" {
        mul
    } else {
        format!("{mul} + {d}")
    }
}

/// Render `(p × a + m × b) / (a + b)` with the trivial identities folded away.
pub fn show_blender_formula(formula: &BlenderFormula) -> String {
    let [p, a, m, b] = formula.operands().map(|op| op.to_string());
    let one_minus_a = Operand::OneMinusA.to_string();

    let pa = if a == "0" {
        "0".to_string()
    } else {
        format!("{p} × {a}")
    };

    let mb = if b == "0" {
        "0".to_string()
    } else if b == "1" {
        m
    } else {
        format!("{m} × {b}")
    };

    let num = if pa == "0" {
        mb
    } else if mb == "0" {
        pa
    } else {
        format!("({pa} + {mb})")
    };

    let den = if a == "0" {
        b
    } else if b == "0" {
        a
    } else if b == one_minus_a {
        "1".to_string()
    } else {
        format!("({a} + {b})")
    };

    if den == "1" {
        num
    } else if num == "0" {
        "0".to_string()
    } else if num == den {
        "1".to_string()
    } else {
        format!("{num} / {den}")
    }
}
