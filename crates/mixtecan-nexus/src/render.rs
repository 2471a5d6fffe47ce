//! NEXUS text output.

use std::fmt::Write as _;

use crate::matrix::NexusMatrix;
use crate::partitions::Partition;

const PUNCTUATION: &[char] = &[
    '(', ')', '[', ']', '{', '}', '/', '\\', ',', ';', ':', '=', '*', '\'', '"', '`', '+', '-',
    '<', '>',
];

/// A NEXUS token for `label`: unchanged when it is a plain word, otherwise
/// single-quoted with embedded quotes doubled.
pub fn quote_label(label: &str) -> String {
    let plain = !label.is_empty()
        && !label
            .chars()
            .any(|c| c.is_whitespace() || PUNCTUATION.contains(&c));
    if plain {
        label.to_string()
    } else {
        format!("'{}'", label.replace('\'', "''"))
    }
}

/// A single `data` block: dimensions, format, state labels and the matrix.
pub fn render_matrix(nex: &NexusMatrix) -> String {
    let taxa: Vec<String> = nex.taxa().map(quote_label).collect();
    let width = taxa.iter().map(|t| t.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str("#NEXUS\n\n");

    out.push_str("begin data;\n");
    let _ = writeln!(out, "    dimensions ntax={} nchar={};", nex.ntax(), nex.nchar());
    out.push_str("    format datatype=standard missing=? gap=- symbols=\"01\";\n");
    out.push_str("    charstatelabels\n");
    let labels: Vec<String> = nex
        .characters()
        .enumerate()
        .map(|(i, c)| format!("        {} {}", i + 1, quote_label(c)))
        .collect();
    if !labels.is_empty() {
        out.push_str(&labels.join(",\n"));
        out.push('\n');
    }
    out.push_str("    ;\n");
    out.push_str("matrix\n");
    for ((_, states), label) in nex.rows().zip(&taxa) {
        let pad = width - label.chars().count();
        let _ = writeln!(out, "{}{} {}", label, " ".repeat(pad), states);
    }
    out.push_str(";\n");
    out.push_str("end;\n");
    out
}

/// `sets` block listing the character indices of each partition.
pub fn render_sets(partitions: &[Partition]) -> String {
    let mut out = String::from("\nbegin sets;\n");
    for p in partitions {
        let ids: Vec<String> = p.characters.iter().map(usize::to_string).collect();
        let _ = writeln!(out, "\tcharset {} = {};", quote_label(&p.name), ids.join(", "));
    }
    out.push_str("end;\n\n");
    out
}
