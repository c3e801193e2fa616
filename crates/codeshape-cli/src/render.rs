//! Plain-text rendering for `--format pretty`.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use codeshape_model::{DeclKind, DeclarationReport};
use codeshape_token::TokenStream;

/// One line per token: id, line, kind and escaped text.
pub fn tokens(stream: &TokenStream) -> String {
    let mut out = String::new();
    for token in stream {
        let _ = writeln!(
            out,
            "{:>6} {:>5}  {:<26} {}",
            token.id(),
            token.line(),
            token.kind().name(),
            token.text().escape_debug()
        );
    }
    out
}

/// Indented declaration tree with line ranges and metrics.
pub fn outline(report: &DeclarationReport) -> String {
    let mut out = String::new();
    outline_into(&mut out, report, 0);
    out
}

fn outline_into(out: &mut String, report: &DeclarationReport, depth: usize) {
    let label = match report.kind {
        DeclKind::File => report.name.clone(),
        DeclKind::Function | DeclKind::Method => report.signature.clone(),
        kind => format!("{} {}", kind_word(kind), report.name),
    };
    let _ = write!(
        out,
        "{:indent$}{label}  [{}-{}] ccn={} crap={:.2}",
        "",
        report.start_line,
        report.end_line,
        report.ccn,
        report.crap,
        indent = depth * 2
    );
    if report.incomplete {
        out.push_str(" (incomplete)");
    }
    out.push('\n');
    for child in &report.children {
        outline_into(out, child, depth + 1);
    }
}

fn kind_word(kind: DeclKind) -> &'static str {
    match kind {
        DeclKind::File => "file",
        DeclKind::Class => "class",
        DeclKind::Interface => "interface",
        DeclKind::Trait => "trait",
        DeclKind::Function => "function",
        DeclKind::Method => "method",
    }
}

/// Table of every callable: qualified name, CCN, coverage and CRAP.
pub fn metrics(file: &str, report: &DeclarationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{file}");
    for (name, decl) in callables(report) {
        let _ = writeln!(
            out,
            "  {:<40} ccn={:<4} cov={:>6.2}% crap={:.2}",
            name, decl.ccn, decl.coverage, decl.crap
        );
    }
    out
}

/// One callable in `metrics --format json` output.
#[derive(Debug, Serialize)]
pub struct MetricsRow {
    pub file: String,
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
    pub ccn: u32,
    pub coverage: f64,
    pub crap: f64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub incomplete: bool,
}

pub fn metric_rows(file: &Path, report: &DeclarationReport) -> Vec<MetricsRow> {
    callables(report)
        .into_iter()
        .map(|(name, decl)| MetricsRow {
            file: file.display().to_string(),
            name,
            start_line: decl.start_line,
            end_line: decl.end_line,
            ccn: decl.ccn,
            coverage: decl.coverage,
            crap: decl.crap,
            incomplete: decl.incomplete,
        })
        .collect()
}

/// Functions and methods keyed the way coverage maps key them.
pub fn callables(report: &DeclarationReport) -> Vec<(String, &DeclarationReport)> {
    let mut out = Vec::new();
    for child in &report.children {
        match child.kind {
            DeclKind::Function => out.push((child.name.clone(), child)),
            kind if kind.is_type() => {
                for method in &child.children {
                    out.push((format!("{}::{}", child.name, method.name), method));
                }
            }
            _ => {}
        }
    }
    out
}
