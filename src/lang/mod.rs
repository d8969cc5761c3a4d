//! # Language Module
//!
//! Objects that want to walk a syntax tree can provide the `Navigate` trait.
//! Such objects can take some action depending on the status of `TreeCursor`.
//! Language specific operations such as tokenization are in the `applesoft` submodule.
//! Line number extraction and renumbering scaffolds are in `linenum`.

pub mod applesoft;
pub mod linenum;

use tree_sitter;
use lsp_types as lsp;
use colored::*;
use thiserror::Error;
use std::fmt::Write as FormattedWriter;
use std::io;
use std::io::Read;
use std::io::Write;
use atty;
use log::{debug,error};

use crate::{STDRESULT,DYNERR};

pub enum Navigation {
    GotoChild,
    GotoSibling,
    GotoParentSibling,
    Exit
}

#[derive(Error,Debug)]
pub enum Error {
    #[error("Syntax error")]
    Syntax,
    #[error("Invalid Line Number")]
    LineNumber,
    #[error("Tokenization error")]
    Tokenization,
    #[error("Detokenization error")]
    Detokenization,
    #[error("Out of range")]
    OutOfRange,
    #[error("Parsing error")]
    ParsingError
}

/// Get text of the node out of the source it was parsed from.
/// Returns empty string if the node's range is outside the source.
pub fn node_text(node: &tree_sitter::Node, source: &str) -> String {
    let rng = node.byte_range();
    match source.get(rng) {
        Some(txt) => txt.to_string(),
        None => String::new()
    }
}

/// Get an integer value from a node, spaces are allowed in the source text
pub fn node_integer<T: std::str::FromStr>(node: &tree_sitter::Node, source: &str) -> Option<T> {
    let txt = node_text(node, source).replace(" ","");
    txt.parse::<T>().ok()
}

/// Convert a tree-sitter range to an LSP range, with a shift in rows and columns.
/// The shift is needed when lines are parsed individually.
pub fn lsp_range(rng: tree_sitter::Range, row: isize, col: isize) -> lsp::Range {
    let start = lsp::Position::new(
        (rng.start_point.row as isize + row) as u32,
        (rng.start_point.column as isize + col) as u32);
    let end = lsp::Position::new(
        (rng.end_point.row as isize + row) as u32,
        (rng.end_point.column as isize + col) as u32);
    lsp::Range::new(start,end)
}

pub fn range_contains_range(outer: &lsp::Range, inner: &lsp::Range) -> bool {
    if inner.start.line < outer.start.line || inner.end.line > outer.end.line {
        return false;
    }
    if inner.start.line == outer.start.line && inner.start.character < outer.start.character {
        return false;
    }
    if inner.end.line == outer.end.line && inner.end.character > outer.end.character {
        return false;
    }
    true
}

/// Find the byte offset of an LSP position within `text`.
/// The character is clamped to the line's content, a row one past
/// the last line maps to the end of the text.
fn position_to_offset(text: &str, pos: &lsp::Position) -> Result<usize,DYNERR> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    if pos.line as usize >= lines.len() {
        if pos.line as usize > lines.len() {
            return Err(Box::new(Error::OutOfRange));
        }
        return Ok(text.len());
    }
    let mut offset = 0;
    for row in 0..pos.line as usize {
        offset += lines[row].len();
    }
    let content = lines[pos.line as usize].trim_end_matches(|c| c=='\r' || c=='\n');
    if pos.character as usize > content.len() {
        offset += lines[pos.line as usize].len();
    } else {
        offset += pos.character as usize;
    }
    Ok(offset)
}

/// Apply LSP text edits directly to a string.
/// Edit positions are interpreted relative to `row_offset`, which is useful
/// when `text` is a block of lines cut from a larger document.
/// Edits are sorted by position, with original order breaking ties, so that
/// deletions at a given spot land before insertions at the same spot, and
/// insertions at the same spot keep their order.  Overlapping edits are an error.
pub fn apply_edits(text: &str, edits: &[lsp::TextEdit], row_offset: u32) -> Result<String,DYNERR> {
    let mut spans = Vec::new();
    for (i,edit) in edits.iter().enumerate() {
        if edit.range.start.line < row_offset || edit.range.end.line < row_offset {
            return Err(Box::new(Error::OutOfRange));
        }
        let start = lsp::Position::new(edit.range.start.line - row_offset, edit.range.start.character);
        let end = lsp::Position::new(edit.range.end.line - row_offset, edit.range.end.character);
        let beg = position_to_offset(text, &start)?;
        let fin = position_to_offset(text, &end)?;
        if fin < beg {
            return Err(Box::new(Error::OutOfRange));
        }
        spans.push((beg,fin,i));
    }
    spans.sort();
    for pair in spans.windows(2) {
        if pair[0].1 > pair[1].0 {
            error!("overlapping edits at offset {}",pair[1].0);
            return Err(Box::new(Error::OutOfRange));
        }
    }
    let mut ans = text.to_string();
    for (beg,fin,i) in spans.iter().rev() {
        ans.replace_range(*beg..*fin, &edits[*i].new_text);
    }
    // edited documents always come out with a final newline
    if !ans.ends_with("\n") {
        ans.push('\n');
    }
    Ok(ans)
}

pub fn update_json_i64(maybe_obj: &serde_json::Value, key: &str, curr: &mut i64) {
    if let Some(obj) = maybe_obj.as_object() {
        if let Some(val) = obj.get(key) {
            if let Some(i) = val.as_i64() {
                *curr = i;
            }
        }
    }
}

pub fn update_json_vec(maybe_obj: &serde_json::Value, key: &str, curr: &mut Vec<i64>) {
    if let Some(obj) = maybe_obj.as_object() {
        if let Some(val) = obj.get(key) {
            if let Some(list) = val.as_array() {
                let mut new_vec = Vec::new();
                for item in list {
                    if let Some(i) = item.as_i64() {
                        new_vec.push(i);
                    }
                }
                *curr = new_vec;
            }
        }
    }
}

pub fn update_json_severity(maybe_obj: &serde_json::Value, key: &str, curr: &mut Option<lsp::DiagnosticSeverity>) {
    if let Some(obj) = maybe_obj.as_object() {
        if let Some(val) = obj.get(key) {
            match val.as_str() {
                Some("ignore") => *curr = None,
                Some("hint") => *curr = Some(lsp::DiagnosticSeverity::HINT),
                Some("info") => *curr = Some(lsp::DiagnosticSeverity::INFORMATION),
                Some("warn") => *curr = Some(lsp::DiagnosticSeverity::WARNING),
                Some("error") => *curr = Some(lsp::DiagnosticSeverity::ERROR),
                _ => {}
            }
        }
    }
}

pub trait Navigate {
    fn visit(&mut self,curs: &tree_sitter::TreeCursor) -> Result<Navigation,DYNERR>;
    fn walk(&mut self,tree: &tree_sitter::Tree) -> STDRESULT
    {
        let mut curs = tree.walk();
        let mut choice = Navigation::GotoChild;
        while ! matches!(choice,Navigation::Exit)
        {
            if matches!(choice,Navigation::GotoChild) && curs.goto_first_child() {
                choice = self.visit(&curs)?;
            } else if matches!(choice,Navigation::GotoParentSibling) && curs.goto_parent() && curs.goto_next_sibling() {
                choice = self.visit(&curs)?;
            } else if matches!(choice,Navigation::GotoSibling) && curs.goto_next_sibling() {
                choice = self.visit(&curs)?;
            } else if curs.goto_next_sibling() {
                choice = self.visit(&curs)?;
            } else if curs.goto_parent() {
                choice = Navigation::GotoSibling;
            } else {
                choice = Navigation::Exit;
            }
        }
        Ok(())
    }
}

pub struct SyntaxCheckVisitor {
    pub code: String,
    pub err_count: usize,
    pub curr_line: usize
}

impl SyntaxCheckVisitor {
    fn new(prog: String) -> Self {
        Self { code: prog, err_count: 0, curr_line: 0 }
    }
}

impl Navigate for SyntaxCheckVisitor {
    fn visit(&mut self,curs: &tree_sitter::TreeCursor) -> Result<Navigation,DYNERR>
    {
        if curs.node().is_error()
        {
            self.err_count += 1;
            let mut c = curs.clone();
            let b1 = c.node().start_byte();
            let b2 = c.node().end_byte();
            let mut l1 = b1;
            let mut l2 = b2;
            while c.goto_parent() {
                if c.node().kind()=="line" {
                    l1 = c.node().start_byte();
                    l2 = c.node().end_byte() - 1;
                }
            }
            eprintln!("{} row {} col {}","ERROR".red(),self.curr_line,b1);
            debug!("error bounds {} {} {} {}",l1,b1,b2,l2);
            debug!("line length {}",self.code.len());
            eprintln!("    {}{}{}",
                match self.code.get(l1..b1) { None => "???", Some(s) => s },
                match self.code.get(b1..b2) { None => "???".normal(), Some(s) => s.red().bold() },
                match self.code.get(b2..l2) { None => "???", Some(s) => s });
        }
        Ok(Navigation::GotoChild)
    }
}

/// Simple verify, returns an error if any issues
pub fn verify_str(lang: tree_sitter::Language,code: &str) -> STDRESULT {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&lang).expect("Error loading grammar");
    let mut visitor = SyntaxCheckVisitor::new(String::new());
    let mut iter = code.lines();
    while let Some(line) = iter.next()
    {
        let tree = match parser.parse(String::from(line) + "\n",None) {
            Some(tree) => tree,
            None => return Err(Box::new(Error::ParsingError))
        };
        visitor.code = String::from(String::from(line) + "\n");
        if line.len()>0 {
            visitor.walk(&tree)?;
        }
        visitor.curr_line += 1;
    }
    if visitor.err_count > 0 {
        return Err(Box::new(Error::Syntax));
    }
    Ok(())
}

/// detect syntax errors in the language.  Returns tuple with long and short result messages, or an error.
/// N.b. there is extra behavior in the event either stdin or stdout are the console.
pub fn verify_stdin(lang: tree_sitter::Language,prompt: &str) -> Result<(String,String),DYNERR>
{
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&lang).expect("Error loading grammar");
    let mut visitor = SyntaxCheckVisitor::new(String::new());
    let mut code = String::new();
    let mut res = String::new();
    let mut bottom_line = String::new();
    // if stdin is the console, collect line entry specially
    if atty::is(atty::Stream::Stdin)
    {
        eprintln!("Line entry interface.");
        eprintln!("This is a blind accumulation of lines.");
        eprintln!("Verify occurs when entry is terminated.");
        eprintln!("Accumulated lines can be piped.");
        eprintln!("`bye` terminates.");
        loop {
            eprint!("{} ",prompt);
            let mut line = String::new();
            io::stderr().flush()?;
            io::stdin().read_line(&mut line)?;
            if line=="bye\n" || line=="bye\r\n" {
                break;
            }
            code += &line;
        }
    }
    else
    {
        io::stdin().read_to_string(&mut code)?;
    }
    let mut iter = code.lines();
    while let Some(line) = iter.next()
    {
        let tree = match parser.parse(String::from(line) + "\n",None) {
            Some(tree) => tree,
            None => return Err(Box::new(Error::ParsingError))
        };
        visitor.code = String::from(line);
        if line.len()>0 {
            // if stdout is the console, include the s-expression per line
            if atty::is(atty::Stream::Stdout) {
                if res.len()==0 {
                    res += "\n";
                }
                res += &(line.to_string() + "\n" + &tree.root_node().to_sexp() + "\n");
            } else {
                res += &(line.to_string() + "\n");
            }
            visitor.walk(&tree)?;
        }
        visitor.curr_line += 1;
    }
    if visitor.err_count==0 {
        writeln!(bottom_line,"\u{2713} {}","Syntax OK".to_string().green())?;
        return Ok((res,bottom_line));
    } else {
        writeln!(res,"\u{2717} {} ({})","Syntax Errors".to_string().red(),visitor.err_count)?;
        return Err(Box::new(Error::Syntax));
    }
}
