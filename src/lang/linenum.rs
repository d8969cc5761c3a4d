//! # Module for handling line numbers
//!
//! Tools for extracting primary and secondary line numbers from a program,
//! and for building the edits that renumber a range of lines, or move a
//! block of lines past other lines.

use tree_sitter;
use lsp_types::{TextEdit,Range,Position};
use regex::Regex;
use crate::lang;
use std::collections::HashMap;
use log::trace;
use crate::DYNERR;

/// Information about one occurrence of a line number.
/// Occurrences are collected in document order.
#[derive(Clone)]
pub struct LabelInformation {
    pub num: usize,
    pub rng: Range,
    pub leading_space: usize,
    pub trailing_space: usize
}

/// Build the edit that changes one line label
pub fn apply_mapping(new_num: usize,info: &LabelInformation) -> TextEdit {
    let mut fmt_num = " ".repeat(info.leading_space);
    fmt_num += &new_num.to_string();
    fmt_num += &" ".repeat(info.trailing_space);
    TextEdit::new(info.rng,fmt_num)
}

/// Parse the line number at the start of a line, spaces are allowed
/// before and within the numeral.
fn leading_number(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit() || *c==' ').collect();
    digits.replace(" ","").parse::<usize>().ok()
}

/// Rewrite the line number references within one line of a block that is
/// being moved.  Edits cannot be used because the whole line is about to be
/// re-inserted somewhere else, so the replacements are done directly on the
/// string, tracking the offset as the numerals change width.
/// Returns the next label index and the updated line, if there are labels left.
fn next_updated_line(lines: &[&str], i0: usize, curr_row: usize, info: &[LabelInformation], mapping: &HashMap<usize,usize>) -> Option<(usize,String)> {
    if i0 >= info.len() {
        return None;
    }
    let mut updated = lines[curr_row].to_string();
    let mut offset: isize = 0;
    let mut i = i0;
    while i < info.len() && info[i].rng.start.line as usize == curr_row {
        if let Some(new_num) = mapping.get(&info[i].num) {
            let mut fmt_num = " ".repeat(info[i].leading_space);
            fmt_num += &new_num.to_string();
            fmt_num += &" ".repeat(info[i].trailing_space);
            let beg = (info[i].rng.start.character as isize + offset) as usize;
            let end = (info[i].rng.end.character as isize + offset) as usize;
            let tail = updated[end..].to_string();
            updated.truncate(beg);
            updated += &fmt_num;
            updated += &tail;
            offset += fmt_num.len() as isize - info[i].rng.end.character as isize + info[i].rng.start.character as isize;
        }
        i += 1;
    }
    Some((i,updated))
}

pub trait LineNumberTool {
    /// Default method should usually suffice.
    /// Call this with the cursor on the line number node.
    fn get_info(curs: &tree_sitter::TreeCursor,source: &str,row: isize) -> Result<LabelInformation,DYNERR> {
        if let Some(num) = lang::node_integer(&curs.node(), source) {
            let txt = lang::node_text(&curs.node(), source);
            trace!("found line number {} at row {}",num,row);
            return Ok(LabelInformation {
                num,
                rng: lang::lsp_range(curs.node().range(),row,0),
                leading_space: txt.len() - txt.trim_start().len(),
                trailing_space: txt.len() - txt.trim_end().len()
            });
        }
        Err(Box::new(lang::Error::LineNumber))
    }
    /// Collect line number occurrences in document order.
    /// Primaries are the line-defining numbers, secondaries are references
    /// such as GOTO and GOSUB targets.
    fn gather(&mut self,source: &str, row: isize, primaries: bool, secondaries: bool) -> Result<Vec<LabelInformation>,DYNERR>;
    /// Build edits to renumber the selected lines as [start,start+step,...]
    /// without disturbing the order of the lines.  The new range must fit
    /// between the nearest line numbers above and below the selection, or
    /// within [0,63999] on sides where there is no neighbor.
    /// If `update_refs`, references are updated globally.
    /// If you want to apply the returned edits outside the LSP context, use `crate::lang::apply_edits`.
    fn renumber_edits(&mut self,all_txt: &str, ext_sel: Option<Range>, start: &str, step: &str, update_refs: bool)
        -> Result<Vec<TextEdit>,String> {
        let l0 = match start.parse::<usize>() { Ok(n) => n, Err(_) => return Err("start and step parameters invalid".to_string()) };
        let dl = match step.parse::<usize>() { Ok(n) => n, Err(_) => return Err("start and step parameters invalid".to_string()) };
        if dl < 1 {
            return Err("start and step parameters invalid".to_string());
        }
        let lines = all_txt.lines().collect::<Vec<&str>>();
        if lines.len() == 0 {
            return Err("no lines in document".to_string());
        }
        let mut lower_guard: Option<isize> = None;
        let mut upper_guard: Option<isize> = None;
        let sel = match ext_sel {
            Some(raw) => {
                let mut sel = raw;
                if sel.end.character==0 && sel.end.line > sel.start.line {
                    sel.end.line -= 1;
                    sel.end.character = match lines.get(sel.end.line as usize) {
                        Some(s) => s.chars().count() as u32,
                        None => 0
                    };
                }
                if sel.end.line as usize >= lines.len() {
                    return Err("selection is out of range".to_string());
                }
                let mut l = sel.start.line as isize - 1;
                while l >= 0 && lower_guard.is_none() {
                    if let Some(num) = leading_number(lines[l as usize]) {
                        lower_guard = Some(num as isize + 1);
                    }
                    l -= 1;
                }
                let mut l = sel.end.line as usize + 1;
                while l < lines.len() && upper_guard.is_none() {
                    if let Some(num) = leading_number(lines[l]) {
                        upper_guard = Some(num as isize - 1);
                    }
                    l += 1;
                }
                sel
            },
            None => Range::new(
                Position::new(0,0),
                Position::new(lines.len() as u32 - 1, lines[lines.len()-1].chars().count() as u32))
        };
        let mut sel_txt = "".to_string();
        for l in sel.start.line..=sel.end.line {
            sel_txt += lines[l as usize];
            sel_txt += "\n";
        }
        let sel_primaries = match self.gather(&sel_txt,0,true,false) {
            Ok(result) => result,
            Err(_) => return Err("unable to gather line numbers".to_string())
        };
        let all_primaries = match self.gather(all_txt,0,true,false) {
            Ok(result) => result,
            Err(_) => return Err("unable to gather line numbers".to_string())
        };
        let all_secondaries = match self.gather(all_txt,0,false,true) {
            Ok(result) => result,
            Err(_) => return Err("unable to gather line number references".to_string())
        };
        if sel_primaries.len() < 1 {
            return Err("no line numbers in selection".to_string());
        }
        let lower = match lower_guard {
            Some(n) if n < 0 => 0,
            Some(n) => n,
            None => 0
        };
        let upper = match upper_guard {
            Some(n) if n > 63999 => 63999,
            Some(n) => n,
            None => 63999
        };
        let ln = l0 as isize + dl as isize * (sel_primaries.len() as isize - 1);
        if (l0 as isize) < lower || ln > upper {
            return Err(format!("new range ({},{}) exceeds bounds ({},{})",l0,ln,lower,upper));
        }
        let mut mapping = HashMap::new();
        for (i,info) in sel_primaries.iter().enumerate() {
            mapping.insert(info.num,l0 + i*dl);
        }
        let mut edits = Vec::new();
        // primary line numbers change only in the selected range
        for info in &all_primaries {
            if lang::range_contains_range(&sel,&info.rng) {
                if let Some(new_num) = mapping.get(&info.num) {
                    edits.push(apply_mapping(*new_num,info));
                }
            }
        }
        // references change globally
        if update_refs {
            for info in &all_secondaries {
                if let Some(new_num) = mapping.get(&info.num) {
                    edits.push(apply_mapping(*new_num,info));
                }
            }
        }
        Ok(edits)
    }
    /// Build edits to move the selected block of lines past other lines,
    /// relabeling the block as [start,start+step,...].  The new labels must
    /// not collide with or span any line outside the block.
    /// References within the block are always rewritten; if `update_refs`,
    /// references elsewhere in the document are rewritten too.
    /// If you want to apply the returned edits outside the LSP context, use `crate::lang::apply_edits`.
    fn move_edits(&mut self,all_txt: &str, ext_sel: Range, start: &str, step: &str, update_refs: bool)
        -> Result<Vec<TextEdit>,String> {
        let l0 = match start.parse::<usize>() { Ok(n) => n, Err(_) => return Err("start and step parameters invalid".to_string()) };
        let dl = match step.parse::<usize>() { Ok(n) => n, Err(_) => return Err("start and step parameters invalid".to_string()) };
        if dl < 1 {
            return Err("start and step parameters invalid".to_string());
        }
        let lines = all_txt.lines().collect::<Vec<&str>>();
        let mut sel = ext_sel;
        if sel.end.character==0 && sel.end.line > sel.start.line {
            sel.end.line -= 1;
            sel.end.character = match lines.get(sel.end.line as usize) {
                Some(s) => s.chars().count() as u32,
                None => 0
            };
        }
        if sel.end.line as usize >= lines.len() {
            return Err("selection is out of range".to_string());
        }
        let mut sel_txt = "".to_string();
        for l in sel.start.line..=sel.end.line {
            sel_txt += lines[l as usize];
            sel_txt += "\n";
        }
        let mov_lines = sel_txt.lines().collect::<Vec<&str>>();
        let mov_primaries = match self.gather(&sel_txt,0,true,false) {
            Ok(result) => result,
            Err(_) => return Err("unable to gather line numbers".to_string())
        };
        let mov_secondaries = match self.gather(&sel_txt,0,false,true) {
            Ok(result) => result,
            Err(_) => return Err("unable to gather line number references".to_string())
        };
        let all_primaries = match self.gather(all_txt,0,true,false) {
            Ok(result) => result,
            Err(_) => return Err("unable to gather line numbers".to_string())
        };
        let all_secondaries = match self.gather(all_txt,0,false,true) {
            Ok(result) => result,
            Err(_) => return Err("unable to gather line number references".to_string())
        };
        if mov_primaries.len() < 1 {
            return Err("no line numbers in selection".to_string());
        }
        let ln = l0 + dl * (mov_primaries.len() - 1);
        if all_primaries.iter().any(|info| info.num == l0) {
            return Err("start line already exists".to_string());
        }
        if ln > 63999 {
            return Err("upper bound of 63999 exceeded".to_string());
        }
        let mut edits = Vec::new();
        // verify the landing zone while finding the insertion point
        let mut insert_pos = Position::new(0,0);
        for (i,info) in all_primaries.iter().enumerate() {
            if info.num >= l0 && info.num <= ln {
                return Err(format!("existing line {} is within proposed range",info.num));
            }
            if info.num < l0 {
                insert_pos = Position::new(info.rng.start.line + 1,0);
                if i+1 == all_primaries.len() && !all_txt.ends_with("\n") {
                    edits.push(TextEdit::new(Range::new(insert_pos,insert_pos),"\n".to_string()));
                }
            }
        }
        let mut mapping = HashMap::new();
        for (i,info) in mov_primaries.iter().enumerate() {
            mapping.insert(info.num,l0 + i*dl);
        }
        // delete the old lines
        for l in sel.start.line..=sel.end.line {
            let old_rng = Range::new(Position::new(l,0),Position::new(l+1,0));
            edits.push(TextEdit::new(old_rng,"".to_string()));
        }
        // insert the updated lines
        let patt = Regex::new(r"^[0-9 ]*[0-9]").expect("Regex failure");
        let mut i0 = 0;
        let mut idx = 0;
        for l in sel.start.line..=sel.end.line {
            let mut updated = lines[l as usize].to_string();
            if updated.trim().len() > 0 {
                if let Some((next_i0,next_line)) = next_updated_line(&mov_lines,i0,(l - sel.start.line) as usize,&mov_secondaries,&mapping) {
                    i0 = next_i0;
                    updated = next_line;
                }
                let new_label = match mov_primaries.get(idx).and_then(|info| mapping.get(&info.num)) {
                    Some(num) => num.to_string(),
                    None => "???".to_string()
                };
                updated = patt.replace(&updated,new_label.as_str()).to_string();
                idx += 1;
            }
            edits.push(TextEdit::new(Range::new(insert_pos,insert_pos),updated + "\n"));
        }
        // update references outside the moved block
        if update_refs {
            if let Some(last) = mov_primaries.last() {
                if mapping.contains_key(&last.num) {
                    for info in &all_secondaries {
                        if !lang::range_contains_range(&sel,&info.rng) {
                            if let Some(new_num) = mapping.get(&info.num) {
                                edits.push(apply_mapping(*new_num,info));
                            }
                        }
                    }
                }
            }
        }
        Ok(edits)
    }
}
