//! # Applesoft analysis and transformations
//!
//! Tokenizing, detokenizing, minifying, and line renumbering for Applesoft BASIC.
//! The parser is provided by `tree_sitter_applesoft`.
//! The negative ASCII token maps are in `token_maps`.

mod token_maps;
#[cfg(test)]
mod detokenize_test;
#[cfg(test)]
mod renumber_test;
pub mod tokenizer;
pub mod minifier;
pub mod renumber;
pub mod settings;

use std::fmt::Write;
use log::error;
use crate::{STDRESULT,DYNERR};

/// zero page location of the start of program pointer
pub const PROG_PTR: usize = 103;

/// Get the load address implied by the line links in a tokenized program.
/// The first link points to the second line, so scan the first line's body
/// for its terminating null and subtract.  Errors out if the stream is too
/// short to contain a complete first line.
pub fn deduce_address(tokens: &[u8]) -> Result<u16,DYNERR> {
    let line2_addr = u16::from_le_bytes([
        *tokens.get(0).ok_or(crate::lang::Error::Detokenization)?,
        *tokens.get(1).ok_or(crate::lang::Error::Detokenization)?
    ]);
    let mut line2_rel = 4;
    loop {
        match tokens.get(line2_rel) {
            Some(0) => break,
            Some(_) => line2_rel += 1,
            None => {
                error!("tokenized program ended before first line terminator");
                return Err(Box::new(crate::lang::Error::Detokenization));
            }
        }
    }
    Ok(line2_addr - line2_rel as u16 - 1)
}

/// Starting in some stringlike context defined by `ctx`, where the trigger byte
/// has already been consumed, escape the remaining bytes within that context.
/// If there is a literal hex escape it is put as `\x5CxHH` where H is the hex.
/// Return the escaped string and the index to the terminator.
/// The terminator is not part of the returned string.
pub fn bytes_to_escaped_string_ex(bytes: &[u8], offset: usize, escapes: &[i64], terminator: &[u8], ctx: &str) -> (String,usize)
{
    assert!(ctx=="str" || ctx=="tok_data" || ctx=="tok_rem");
    const QUOTE: u8 = 34;
    const BACKSLASH: u8 = 92;
	let mut ans = String::new();
	let mut idx = offset;
	let mut quotes = 0;
    if ctx=="str" {
        quotes += 1;
    }
	while idx < bytes.len() {
		if ctx == "tok_data" && bytes[idx] == 0 {
			break;
        }
		if ctx == "tok_data" && quotes % 2 == 0 && terminator.contains(&bytes[idx]) {
			break;
        }
		if ctx != "tok_data" && terminator.contains(&bytes[idx]) {
			break;
        }
		if bytes[idx] == QUOTE {
			quotes += 1;
        }
		if bytes[idx] == BACKSLASH && idx + 3 < bytes.len() {
            let is_hex = |x: u8| -> bool {
                x>=48 && x<=57 || x>=65 && x<=70 || x>=97 && x<=102
            };
            if bytes[idx+1]==120 && is_hex(bytes[idx+2]) && is_hex(bytes[idx+3]) {
                ans += "\\x5c";
            } else {
                ans += "\\";
            }
        } else if escapes.contains(&(bytes[idx] as i64)) || bytes[idx] > 126 {
            let mut temp = String::new();
            write!(&mut temp,"\\x{:02x}",bytes[idx]).expect("unreachable");
            ans += &temp;
        } else {
			ans += std::str::from_utf8(&[bytes[idx]]).expect("unreachable");
        }
		idx += 1;
	}
	return (ans,idx);
}

/// Calls `bytes_to_escaped_string_ex` with `escapes` set to [10,13]
pub fn bytes_to_escaped_string(bytes: &[u8], offset: usize, terminator: &[u8], ctx: &str) -> (String,usize)
{
    let escapes = vec![10,13];
    bytes_to_escaped_string_ex(bytes, offset, &escapes, terminator, ctx)
}

/// Inverse of the escaping used in `bytes_to_escaped_string_ex`.
/// Hex escapes become the byte they stand for, everything else
/// passes through unchanged.
pub fn escaped_string_to_bytes(txt: &str) -> Vec<u8> {
    let is_hex = |x: u8| -> bool {
        x>=48 && x<=57 || x>=65 && x<=70 || x>=97 && x<=102
    };
    let src = txt.as_bytes();
    let mut ans = Vec::new();
    let mut idx = 0;
    while idx < src.len() {
        if src[idx]==92 && idx + 3 < src.len() && src[idx+1]==120 && is_hex(src[idx+2]) && is_hex(src[idx+3]) {
            let hex = std::str::from_utf8(&src[idx+2..idx+4]).expect("unreachable");
            ans.push(u8::from_str_radix(hex,16).expect("unreachable"));
            idx += 4;
        } else {
            ans.push(src[idx]);
            idx += 1;
        }
    }
    ans
}

/// Write a tokenized program into a memory image, updating the zero page pointers.
/// The image must already have the start of program in `PROG_PTR` and HIMEM in 115-116.
/// The variable space pointers are set to the end of the program.
pub fn store_program(img: &mut [u8], tokens: &[u8]) -> STDRESULT {
    if img.len() < 65536 {
        error!("memory image is too small");
        return Err(Box::new(crate::lang::Error::OutOfRange));
    }
    let start = u16::from_le_bytes([img[PROG_PTR],img[PROG_PTR+1]]) as usize;
    let end = start + tokens.len();
    let himem = u16::from_le_bytes([img[115],img[116]]) as usize;
    if end > himem {
        error!("program does not fit below HIMEM");
        return Err(Box::new(crate::lang::Error::OutOfRange));
    }
    img[start..end].copy_from_slice(tokens);
    let var_space = u16::to_le_bytes(end as u16);
    for ptr in [105,107,109,175] {
        img[ptr] = var_space[0];
        img[ptr+1] = var_space[1];
    }
    // FRETOP starts at HIMEM
    img[111] = img[115];
    img[112] = img[116];
    Ok(())
}

/// Build a 64K memory image with the program loaded at `start_addr`.
/// HIMEM is set to 0x9600.
pub fn to_memory_image(tokens: &[u8], start_addr: u16) -> Result<Vec<u8>,DYNERR> {
    let mut img = vec![0;65536];
    let start = u16::to_le_bytes(start_addr);
    img[PROG_PTR] = start[0];
    img[PROG_PTR+1] = start[1];
    img[115] = 0x00;
    img[116] = 0x96;
    store_program(&mut img,tokens)?;
    Ok(img)
}
