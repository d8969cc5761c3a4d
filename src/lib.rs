//! # `a2soft` main library
//!
//! This library converts Applesoft BASIC between source encodings and the
//! tokenized form used by the Apple II ROM interpreter.  It also provides
//! source-level transformations such as minification and line renumbering.
//!
//! ## Architecture
//!
//! Language operations are built on the tree-sitter parser for Applesoft.
//! Generalized syntax walking is in `lang`, while the Applesoft specifics
//! are in `lang::applesoft`:
//! * `lang::applesoft::tokenizer` moves between source and token streams
//! * `lang::applesoft::minifier` shortens a program without changing behavior
//! * `lang::applesoft::renumber` renumbers or moves ranges of lines
//!
//! ## Encodings
//!
//! Tokenized Applesoft is a byte stream, one record per line, each record
//! carrying a little-endian link address and line number.  Arbitrary bytes
//! inside strings, comments, and DATA are carried through source text with
//! hex escapes, e.g., `\xFF`.  Detokenization can start from a full memory
//! image, in which case the program start is read from the zero page.

pub mod lang;
pub mod commands;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// Display binary to stdout in columns of hex, +ascii, and -ascii
pub fn display_block(start_addr: usize,block: &Vec<u8>) {
    let mut slice_start = 0;
    loop {
        let row_label = start_addr + slice_start;
        let mut slice_end = slice_start + 16;
        if slice_end > block.len() {
            slice_end = block.len();
        }
        let slice = block[slice_start..slice_end].to_vec();
        let txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x<32 => '.' as u8,
            x if x<127 => x,
            _ => '.' as u8
        }).collect();
        let neg_txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x>=160 && x<255 => x - 128,
            _ => 46
        }).collect();
        print!("{:04X} : ",row_label);
        for byte in slice {
            print!("{:02X} ",byte);
        }
        for _blank in slice_end..slice_start+16 {
            print!("   ");
        }
        print!("|+| {} ",String::from_utf8_lossy(&txt));
        for _blank in slice_end..slice_start+16 {
            print!(" ");
        }
        println!("|-| {}",String::from_utf8_lossy(&neg_txt));
        slice_start += 16;
        if slice_end==block.len() {
            break;
        }
    }
}
