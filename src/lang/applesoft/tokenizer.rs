//! Module containing the Applesoft tokenizer and detokenizer

use std::collections::HashMap;

use tree_sitter;
use tree_sitter_applesoft;
use crate::lang;
use crate::lang::{Navigate,Navigation};
use super::{token_maps,settings};
use crate::{STDRESULT,DYNERR};

/// Handles tokenization of Applesoft BASIC
pub struct Tokenizer
{
	line: String,
    tokenized_program: Vec<u8>,
    tokenized_line: Vec<u8>,
    curr_addr: u16,
	tok_map: HashMap<&'static str,u8>,
	detok_map: HashMap<u8,&'static str>,
    config: settings::Settings
}

impl Navigate for Tokenizer
{
    fn visit(&mut self,curs:&tree_sitter::TreeCursor) -> Result<Navigation,DYNERR>
    {
		// At this point we assume we have ASCII in self.line
		let node_str = lang::node_text(&curs.node(),&self.line);

		// Primary line number
		if curs.node().kind()=="linenum" {
			if let Some(parent) = curs.node().parent() {
				if parent.kind()=="line" {
					match u16::from_str_radix(&node_str.replace(" ",""),10) {
						Ok(num) => {
							let bytes = u16::to_le_bytes(num);
							self.tokenized_line.push(bytes[0]);
							self.tokenized_line.push(bytes[1]);
							return Ok(Navigation::GotoSibling);
						},
						Err(_) => return Err(Box::new(lang::Error::Tokenization))
					}
				}
			}
		}
		// Anonymous nodes
		if !curs.node().is_named() {
			let mut cleaned = node_str.to_uppercase().replace(" ","").as_bytes().to_vec();
			self.tokenized_line.append(&mut cleaned);
			return Ok(Navigation::GotoSibling);
		}
		// Negative ASCII tokens (except DATA will be intercepted by parent statement)
		if let Some(tok) = self.tok_map.get(curs.node().kind()) {
			self.tokenized_line.push(*tok);
			return Ok(Navigation::GotoSibling);
		}
		// Required upper case
		if curs.node().kind().starts_with("name_") || curs.node().kind()=="real" {
			if curs.node().kind()=="name_amp" && curs.node().named_child_count()>0 {
				// overloaded tokens can hide in the ampersand name
				return Ok(Navigation::GotoChild);
			}
			let mut cleaned = node_str.to_uppercase().replace(" ","").as_bytes().to_vec();
			self.tokenized_line.append(&mut cleaned);
			return Ok(Navigation::GotoSibling);
		}
		// Persistent spaces and escapes
		if curs.node().kind()=="statement" {
			if let Some(tok) = curs.node().named_child(0) {
				// Text in the DATA statement is preserved unconditionally, so handle all at once and go out.
				// There is a problem with calculation of end of data in connection with quote parity that
				// cannot be solved in any satisfactory way (ROM handles it inconsistently).
				if tok.kind()=="tok_data" {
					if let Some(items) = self.line.get(tok.end_byte()..curs.node().end_byte()) {
						self.tokenized_line.push(*self.tok_map.get("tok_data").unwrap());
						self.tokenized_line.append(&mut super::escaped_string_to_bytes(items));
					}
					return Ok(Navigation::GotoSibling);
				}
			}
		}
		if curs.node().kind()=="str" {
			self.tokenized_line.append(&mut super::escaped_string_to_bytes(node_str.trim()));
			return Ok(Navigation::GotoSibling);
		}
		if curs.node().kind()=="terminal_str" {
			self.tokenized_line.append(&mut super::escaped_string_to_bytes(node_str.trim_start()));
			return Ok(Navigation::GotoSibling);
		}
		if curs.node().kind()=="comment_text" {
			self.tokenized_line.append(&mut super::escaped_string_to_bytes(&node_str));
			return Ok(Navigation::GotoSibling);
		}

		// If none of the above, look for terminal nodes and strip spaces
		if curs.node().named_child_count()==0 {
			let mut cleaned = node_str.replace(" ","").as_bytes().to_vec();
			self.tokenized_line.append(&mut cleaned);
			return Ok(Navigation::GotoSibling);
		}

		Ok(Navigation::GotoChild)
    }
}

impl Tokenizer
{
	/// Create a new `Tokenizer` structure
    pub fn new() -> Self
    {
        Self {
			line: String::new(),
            tokenized_line: Vec::<u8>::new(),
            tokenized_program: Vec::<u8>::new(),
            curr_addr: 2049,
			tok_map: HashMap::from(token_maps::TOK_MAP),
			detok_map: HashMap::from(token_maps::DETOK_MAP),
            config: settings::Settings::new()
         }
    }
    pub fn set_config(&mut self,config: settings::Settings) {
        self.config = config;
    }
	fn tokenize_line(&mut self,parser: &mut tree_sitter::Parser) -> STDRESULT {
		self.tokenized_line = Vec::new();
		let tree = match parser.parse(&self.line,None) {
			Some(tree) => tree,
			None => return Err(Box::new(lang::Error::ParsingError))
		};
		if tree.root_node().has_error() {
			return Err(Box::new(lang::Error::Syntax));
		}
		self.walk(&tree)?;
		let next_addr = self.curr_addr + self.tokenized_line.len() as u16 + 3;
		let by: [u8;2] = u16::to_le_bytes(next_addr);
		self.tokenized_line.insert(0,by[0]);
		self.tokenized_line.insert(1,by[1]);
		self.tokenized_line.push(0);
		self.curr_addr = next_addr;
		Ok(())
	}
	/// Tokenize a program contained in a UTF8 string, result is an array of bytes
	pub fn tokenize(&mut self,program: &str,start_addr: u16) -> Result<Vec<u8>,DYNERR> {
		self.curr_addr = start_addr;
		self.tokenized_program = Vec::new();
		let mut parser = tree_sitter::Parser::new();
		parser.set_language(&tree_sitter_applesoft::language()).expect("error loading applesoft grammar");
		for line in program.lines() {
			if line.trim().len()==0 {
				continue;
			}
			self.line = String::from(line) + "\n";
			self.tokenize_line(&mut parser)?;
			self.tokenized_program.append(&mut self.tokenized_line);
		}
		self.tokenized_program.push(0);
		self.tokenized_program.push(0);
		Ok(self.tokenized_program.clone())
	}
	/// Main detokenization loop, `start` points at the first line's link field.
	/// Unknown token codes come out as U+FFFD, runaway lines and images are cut
	/// off at the configured limits.
	fn detokenize_from(&self,img: &[u8],start: usize) -> Result<String,DYNERR> {
		const DATA_TOK: u8 = 131;
		const REM_TOK: u8 = 178;
		const QUOTE: u8 = 34;
		const COLON: u8 = 58;
		let escapes = &self.config.detokenizer.escapes;
		let max_lines = self.config.detokenizer.max_lines as usize;
		let max_line_length = self.config.detokenizer.max_line_length as usize;
		let mut addr = start;
		let mut code = String::new();
		let mut line_count = 0;
		while addr+3 < img.len() && addr < 0xfffd && (img[addr]!=0 || img[addr+1]!=0) && line_count < max_lines {
			addr += 2; // skip link address
			let line_num: u16 = img[addr] as u16 + img[addr+1] as u16*256;
			code += &(u16::to_string(&line_num) + " ");
			addr += 2;
			let line_addr = addr;
			while addr < img.len() && img[addr]!=0 && addr < line_addr + max_line_length {
				if img[addr]==QUOTE {
					code += "\"";
					let (escaped,next) = super::bytes_to_escaped_string_ex(img,addr+1,escapes,&[QUOTE,0],"str");
					code += &escaped;
					addr = next;
					if addr < img.len() && img[addr]==QUOTE {
						code += "\"";
						addr += 1;
					}
				} else if img[addr]==REM_TOK {
					code += " REM ";
					let (escaped,next) = super::bytes_to_escaped_string_ex(img,addr+1,escapes,&[0],"tok_rem");
					code += &escaped;
					addr = next;
				} else if img[addr]==DATA_TOK {
					code += " DATA ";
					let (escaped,next) = super::bytes_to_escaped_string_ex(img,addr+1,escapes,&[COLON,0],"tok_data");
					code += &escaped;
					addr = next;
				} else if img[addr] > 127 {
					match self.detok_map.get(&img[addr]) {
						Some(tok) => code += &(String::from(" ") + &tok.to_uppercase() + " "),
						None => code += "\u{fffd}"
					};
					addr += 1;
				} else {
					code.push(img[addr] as char);
					addr += 1;
				}
			}
			line_count += 1;
			code += "\n";
			addr += 1;
		}
		Ok(code)
	}
	/// Detokenize a bare token stream into a UTF8 string
	pub fn detokenize(&self,img: &[u8]) -> Result<String,DYNERR> {
		self.detokenize_from(img,0)
	}
	/// Detokenize from a memory image, the start of program is read
	/// from the zero page pointer
	pub fn detokenize_img(&self,img: &[u8]) -> Result<String,DYNERR> {
		if img.len() < 65536 {
			return Err(Box::new(lang::Error::OutOfRange));
		}
		let start = img[super::PROG_PTR] as usize + img[super::PROG_PTR+1] as usize*256;
		self.detokenize_from(img,start)
	}
}
