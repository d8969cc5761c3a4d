//! ## Language Analysis and Transformations

use std::io::{Read,Write};
use clap::parser::ValueSource;
use log::error;
use super::CommandError;
use crate::lang;
use crate::lang::applesoft;
use crate::STDRESULT;
const RCH: &str = "unreachable was reached";

pub fn verify(_cmd: &clap::ArgMatches) -> STDRESULT {
    let res = lang::verify_stdin(tree_sitter_applesoft::language(),"]")?;
    println!("{}",res.0);
    eprintln!("{}",res.1);
    Ok(())
}

pub fn minify(cmd: &clap::ArgMatches) -> STDRESULT {
    if atty::is(atty::Stream::Stdin) {
        error!("line entry is not supported for `minify`, please pipe something in");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut program = String::new();
    match std::io::stdin().read_to_string(&mut program) {
        Ok(_) => {},
        Err(e) => {
            error!("the file to minify could not be interpreted as a string");
            return Err(Box::new(e));
        }
    }
    if program.len()==0 {
        error!("minify did not receive any data from previous node");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    lang::verify_str(tree_sitter_applesoft::language(),&program)?;
    let mut minifier = applesoft::minifier::Minifier::new();
    if cmd.value_source("level").unwrap()==ValueSource::CommandLine {
        minifier.set_level(usize::from_str_radix(cmd.get_one::<String>("level").unwrap(),10)?);
    }
    if cmd.value_source("flags").unwrap()==ValueSource::CommandLine {
        minifier.set_flags(u64::from_str_radix(cmd.get_one::<String>("flags").unwrap(),10)?);
    }
    let object = minifier.minify(&program)?;
    println!("{}",&object);
    Ok(())
}

fn read_program_for(op: &str) -> Result<String,crate::DYNERR> {
    if atty::is(atty::Stream::Stdin) {
        error!("line entry is not supported for `{}`, please pipe something in",op);
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut program = String::new();
    match std::io::stdin().read_to_string(&mut program) {
        Ok(_) => {},
        Err(e) => {
            error!("the file to {} could not be interpreted as a string",op);
            return Err(Box::new(e));
        }
    }
    if program.len()==0 {
        error!("{} did not receive any data from previous node",op);
        return Err(Box::new(CommandError::InvalidCommand));
    }
    Ok(program)
}

pub fn renumber(cmd: &clap::ArgMatches, mv: bool) -> STDRESULT {
    let op = match mv { true => "move", false => "renumber" };
    let beg = usize::from_str_radix(cmd.get_one::<String>("beg").expect(RCH),10)?;
    let end = usize::from_str_radix(cmd.get_one::<String>("end").expect(RCH),10)?;
    let first = usize::from_str_radix(cmd.get_one::<String>("first").expect(RCH),10)?;
    let step = usize::from_str_radix(cmd.get_one::<String>("step").expect(RCH),10)?;
    let program = read_program_for(op)?;
    lang::verify_str(tree_sitter_applesoft::language(),&program)?;
    let mut renumberer = applesoft::renumber::Renumberer::new();
    if cmd.get_flag("norefs") {
        renumberer.set_flags(applesoft::renumber::flags::PASS_OVER_REFS);
    }
    let new_prog = match mv {
        true => renumberer.move_lines(&program,beg,end,first,step)?,
        false => renumberer.renumber(&program,beg,end,first,step)?
    };
    print!("{}",&new_prog);
    Ok(())
}

pub fn tokenize(cmd: &clap::ArgMatches) -> STDRESULT {
    let addr_opt = cmd.get_one::<String>("addr");
    let program = read_program_for("tokenize")?;
    lang::verify_str(tree_sitter_applesoft::language(),&program)?;
    if addr_opt==None {
        error!("address needed to tokenize");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    if let Ok(addr) = u16::from_str_radix(addr_opt.expect(RCH),10) {
        let mut tokenizer = applesoft::tokenizer::Tokenizer::new();
        let object = tokenizer.tokenize(&program,addr)?;
        if atty::is(atty::Stream::Stdout) || cmd.get_flag("console") {
            crate::display_block(addr as usize,&object);
        } else {
            std::io::stdout().write_all(&object).expect("could not write output stream");
        }
        return Ok(());
    }
    Err(Box::new(CommandError::OutOfRange))
}

pub fn detokenize(cmd: &clap::ArgMatches) -> STDRESULT {
    if atty::is(atty::Stream::Stdin) {
        error!("line entry is not supported for `detokenize`, please pipe something in");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut tok: Vec<u8> = Vec::new();
    std::io::stdin().read_to_end(&mut tok).expect("could not read input stream");
    if tok.len()==0 {
        error!("detokenize did not receive any data from previous node");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut tokenizer = applesoft::tokenizer::Tokenizer::new();
    if let Some(json) = cmd.get_one::<String>("config") {
        tokenizer.set_config(applesoft::settings::parse(json)?);
    }
    // a full memory image has the program start in the zero page,
    // anything shorter is taken to be a bare token stream
    let program = match tok.len() >= 65536 {
        true => tokenizer.detokenize_img(&tok)?,
        false => tokenizer.detokenize(&tok)?
    };
    for line in program.lines() {
        println!("{}",line);
    }
    Ok(())
}
