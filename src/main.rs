//! # Command Line Interface
//!
//! All subcommands are run from the `commands` module.

use clap::{arg,crate_version,Command,ArgAction};
use env_logger;
#[cfg(windows)]
use colored;
use a2soft::commands;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).unwrap();
    let long_help =
"a2soft is always invoked with exactly one of several subcommands.
The subcommands are generally designed to function as nodes in a pipeline.
PowerShell users may need to wrap the pipeline in a native shell.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
Language line entry:   `a2soft verify`
Language file check:   `cat myprog.bas | a2soft verify`
Tokenize to file:      `cat prog.bas | a2soft tokenize -a 2049 > prog.atok`
Detokenize from file:  `cat prog.atok | a2soft detokenize`
Minify:                `cat prog.bas | a2soft minify --level 3`
Renumber:              `cat prog.bas | a2soft renumber -b 10 -e 100 -f 100 -s 10`";

    let mut main_cmd = Command::new("a2soft")
        .about("Tokenizes and transforms Applesoft BASIC programs.")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(Command::new("verify")
        .about("read from stdin and error check"));
    main_cmd = main_cmd.subcommand(Command::new("minify")
        .arg(arg!(--level <LEVEL> "set all flags at once").required(false)
            .value_parser(["0","1","2","3"])
            .default_value("1"))
        .arg(arg!(--flags <VAL> "set flags individually").required(false)
            .default_value("1"))
        .about("reduce program size"));
    main_cmd = main_cmd.subcommand(Command::new("renumber")
        .arg(arg!(-b --beg <NUM> "lowest number to renumber").required(false).default_value("0"))
        .arg(arg!(-e --end <NUM> "highest number to renumber plus 1").required(false).default_value("64000"))
        .arg(arg!(-f --first <NUM> "first number").required(true))
        .arg(arg!(-s --step <NUM> "step between numbers").required(true))
        .arg(arg!(--norefs "do not update line number references").action(ArgAction::SetTrue))
        .about("renumber BASIC program lines"));
    main_cmd = main_cmd.subcommand(Command::new("move")
        .arg(arg!(-b --beg <NUM> "lowest number to move").required(true))
        .arg(arg!(-e --end <NUM> "highest number to move plus 1").required(true))
        .arg(arg!(-f --first <NUM> "first number").required(true))
        .arg(arg!(-s --step <NUM> "step between numbers").required(true))
        .arg(arg!(--norefs "do not update line number references").action(ArgAction::SetTrue))
        .about("move BASIC program lines elsewhere in the program"));
    main_cmd = main_cmd.subcommand(Command::new("tokenize")
        .arg(arg!(-a --addr <ADDRESS> "address of tokenized code").required(true))
        .arg(arg!(-c --console "format output for console").action(ArgAction::SetTrue))
        .about("read from stdin, tokenize, write to stdout"));
    main_cmd = main_cmd.subcommand(Command::new("detokenize")
        .arg(arg!(--config <JSON> "detokenizer settings").required(false))
        .about("read from stdin, detokenize, write to stdout"));

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("verify") {
        return commands::langx::verify(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("minify") {
        return commands::langx::minify(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("renumber") {
        return commands::langx::renumber(cmd,false);
    }
    if let Some(cmd) = matches.subcommand_matches("move") {
        return commands::langx::renumber(cmd,true);
    }
    if let Some(cmd) = matches.subcommand_matches("tokenize") {
        return commands::langx::tokenize(cmd);
    }
    if let Some(cmd) = matches.subcommand_matches("detokenize") {
        return commands::langx::detokenize(cmd);
    }
    log::error!("No subcommand was found, try `a2soft --help`");
    Err(Box::new(commands::CommandError::InvalidCommand))
}
