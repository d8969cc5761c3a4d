use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use std::process::{Command,Stdio}; // Run programs
use std::path::Path;
use std::fs::File;
use std::io::Write;

fn pipe_through(args: &[&str],input: &[u8]) -> Vec<u8> {
    let mut cmd = Command::cargo_bin("a2soft").expect("binary not found");
    let mut child = cmd.args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn child process");
    let mut stdin = child.stdin.take().expect("Failed to open stdin");
    let owned = input.to_vec();
    std::thread::spawn(move || {
        stdin.write_all(&owned).expect("Failed to write to stdin");
    });
    let output = child.wait_with_output().expect("Failed to read stdout");
    output.stdout
}

#[test]
fn parse_simple_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("a2soft")?;
    if let Ok(fd) = File::open(Path::new("tests").join("test.bas")) {
        cmd.arg("verify")
            .stdin(Stdio::from(fd))
            .assert()
            .success()
            .stderr(predicate::str::contains("Syntax OK"));
    }
    Ok(())
}

// N.b. extensive tokenization tests are in the language modules
#[test]
fn tokenize_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let test_prog =
r#"10 home
20 print a$
"#;
    let toks: Vec<u8> = vec![7,8,10,0,0x97,0,15,8,0x14,0,0xba,0x41,0x24,0,0,0];
    let stdout = pipe_through(&["tokenize","-a","2049"],test_prog.as_bytes());
    assert_eq!(stdout,toks);
    Ok(())
}

#[test]
fn detokenize_stdin() -> Result<(), Box<dyn std::error::Error>> {
    // bare tokens keep their trailing pad space
    let test_prog = "10  HOME \n20  PRINT A$\n";
    let toks: Vec<u8> = vec![7,8,10,0,0x97,0,15,8,0x14,0,0xba,0x41,0x24,0,0,0];
    let stdout = pipe_through(&["detokenize"],&toks);
    assert_eq!(String::from_utf8_lossy(&stdout),test_prog);
    Ok(())
}

#[test]
fn minify_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let test_prog = "10 goto 10: rem loop forever\n";
    let stdout = pipe_through(&["minify","--level","1"],test_prog.as_bytes());
    assert_eq!(String::from_utf8_lossy(&stdout),"10goto10\n\n");
    Ok(())
}

#[test]
fn renumber_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let test_prog = "10 GOTO 30\n20 PRINT\n30 END\n";
    let stdout = pipe_through(&["renumber","-b","30","-e","64000","-f","40","-s","1"],test_prog.as_bytes());
    assert_eq!(String::from_utf8_lossy(&stdout),"10 GOTO 40\n20 PRINT\n40 END\n");
    Ok(())
}

#[test]
fn renumber_stdin_default_bounds() -> Result<(), Box<dyn std::error::Error>> {
    // without -b and -e the whole program is renumbered
    let test_prog = "10 GOTO 30\n20 PRINT\n30 END\n";
    let stdout = pipe_through(&["renumber","-f","100","-s","10"],test_prog.as_bytes());
    assert_eq!(String::from_utf8_lossy(&stdout),"100 GOTO 120\n110 PRINT\n120 END\n");
    Ok(())
}

#[test]
fn move_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let test_prog = "10 GOTO 100\n20 END\n100 PRINT X\n110 GOTO 100\n";
    let stdout = pipe_through(&["move","-b","100","-e","64000","-f","30","-s","10"],test_prog.as_bytes());
    assert_eq!(String::from_utf8_lossy(&stdout),"10 GOTO 30\n20 END\n30 PRINT X\n40 GOTO 30\n");
    Ok(())
}
