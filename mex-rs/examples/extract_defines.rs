//! Read a source file for its definitions and print them, one per line.
//!
//! Usage: cargo run --example extract_defines -- <source> [escape]

use std::path::Path;
use std::process;

use mex::load_defines;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (source, escape) = match args.as_slice() {
        [source] => (source.clone(), ":".to_owned()),
        [source, escape] => (source.clone(), escape.clone()),
        _ => {
            eprintln!("usage: extract_defines <source> [escape]");
            process::exit(1);
        }
    };

    let env = match load_defines(Path::new(&source), &escape) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("extract_defines: {e}");
            process::exit(1);
        }
    };

    let mut entries: Vec<_> = env.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (name, value) in entries {
        println!("{name}={value}");
    }
}
