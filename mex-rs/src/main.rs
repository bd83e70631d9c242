use std::io::{self, Write};
use std::process;

use mex::cli;
use mex::{Error, Expander, Status};

fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("mex: {e}");
            eprintln!("{}", cli::USAGE);
            process::exit(1);
        }
    };

    let mut expander = Expander::new(args.escape);
    for (name, value) in args.inputs {
        expander.env_mut().set(name, value);
    }

    let mut out = io::stdout().lock();
    let result = expander.process_file(&args.source, &mut out);

    // Flush before exiting so output written ahead of an error survives
    // process::exit.
    if let Err(e) = out.flush() {
        eprintln!("mex: cannot write output: {e}");
        process::exit(1);
    }

    match result {
        Ok(Status::Completed) => {}
        Ok(Status::Halted(h)) => {
            eprintln!(
                "mex: {}:{}: stopped at undefined placeholder `{}`",
                h.path.display(),
                h.line,
                h.name
            );
        }
        Err(Error::Parse(e)) => {
            eprintln!("ERROR {e}");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("mex: {e}");
            process::exit(1);
        }
    }
}
