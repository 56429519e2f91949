use ansi_term::{Colour::Red, Style};
use formula::lang::{ErrorList, Library};
use formula::mach::{Backend, EvaluationContext, Params, Program, Settings, StepResult};
use linefeed::{Interface, ReadResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const USAGE: &str = "\
usage: formula
       formula FILE
       formula FILE NAME [--math double|fixed[:BITS]|arbitrary[:PREC]]
                         [--size WxH] [--maxit N] [--p1 RE,IM] ... [--p5 RE,IM]
                         [--seed N] [--list]";

const SHADES: &[u8] = b" .:-=+*%#";

pub fn main() {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");
    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.len() {
        0 => prompt_loop().map_err(|e| e.to_string()),
        1 => list(&args[0]),
        _ => parse_options(&args).and_then(|options| render(&options, interrupted)),
    };
    if let Err(error) = result {
        eprintln!("{}", Style::new().bold().paint(error));
        std::process::exit(1);
    }
}

/// Each line entered is a formula body. Prints its listing or its errors.
fn prompt_loop() -> std::io::Result<()> {
    let interface = Interface::new("formula")?;
    interface.set_prompt("formula> ")?;
    let settings = Settings::default();
    loop {
        let line = match interface.read_line()? {
            ReadResult::Input(line) => line,
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        interface.add_history_unique(line.clone());
        match Program::from_body(&line, &settings) {
            Ok(program) => {
                interface.write_fmt(format_args!("{}", program))?;
                interface.write_fmt(format_args!(
                    "{} instructions, checksum {:08X}\n",
                    program.len(),
                    program.checksum()
                ))?;
            }
            Err(errors) => {
                interface.write_fmt(format_args!("{}", report(&errors, &line)))?;
            }
        }
    }
    Ok(())
}

fn report(errors: &ErrorList, source: &str) -> String {
    Red.bold().paint(errors.report(source)).to_string()
}

fn read(filename: &str) -> Result<String, String> {
    std::fs::read_to_string(filename).map_err(|e| format!("{}: {}", filename, e))
}

/// Prints every entry of a library file and whether it compiles.
fn list(filename: &str) -> Result<(), String> {
    if filename.starts_with('-') {
        return Err(USAGE.to_string());
    }
    let source = read(filename)?;
    let library = Library::parse(&source);
    let settings = Settings::default();
    for entry in library.entries() {
        match library.formula(&entry.name, &settings.limits) {
            Ok(formula) => println!("{:<20} {:?}", formula.name, formula.symmetry),
            Err(errors) => {
                let first = errors.iter().next().map(|e| e.code().to_string());
                println!("{:<20} {}", entry.name, Red.paint(first.unwrap_or_default()));
            }
        }
    }
    Ok(())
}

struct Options {
    filename: String,
    name: String,
    settings: Settings,
    params: Params,
    list: bool,
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        filename: args[0].clone(),
        name: args[1].clone(),
        settings: Settings::default(),
        params: Params {
            xdots: 78,
            ydots: 32,
            ..Params::default()
        },
        list: false,
    };
    let mut iter = args[2..].iter();
    while let Some(arg) = iter.next() {
        if arg == "--list" {
            options.list = true;
            continue;
        }
        let value = iter.next().ok_or_else(|| USAGE.to_string())?;
        match arg.as_str() {
            "--math" => {
                options.settings.backend =
                    Backend::from_name(value).ok_or_else(|| format!("unknown math: {}", value))?
            }
            "--size" => {
                let (w, h) = pair(value, 'x')?;
                options.params.xdots = w as usize;
                options.params.ydots = h as usize;
            }
            "--maxit" => {
                options.params.maxit = value.parse().map_err(|_| format!("bad maxit: {}", value))?
            }
            "--seed" => {
                options.params.seed = Some(value.parse().map_err(|_| format!("bad seed: {}", value))?)
            }
            "--p1" | "--p2" | "--p3" | "--p4" | "--p5" => {
                let n = (arg.as_bytes()[3] - b'0') as usize;
                options.params.set_p(n, pair(value, ',')?);
            }
            _ => return Err(USAGE.to_string()),
        }
    }
    Ok(options)
}

fn pair(s: &str, separator: char) -> Result<(f64, f64), String> {
    let mut parts = s.splitn(2, separator);
    let mut next = || -> Result<f64, String> {
        parts
            .next()
            .unwrap_or("0")
            .trim()
            .parse()
            .map_err(|_| format!("bad value: {}", s))
    };
    Ok((next()?, next()?))
}

/// Renders an iteration count map of the formula. Ctrl-C stops between
/// pixels.
fn render(options: &Options, interrupted: Arc<AtomicBool>) -> Result<(), String> {
    let source = read(&options.filename)?;
    let program = match Program::compile(&options.name, &source, &options.settings) {
        Ok(program) => program,
        Err(errors) => return Err(report(&errors, &source)),
    };
    if let Some(warning) = program.warning() {
        eprintln!("{}", Style::new().bold().paint(warning.to_string()));
    }
    if options.list {
        print!("{}", program);
        println!(
            "{} instructions, checksum {:08X}",
            program.len(),
            program.checksum()
        );
    }
    let maxit = options.params.maxit as usize;
    let mut context = EvaluationContext::with_program(program, options.params.clone());
    for row in 0..options.params.ydots {
        let mut line = String::with_capacity(options.params.xdots);
        for col in 0..options.params.xdots {
            if interrupted.load(Ordering::SeqCst) {
                return Err("interrupted".to_string());
            }
            let count = match context.init_pixel(col, row) {
                Ok(()) => iterations(&mut context, maxit),
                Err(_) => 0,
            };
            line.push(shade(count, maxit));
        }
        println!("{}", line);
    }
    Ok(())
}

fn iterations(context: &mut EvaluationContext, maxit: usize) -> usize {
    let mut count = 0;
    while count < maxit {
        match context.step() {
            StepResult::Continue => count += 1,
            StepResult::Bailout | StepResult::Overflow => break,
        }
    }
    count
}

fn shade(count: usize, maxit: usize) -> char {
    if count >= maxit {
        '@'
    } else {
        SHADES[count % SHADES.len()] as char
    }
}
