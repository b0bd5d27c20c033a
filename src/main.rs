use std::{fs::read_to_string, path::PathBuf, process::exit, rc::Rc, time::Instant};

use clap::Parser;
use langcore::{
    ast::ast::Node,
    display_error,
    evaluator::evaluator::Evaluator,
    lexer::lexer::tokenize,
    operators::{context::OperatorContext, value::Value},
    parser::parser::parse,
};

/// Parses Lang scripts and evaluates them with the operator engine.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script file to run
    file: Option<PathBuf>,

    /// Runs the given source instead of a file
    #[arg(short, long)]
    eval: Option<String>,

    /// Prints the parsed nodes
    #[arg(long)]
    ast: bool,

    /// Only parses the script
    #[arg(long)]
    no_eval: bool,

    /// Prints the parser flags set by the script
    #[arg(long)]
    flags: bool,
}

fn main() {
    let args = Args::parse();

    let (source, file_name) = match (&args.eval, &args.file) {
        (Some(source), _) => (source.clone(), String::from("<eval>")),
        (None, Some(path)) => {
            let source = read_to_string(path).unwrap_or_else(|error| {
                eprintln!("Failed to read '{}': {}", path.display(), error);
                exit(1);
            });
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            (source, file_name)
        }
        (None, None) => {
            eprintln!("Either a script file or --eval is required");
            exit(2);
        }
    };

    let start = Instant::now();
    let tokens = tokenize(&source);
    println!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let (parser, nodes) = parse(tokens);
    println!("Parsed in {:?}", parse_start.elapsed());

    let mut has_errors = false;
    for node in &nodes {
        if let Node::ParsingError(error) = node {
            display_error(&error.to_error(), &source, &file_name);
            has_errors = true;
        }
    }

    if args.ast {
        for node in &nodes {
            println!("{}", node);
        }
    }

    if args.flags {
        for (name, value) in parser.flags() {
            println!("parser.{} = {}", name, value);
        }
    }

    if has_errors {
        exit(1);
    }

    if args.no_eval {
        return;
    }

    let evaluate_start = Instant::now();
    let mut evaluator = Evaluator::new();
    evaluator.define_native(
        "func.println",
        vec![],
        Rc::new(|_: &mut dyn OperatorContext, arguments: Vec<Value>| {
            let line = arguments
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join("");
            println!("{}", line);
            Value::Void
        }),
    );

    let value = evaluator.run(&nodes);
    println!("Evaluated in {:?}", evaluate_start.elapsed());

    match value {
        Value::Void => {}
        Value::Error(_) => {
            println!("{}", value);
            exit(1);
        }
        value => println!("{}", value),
    }

    println!("Total time: {:?}", start.elapsed());
}
