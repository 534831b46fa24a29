use std::path::Path;
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: handin-extract-text <file-path>");
        eprintln!();
        eprintln!("Prints the text a submission is compared by.");
        eprintln!();
        eprintln!("Supported formats:");
        eprintln!("  - Plain text files");
        eprintln!("  - C / C++ sources, lex and yacc grammars");
        process::exit(1);
    }

    let path = Path::new(&args[1]);

    match handin_extract_text::extract(path) {
        Ok(text) => {
            print!("{text}");
        }
        Err(e) => {
            eprintln!("Error extracting text from {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}
