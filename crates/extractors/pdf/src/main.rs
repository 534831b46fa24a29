use std::path::Path;
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: handin-extract-pdf <file-path>");
        eprintln!();
        eprintln!("Prints the text of every page of a PDF, in page order.");
        process::exit(1);
    }

    let path = Path::new(&args[1]);

    match handin_extract_pdf::extract(path) {
        Ok(text) => print!("{text}"),
        Err(e) => {
            eprintln!("Error extracting PDF from {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}
