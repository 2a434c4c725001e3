use std::process;

fn main() {
    if let Err(e) = subtext_cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
