fn main() {
    if let Err(e) = layoutgen_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
