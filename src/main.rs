fn main() {
    if let Err(e) = oskar::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
