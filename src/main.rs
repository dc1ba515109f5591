fn main() {
    if let Err(e) = scriptgl::host::run() {
        eprintln!("Host failed: {}", e);
        std::process::exit(1);
    }
}
