fn main() {
    if let Err(e) = hermit::run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
