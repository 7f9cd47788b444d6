fn main() {
    if let Err(e) = healthops_lib::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
