fn main() {
    if let Err(err) = seroview::app::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
