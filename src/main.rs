fn main() {
    if let Err(err) = handgest_lib::run() {
        eprintln!("handgest failed: {err:?}");
        std::process::exit(1);
    }
}
