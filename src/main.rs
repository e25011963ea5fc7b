fn main() {
    match chordkeys::run() {
        Ok(report) if report.has_failures() => std::process::exit(2),
        Ok(_) => {}
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
