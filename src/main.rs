fn main() {
    use clap::Parser;
    use std::error::Error;
    let args = bookscrape::cli::Args::parse();
    if let Err(e) = bookscrape::logging::init() {
        eprintln!("{}", e);
    }
    tracing::debug!(?args, "parsed cli");
    if let Err(e) = bookscrape::cli::run(&args) {
        tracing::error!("{}", e);
        let mut source = e.source();
        while let Some(s) = source {
            tracing::error!("  cause: {}", s);
            source = s.source();
        }
        std::process::exit(e.exit_code());
    }
}
