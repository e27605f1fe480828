fn main() {
    #[cfg(feature = "cli")]
    binpatch::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("binpatch: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
