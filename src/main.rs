fn main() {
    #[cfg(feature = "logger")]
    env_logger::init();

    tinyopt::cli::cli();
}
