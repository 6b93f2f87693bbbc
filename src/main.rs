//! pineapl compiler CLI entry point

fn main() {
    pineapl::cli::run();
}
