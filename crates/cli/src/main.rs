use std::process::ExitCode;

fn main() -> ExitCode {
    pearlshop_cli::run()
}
