use std::process::ExitCode;

use meshprep_app::{App, AppArgs};

fn main() -> ExitCode {
    App::run(AppArgs::parse())
}
