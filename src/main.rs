use std::process::ExitCode;

fn main() -> ExitCode {
    let Err(err) = offset_finder::app::run() else {
        return ExitCode::SUCCESS;
    };
    eprintln!("error: {err}");
    ExitCode::from(err.exit_code())
}
