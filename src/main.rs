use std::process::ExitCode;
use tcms_tester::cli;

#[tokio::main]
async fn main() -> ExitCode {
    tcms_tester::init();

    match cli::run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
