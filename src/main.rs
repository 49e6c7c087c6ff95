// src/main.rs

use tidyrun::{cli, logging, report_error, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("tidyrun: {err:?}");
    }

    let code = match run(args).await {
        Ok(code) => code,
        Err(err) => report_error(&err, &mut std::io::stderr()),
    };
    std::process::exit(code);
}
