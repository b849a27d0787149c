use cvss_score::error::AppError;
use cvss_score_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("application error: {err}");
        let code = match err {
            AppError::Score(_) => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}
