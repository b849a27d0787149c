use crate::infra::default_calculator;
use clap::Args;
use cvss_score::cvss::ScoreResult;
use cvss_score::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Vector string, e.g. "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:C/C:L/I:N/A:N"
    pub(crate) vector: String,
    /// Print the result as JSON instead of plain text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { vector, json } = args;

    let result = default_calculator().compute(&vector)?;

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("JSON output unavailable: {err}"),
        }
    } else {
        print!("{}", render_score(&result));
    }

    Ok(())
}

pub(crate) fn render_score(result: &ScoreResult) -> String {
    format!(
        "Vector: {}\nVersion: {}\nBase Score: {:.1}\n",
        result.vector(),
        result.version(),
        result.score()
    )
}
