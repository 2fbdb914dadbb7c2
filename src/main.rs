use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use scrutiny_sheet::generate_report;
use scrutiny_sheet::ReportConfig;
use scrutiny_sheet::StreamSelection;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "scrutiny-sheet",
    version,
    about = "Summarize admission percentages per stream and reservation category",
    long_about = "Reads an admission scrutiny workbook and writes, for one institution, \
                  the highest and lowest percentage of every reservation category, \
                  one section per requested stream."
)]
struct Cli {
    /// Institution name, matched case-insensitively as a substring of CollegeName
    #[arg(short, long)]
    college: String,

    /// Comma-separated streams, or `everything` for every stream in the data
    #[arg(short, long)]
    streams: String,

    /// Scrutiny workbook (.xlsx or .xlsm)
    #[arg(short, long)]
    input: PathBuf,

    /// Report workbook [default: <COLLEGE>_multiple_streams_marks.xlsx]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Glob selecting the input sheet [default: Sheet1, else the first sheet]
    #[arg(long, env = "SCRUTINY_SHEET")]
    sheet: Option<String>,

    /// Name of the report sheet
    #[arg(long, env = "SCRUTINY_OUTPUT_SHEET", default_value = "Sheet1")]
    output_sheet: String,
}

/// File name the report gets when no output is given.
fn default_output(college: &str) -> PathBuf {
    let college = college.replace(['/', '\\'], "_");
    PathBuf::from(format!("{college}_multiple_streams_marks.xlsx"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let streams = StreamSelection::parse(&cli.streams);
    let output = cli.output.unwrap_or_else(|| default_output(&cli.college));
    let config = ReportConfig {
        sheet: cli.sheet,
        output_sheet_name: cli.output_sheet,
    };

    let report = generate_report(&cli.input, &output, &cli.college, &streams, &config)
        .with_context(|| format!("Failed to build report from '{}'", cli.input.display()))?;

    println!("{}", output.display());
    if report.is_empty() {
        eprintln!("No records found for '{}'; the report is empty", cli.college);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_output_name() {
        assert_eq!(default_output("Alpha College"), PathBuf::from("Alpha College_multiple_streams_marks.xlsx"));
        assert_eq!(default_output("A/B"), PathBuf::from("A_B_multiple_streams_marks.xlsx"));
    }
}
