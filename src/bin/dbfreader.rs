use std::ffi::OsString;
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use dbfreader::display::{self, DEFAULT_MAX_RECORDS};
use dbfreader::{export_to_path, Table, TableEncoding, TableOptions};

#[derive(Parser, Debug)]
#[command(
    name = "dbfreader",
    version,
    about = "Show the content of a FoxPro table (.dbf) and export it to CSV",
    after_help = r#"EXAMPLES
  $ dbfreader testdata/TEST.DBF
  $ dbfreader myfile.dbf big5
  $ dbfreader myfile.dbf big5 --csv
  $ dbfreader myfile.dbf --csv=out.csv --no-display

Supported encodings: win1250 (default), big5, utf8"#
)]
struct Cli {
    /// The table to open
    path: PathBuf,

    /// Encoding of the text fields, unknown names fall back to win1250
    encoding: Option<String>,

    /// Export to CSV, next to the table unless a path is given (--csv=file.csv)
    #[arg(long, num_args = 0..=1, require_equals = true, value_name = "PATH")]
    csv: Option<Option<PathBuf>>,

    /// Skip console display (useful with --csv)
    #[arg(long)]
    no_display: bool,
}

impl Cli {
    fn table_encoding(&self) -> TableEncoding {
        self.encoding
            .as_deref()
            .map_or_else(TableEncoding::default, TableEncoding::from_name_or_default)
    }

    /// Where the CSV goes, `None` when no export was asked for
    fn csv_output(&self) -> Option<PathBuf> {
        match &self.csv {
            None => None,
            Some(Some(path)) => Some(path.clone()),
            Some(None) => Some(self.path.with_extension("csv")),
        }
    }
}

/// Keeps the arguments the command line understands.
///
/// The table path is always kept. The encoding is only read right after it,
/// and never when it looks like a flag. Unknown flags, extra positionals
/// and an empty `--csv=` are dropped.
fn known_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .enumerate()
        .filter(|(position, arg)| {
            if *position <= 1 {
                return true;
            }
            let Some(arg) = arg.to_str() else {
                return false;
            };
            match arg {
                "--csv" | "--no-display" | "-h" | "--help" | "-V" | "--version" => true,
                "--csv=" => false,
                _ if arg.starts_with("--csv=") => true,
                _ => *position == 2 && !arg.starts_with('-'),
            }
        })
        .map(|(_, arg)| arg)
        .collect()
}

#[derive(Debug)]
enum Failure {
    Open(dbfreader::Error),
    Export(dbfreader::Error),
    Output(io::Error),
}

impl From<io::Error> for Failure {
    fn from(error: io::Error) -> Self {
        Failure::Output(error)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Open(error) => write!(f, "Error opening DBF file: {}", error),
            Failure::Export(error) => write!(f, "Error exporting to CSV: {}", error),
            Failure::Output(error) => write!(f, "Error writing output: {}", error),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(known_args(std::env::args_os()));

    let default_level = if cli.no_display { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            log::error!("{}", failure);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Failure> {
    let encoding = cli.table_encoding();
    let csv_output = cli.csv_output();
    let show = !cli.no_display;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if show {
        writeln!(
            out,
            "Opening DBF file: {} (encoding: {})",
            cli.path.display(),
            encoding
        )?;
        if let Some(csv_path) = &csv_output {
            writeln!(out, "Will export to CSV: {}", csv_path.display())?;
        }
    }

    let options = TableOptions::new().with_encoding(encoding);
    let mut table = Table::open_with_options(&cli.path, options).map_err(Failure::Open)?;

    if show {
        display::print_summary(&mut out, &table)?;
    }

    if let Some(csv_path) = &csv_output {
        if show {
            writeln!(out, "Exporting to CSV: {}...", csv_path.display())?;
        }
        let summary = export_to_path(&mut table, csv_path).map_err(Failure::Export)?;
        log::debug!("{:?}", summary);
        if show {
            writeln!(
                out,
                "Successfully exported {} records to {}",
                summary.records_written,
                csv_path.display()
            )?;
        }
    }

    if !show {
        return Ok(());
    }

    display::print_field_details(&mut out, table.fields())?;
    display::print_records(&mut out, &mut table, DEFAULT_MAX_RECORDS)?;
    display::print_navigation_demo(&mut out, &mut table)?;
    display::print_record_json(&mut out, &mut table, 0)?;
    writeln!(out, "\nDone!")?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        let args = std::iter::once("dbfreader")
            .chain(args.iter().copied())
            .map(OsString::from);
        Cli::try_parse_from(known_args(args)).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn path_only() {
        let cli = parse(&["data/TEST.DBF"]);
        assert_eq!(cli.path, Path::new("data/TEST.DBF"));
        assert_eq!(cli.table_encoding(), TableEncoding::Win1250);
        assert_eq!(cli.csv_output(), None);
        assert!(!cli.no_display);
    }

    #[test]
    fn encoding_and_csv_next_to_table() {
        let cli = parse(&["data/TEST.DBF", "BIG5", "--csv"]);
        assert_eq!(cli.table_encoding(), TableEncoding::Big5);
        assert_eq!(cli.csv_output(), Some(PathBuf::from("data/TEST.csv")));
    }

    #[test]
    fn csv_with_explicit_path() {
        let cli = parse(&["stations.dbf", "--csv=out/stations.csv", "--no-display"]);
        assert_eq!(cli.encoding, None);
        assert_eq!(cli.csv_output(), Some(PathBuf::from("out/stations.csv")));
        assert!(cli.no_display);
    }

    #[test]
    fn unknown_encoding_falls_back() {
        let cli = parse(&["stations.dbf", "latin9"]);
        assert_eq!(cli.table_encoding(), TableEncoding::Win1250);
    }

    #[test]
    fn csv_path_needs_equals() {
        // a value after a space is neither the csv path nor the encoding
        let cli = parse(&["stations.dbf", "--csv", "utf8"]);
        assert_eq!(cli.table_encoding(), TableEncoding::Win1250);
        assert_eq!(cli.csv_output(), Some(PathBuf::from("stations.csv")));
    }

    #[test]
    fn path_is_required() {
        assert!(Cli::try_parse_from(["dbfreader"]).is_err());
    }

    #[test]
    fn unknown_flags_are_ignored() {
        let cli = parse(&["stations.dbf", "--verbose", "--csv", "--colour=auto"]);
        assert_eq!(cli.encoding, None);
        assert_eq!(cli.csv_output(), Some(PathBuf::from("stations.csv")));
    }

    #[test]
    fn encoding_only_right_after_path() {
        let cli = parse(&["stations.dbf", "big5", "extra", "utf8"]);
        assert_eq!(cli.table_encoding(), TableEncoding::Big5);

        let cli = parse(&["stations.dbf", "--no-display", "utf8"]);
        assert_eq!(cli.encoding, None);
        assert!(cli.no_display);
    }

    #[test]
    fn empty_csv_path_means_no_export() {
        let cli = parse(&["stations.dbf", "--csv="]);
        assert_eq!(cli.csv_output(), None);
    }
}
