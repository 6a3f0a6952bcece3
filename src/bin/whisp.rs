use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{error::ErrorKind, Parser};
use whisp::{
    config::{EnvSource, Settings},
    diarize::{CommandDiarizer, Diarizer},
    engines::{whisper::WhisperRecognizer, Recognizer},
    output::{atomic_write, write_stdout},
    pipeline::FALLBACK_NOTE,
    Options, Pipeline, WhispError,
};

#[derive(Parser, Debug)]
#[command(
    name = "whisp",
    about = "transcribe audio to markdown with speaker diarization",
    version
)]
struct Args {
    /// Audio file to transcribe
    file: PathBuf,

    /// Output file or directory (default: stdout)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Whisper model name (default: auto-select based on device)
    #[arg(short, long, value_name = "MODEL")]
    model: Option<String>,

    /// Language code (default: auto-detect)
    #[arg(short, long, value_name = "LANG")]
    language: Option<String>,

    /// Number of speakers hint (1 = skip diarization)
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    speakers: Option<u32>,

    /// Exit with an error on any failure instead of degrading
    #[arg(long)]
    strict: bool,

    /// Print progress to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print the suggested output filename to stderr and exit
    #[arg(long)]
    suggest_filename: bool,

    /// Keep a `.partial` file when writing the output fails
    #[arg(long)]
    keep_partial: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "off" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                return ExitCode::from(WhispError::InvalidArguments(String::new()).exit_code());
            }
        },
    };

    init_logging(args.verbose);

    let settings = Settings::from_source(&EnvSource);
    let recognizer = WhisperRecognizer::new(&settings.model_dir);
    let diarizer = CommandDiarizer::new(&settings.diarize_command, EnvSource);
    let mut pipeline = Pipeline::new(recognizer, diarizer);

    let code = execute(
        &args,
        &mut pipeline,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    ExitCode::from(code)
}

/// Runs one invocation and returns its exit code. Fatal errors become a single
/// `error: <message>` line on `diag`.
fn execute<R: Recognizer, D: Diarizer>(
    args: &Args,
    pipeline: &mut Pipeline<R, D>,
    out: &mut impl Write,
    diag: &mut impl Write,
) -> u8 {
    match run(args, pipeline, out, diag) {
        Ok(()) => 0,
        Err(err) => {
            let _ = writeln!(diag, "error: {err}");
            err.exit_code()
        }
    }
}

fn run<R: Recognizer, D: Diarizer>(
    args: &Args,
    pipeline: &mut Pipeline<R, D>,
    out: &mut impl Write,
    diag: &mut impl Write,
) -> Result<(), WhispError> {
    let options = Options {
        model: args.model.clone(),
        language: args.language.clone(),
        speakers: args.speakers,
        strict: args.strict,
    };

    let run = pipeline.run(&args.file, &options)?;
    for warning in &run.warnings {
        let _ = writeln!(diag, "warning: {warning}");
        let _ = writeln!(diag, "{FALLBACK_NOTE}");
    }

    if args.suggest_filename {
        let _ = writeln!(diag, "{}", run.suggested_filename);
        return Ok(());
    }

    match &args.output {
        Some(output) => {
            let path = if output.is_dir() {
                output.join(&run.suggested_filename)
            } else {
                output.clone()
            };
            atomic_write(&path, &run.markdown, args.keep_partial)?;
            log::info!("wrote: {}", path.display());
        }
        None => write_stdout(out, &run.markdown)
            .map_err(|err| WhispError::Output(format!("failed to write stdout: {err}")))?,
    }

    Ok(())
}
