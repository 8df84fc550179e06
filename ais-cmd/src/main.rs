mod decode;
mod encode;

use std::io::stderr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone)]
enum Transport {
    Tcp,
    Udp,
}

impl clap::ValueEnum for Transport {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Tcp, Self::Udp]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            Self::Tcp => Some(clap::builder::PossibleValue::new("tcp")),
            Self::Udp => Some(clap::builder::PossibleValue::new("udp")),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Decode AIS sentences to JSON, one message per line.
    ///
    /// Sentences passed as arguments are decoded as the fragments of a
    /// single message. Otherwise lines are read from --file, a socket via
    /// --connect, or stdin, and malformed input is skipped with a log
    /// line.
    Decode {
        /// All fragments of one message.
        sentences: Vec<String>,

        /// Read sentences from this file instead of stdin.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Write decoded JSON here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail on checksum mismatches instead of decoding anyway.
        #[arg(long)]
        strict: bool,

        /// Stream from host:port instead of a file.
        #[arg(short, long, value_name = "host:port")]
        connect: Option<String>,

        /// Socket type used with --connect.
        #[arg(short, long, default_value = "tcp")]
        transport: Transport,
    },
    /// Encode JSON records to AIS sentences.
    ///
    /// Reads one JSON object per line; each must carry the message type
    /// under a `type` (or `msg_type`) key. Missing fields take their
    /// not-available defaults.
    Encode {
        /// Read records from this file instead of stdin.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Write sentences here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Talker id to emit.
        #[arg(long, default_value = "AIVDM")]
        talker: String,

        /// Radio channel to emit.
        #[arg(long, default_value = "A")]
        channel: char,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(stderr)
        .with_ansi(false)
        .without_time()
        .with_env_filter(
            EnvFilter::try_from_env("AIS_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Decode {
            sentences,
            file,
            output,
            strict,
            connect,
            transport,
        } => decode::run(
            &sentences,
            file.as_deref(),
            output.as_deref(),
            strict,
            connect.as_deref(),
            &transport,
        ),
        Commands::Encode {
            file,
            output,
            talker,
            channel,
        } => encode::run(file.as_deref(), output.as_deref(), &talker, channel),
    }
}
