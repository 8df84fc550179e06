use std::fs::File;
use std::io::{self, stdin, stdout, BufWriter, Write};
use std::path::Path;

use ais::messages::Message;
use ais::stream::{FileSource, LineReader, SentenceStream, TcpSource, UdpSource};
use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::Transport;

pub fn run(
    sentences: &[String],
    file: Option<&Path>,
    output: Option<&Path>,
    strict: bool,
    connect: Option<&str>,
    transport: &Transport,
) -> Result<()> {
    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating output {path:?}"))?,
        )),
        None => Box::new(stdout().lock()),
    };

    if !sentences.is_empty() {
        return single(sentences, strict, &mut out);
    }

    match (connect, file) {
        (Some(addr), _) => match transport {
            Transport::Tcp => {
                info!("connecting to {addr} over tcp");
                let source =
                    TcpSource::connect(addr).with_context(|| format!("connecting to {addr}"))?;
                stream(SentenceStream::new(source), strict, &mut out)
            }
            Transport::Udp => {
                info!("listening on {addr} over udp");
                let source =
                    UdpSource::bind(addr).with_context(|| format!("binding to {addr}"))?;
                stream(SentenceStream::new(source), strict, &mut out)
            }
        },
        (None, Some(path)) => {
            let source =
                FileSource::open(path).with_context(|| format!("opening input {path:?}"))?;
            stream(SentenceStream::new(source), strict, &mut out)
        }
        (None, None) => {
            let source = LineReader::new(stdin().lock());
            stream(SentenceStream::new(source), strict, &mut out)
        }
    }
}

/// Decode the fragments of exactly one message, failing on the first
/// error.
fn single(sentences: &[String], strict: bool, out: &mut dyn Write) -> Result<()> {
    let parts: Vec<&[u8]> = sentences.iter().map(String::as_bytes).collect();
    let msg = if strict {
        ais::decode_strict(&parts)
    } else {
        ais::decode(&parts)
    }
    .context("decoding sentence")?;
    writeln!(out, "{}", serde_json::to_string(&msg)?)?;
    Ok(())
}

/// Decode a stream of sentences, skipping anything undecodable. I/O errors
/// end the run.
fn stream<I>(sentences: SentenceStream<I>, strict: bool, out: &mut dyn Write) -> Result<()>
where
    I: Iterator<Item = io::Result<Vec<u8>>>,
{
    let mut count = 0u64;
    for zult in sentences {
        let sentence = zult.context("reading stream")?;
        if strict && !sentence.is_valid {
            debug!("skipping sentence with checksum mismatch");
            continue;
        }
        let bits = match sentence.bits() {
            Ok(bits) => bits,
            Err(err) => {
                debug!("skipping sentence: {err}");
                continue;
            }
        };
        match Message::decode_bits(&bits) {
            Ok(msg) => {
                writeln!(out, "{}", serde_json::to_string(&msg)?)?;
                count += 1;
            }
            Err(err) => debug!("skipping undecodable sentence: {err}"),
        }
    }
    info!("decoded {count} messages");
    Ok(())
}
