//! Line sources and streaming decode iterators.
//!
//! A line source is any `Iterator<Item = io::Result<Vec<u8>>>` yielding one
//! sentence's worth of bytes per item. [SentenceStream] turns a line source
//! into assembled [Sentence]s, skipping comment lines, blank lines, and
//! malformed input; [MessageStream] additionally decodes payloads. I/O
//! errors pass through; bad sentences are logged and dropped, matching how
//! receivers behave on real feeds.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::net::{Shutdown, TcpStream, ToSocketAddrs, UdpSocket};
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;
use crate::messages::Message;
use crate::sentence::{Assembler, Nmea, Sentence};

/// Yields `\n`-terminated lines from any reader.
#[derive(Debug)]
pub struct LineReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> LineReader<R> {
    pub fn new(reader: R) -> Self {
        LineReader {
            reader: BufReader::new(reader),
        }
    }
}

impl<R: Read> Iterator for LineReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(err) => Some(Err(err)),
        }
    }
}

/// Line source reading from a file.
pub type FileSource = LineReader<File>;

impl FileSource {
    /// Open `path` for line-by-line reading.
    ///
    /// # Errors
    /// Any error opening the file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<FileSource> {
        Ok(LineReader::new(File::open(path)?))
    }
}

/// Line source over a TCP connection.
#[derive(Debug)]
pub struct TcpSource {
    reader: LineReader<TcpStream>,
}

impl TcpSource {
    /// Connect to `addr`.
    ///
    /// # Errors
    /// Any error establishing the connection.
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<TcpSource> {
        let stream = TcpStream::connect(addr)?;
        Ok(TcpSource {
            reader: LineReader::new(stream),
        })
    }

    /// Close the socket after `timeout` without data, ending the stream
    /// with a timeout error.
    ///
    /// # Errors
    /// Any error configuring the socket.
    pub fn set_idle_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.reader.reader.get_ref().set_read_timeout(timeout)?;
        Ok(())
    }

    /// A handle that cancels the stream from another thread; the blocked
    /// read returns and the iterator ends.
    ///
    /// # Errors
    /// Any error cloning the socket handle.
    pub fn shutdown_handle(&self) -> Result<TcpShutdown> {
        Ok(TcpShutdown(self.reader.reader.get_ref().try_clone()?))
    }
}

impl Iterator for TcpSource {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next()
    }
}

/// Cooperative close signal for a [TcpSource].
#[derive(Debug)]
pub struct TcpShutdown(TcpStream);

impl TcpShutdown {
    pub fn shutdown(&self) {
        if let Err(err) = self.0.shutdown(Shutdown::Both) {
            debug!("tcp shutdown: {err}");
        }
    }
}

/// Line source over bound UDP, one or more lines per datagram.
///
/// Senders must not split a sentence across datagrams.
#[derive(Debug)]
pub struct UdpSource {
    socket: UdpSocket,
    pending: VecDeque<Vec<u8>>,
}

impl UdpSource {
    const BUF_SIZE: usize = 4096;

    /// Bind to `addr` and receive datagrams.
    ///
    /// # Errors
    /// Any error binding the socket.
    pub fn bind<A: ToSocketAddrs>(addr: A) -> Result<UdpSource> {
        Ok(UdpSource {
            socket: UdpSocket::bind(addr)?,
            pending: VecDeque::new(),
        })
    }
}

impl Iterator for UdpSource {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(Ok(line));
            }
            let mut buf = vec![0u8; Self::BUF_SIZE];
            let n = match self.socket.recv(&mut buf) {
                Ok(n) => n,
                Err(err) => return Some(Err(err)),
            };
            self.pending.extend(
                buf[..n]
                    .split(|&b| b == b'\n')
                    .filter(|line| !line.is_empty())
                    .map(<[u8]>::to_vec),
            );
        }
    }
}

/// Assembled sentences from a line source.
///
/// Owns its [Assembler]; in-flight fragment groups are discarded when the
/// stream is dropped. Two sources must not share one stream.
#[derive(Debug)]
pub struct SentenceStream<I> {
    lines: I,
    assembler: Assembler,
}

impl<I> SentenceStream<I>
where
    I: Iterator<Item = io::Result<Vec<u8>>>,
{
    pub fn new(lines: I) -> Self {
        SentenceStream {
            lines,
            assembler: Assembler::new(),
        }
    }

    /// Use a preconfigured assembler, e.g. with a smaller in-flight window.
    pub fn with_assembler(lines: I, assembler: Assembler) -> Self {
        SentenceStream { lines, assembler }
    }

    /// Decode payloads as they complete, skipping undecodable sentences.
    pub fn messages(self) -> MessageStream<I> {
        MessageStream { sentences: self }
    }
}

impl<I> Iterator for SentenceStream<I>
where
    I: Iterator<Item = io::Result<Vec<u8>>>,
{
    type Item = Result<Sentence>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            let trimmed: &[u8] = {
                let mut l = &line[..];
                while let [rest @ .., b'\r' | b'\n'] = l {
                    l = rest;
                }
                l
            };
            if trimmed.is_empty() || trimmed[0] == b'#' {
                continue;
            }
            match Nmea::parse(trimmed) {
                Ok(Nmea::Gatehouse(wrapper)) => {
                    self.assembler.set_wrapper(wrapper);
                }
                Ok(Nmea::Ais(sentence)) => match self.assembler.push(sentence) {
                    Ok(Some(assembled)) => return Some(Ok(assembled)),
                    Ok(None) => {}
                    Err(err) => debug!("dropping assembled sentence: {err}"),
                },
                Err(err) => debug!("skipping malformed line: {err}"),
            }
        }
    }
}

/// Decoded messages from a line source.
pub struct MessageStream<I> {
    sentences: SentenceStream<I>,
}

impl<I> Iterator for MessageStream<I>
where
    I: Iterator<Item = io::Result<Vec<u8>>>,
{
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let sentence = match self.sentences.next()? {
                Ok(sentence) => sentence,
                Err(err) => return Some(Err(err)),
            };
            let bits = match sentence.bits() {
                Ok(bits) => bits,
                Err(err) => {
                    debug!("skipping sentence without payload: {err}");
                    continue;
                }
            };
            match Message::decode_bits(&bits) {
                Ok(msg) => return Some(Ok(msg)),
                Err(err) => debug!("skipping undecodable sentence: {err}"),
            }
        }
    }
}

/// Read assembled sentences from any reader.
pub fn read_sentences<R: Read>(reader: R) -> SentenceStream<LineReader<R>> {
    SentenceStream::new(LineReader::new(reader))
}

/// Read decoded messages from any reader.
pub fn read_messages<R: Read>(reader: R) -> MessageStream<LineReader<R>> {
    read_sentences(reader).messages()
}
