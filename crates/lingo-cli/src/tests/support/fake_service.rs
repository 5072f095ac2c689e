//! Fake flow service for behavioural tests.
//!
//! A TCP listener on an ephemeral port that accepts one connection, records
//! the request line, writes canned event lines and hangs up.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};

/// How the fake service ends the connection after writing its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::tests) enum Hangup {
    /// Close the socket straight away.
    Immediately,
    /// Keep the socket open until the client goes away.
    WhenClientLeaves,
}

pub(in crate::tests) struct FakeService {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    result: Arc<Mutex<Option<Result<()>>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeService {
    pub fn spawn(lines: Vec<String>) -> Result<Self> {
        Self::spawn_with_hangup(lines, Hangup::Immediately)
    }

    pub fn spawn_with_hangup(lines: Vec<String>, hangup: Hangup) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake service")?;
        listener
            .set_nonblocking(true)
            .context("fake service nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let result: Arc<Mutex<Option<Result<()>>>> = Arc::new(Mutex::new(None));
        let requests_clone = Arc::clone(&requests);
        let result_clone = Arc::clone(&result);
        let handle = thread::spawn(move || {
            let outcome = Self::serve_client(listener, &lines, &requests_clone, hangup);
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(outcome);
            }
        });
        Ok(Self {
            port,
            requests,
            result,
            handle: Some(handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the service thread and returns the recorded requests.
    pub fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake service thread panicked"))?;
        }
        if let Some(outcome) = self
            .result
            .lock()
            .map_err(|error| anyhow!("lock fake service result: {error}"))?
            .take()
        {
            outcome.context("fake service failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve_client(
        listener: TcpListener,
        lines: &[String],
        requests: &Arc<Mutex<Vec<String>>>,
        hangup: Hangup,
    ) -> Result<()> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    stream
                        .set_nonblocking(false)
                        .context("blocking client stream")?;
                    Self::record_request(&stream, requests)?;
                    return Self::respond(stream, lines, hangup);
                }
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                // Nobody connected; the command failed before reaching the
                // service.
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }

    fn record_request(stream: &TcpStream, requests: &Arc<Mutex<Vec<String>>>) -> Result<()> {
        let mut line = String::new();
        let mut reader = BufReader::new(stream.try_clone().context("clone stream")?);
        if reader.read_line(&mut line).context("read request")? == 0 {
            return Ok(());
        }
        requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?
            .push(line);
        Ok(())
    }

    fn respond(mut stream: TcpStream, lines: &[String], hangup: Hangup) -> Result<()> {
        write_lines(&mut stream, lines).context("write response lines")?;
        if hangup == Hangup::WhenClientLeaves {
            let mut sink = Vec::new();
            // Returns once the client shuts its side down.
            let _ = io::Read::read_to_end(&mut stream, &mut sink);
        }
        Ok(())
    }
}

impl Drop for FakeService {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Writes lines to a stream, appending newlines and flushing.
pub(in crate::tests) fn write_lines(stream: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        stream.write_all(line.as_bytes())?;
        stream.write_all(b"\n")?;
    }
    stream.flush()
}
