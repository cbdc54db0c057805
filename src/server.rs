//! Line protocol adapter. Each connection gets its own thread and speaks
//! one textual command per line, translated 1:1 onto the store's
//! operations. The adapter holds no state of its own.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use log::{info, warn};

use crate::error::Result;
use crate::store::FileStore;
use crate::volume::Volume;

pub struct Server<V: Volume + 'static> {
    store: Arc<FileStore<V>>,
}

enum Response {
    Line(String),
    Closing,
}

impl<V: Volume + 'static> Server<V> {
    pub fn new(store: Arc<FileStore<V>>) -> Self {
        Server { store }
    }

    /// Accept loop. Runs until the listener fails.
    pub fn run(&self, listener: TcpListener) -> std::io::Result<()> {
        info!("listening on {}", listener.local_addr()?);
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let store = Arc::clone(&self.store);
                    thread::spawn(move || serve_client(stream, &store));
                }
                Err(e) => warn!("accept failed: {e}"),
            }
        }
        Ok(())
    }
}

fn serve_client<V: Volume>(stream: TcpStream, store: &FileStore<V>) {
    let peer = match stream.peer_addr() {
        Ok(addr) => addr.to_string(),
        Err(_) => "unknown".into(),
    };
    info!("client {peer} connected");
    if let Err(e) = handle_requests(stream, store) {
        warn!("client {peer}: {e}");
    }
    info!("client {peer} disconnected");
}

fn handle_requests<V: Volume>(stream: TcpStream, store: &FileStore<V>) -> std::io::Result<()> {
    let mut out = stream.try_clone()?;
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        match respond(line?.trim(), store) {
            Response::Line(reply) => writeln!(out, "{reply}")?,
            Response::Closing => {
                writeln!(out, "OK closing")?;
                break;
            }
        }
    }
    Ok(())
}

/// One command per line: verb, optional name, optional rest-of-line
/// payload. Unknown verbs and missing arguments answer with an error
/// line instead of dropping the connection.
fn respond<V: Volume>(line: &str, store: &FileStore<V>) -> Response {
    let mut parts = line.splitn(3, ' ');
    let verb = parts.next().unwrap_or_default().to_ascii_uppercase();
    let name = parts.next();
    let rest = parts.next();

    let reply = match (verb.as_str(), name) {
        ("CREATE", Some(name)) => status(store.create(name)),
        ("READ", Some(name)) => match store.read(name) {
            Ok(data) => format!("OK {}", String::from_utf8_lossy(&data)),
            Err(e) => format!("ERROR: {e}"),
        },
        ("WRITE", Some(name)) => match rest {
            Some(data) => status(store.write(name, data.as_bytes())),
            None => "ERROR: malformed command".into(),
        },
        ("DELETE", Some(name)) => status(store.delete(name)),
        ("LIST", _) => format!("OK {}", store.list().join(",")),
        ("QUIT", _) => return Response::Closing,
        ("CREATE" | "READ" | "WRITE" | "DELETE", None) => "ERROR: malformed command".into(),
        _ => "ERROR: unknown command".into(),
    };
    Response::Line(reply)
}

fn status(result: Result<()>) -> String {
    match result {
        Ok(()) => "OK".into(),
        Err(e) => format!("ERROR: {e}"),
    }
}
