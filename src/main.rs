use std::net::TcpListener;
use std::process::exit;
use std::sync::Arc;

use chainfs::{FileStore, FileVolume, Server, VOLUME_SIZE, logging};

fn main() {
    logging::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "chainfs.img".into());
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:7070".into());

    let volume = match FileVolume::open(&path) {
        Ok(volume) => volume,
        Err(e) => {
            log::error!("cannot open {path}: {e}");
            exit(1);
        }
    };
    let store = match FileStore::open(volume, VOLUME_SIZE) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::error!("cannot open store on {path}: {e}");
            exit(1);
        }
    };

    let listener = match TcpListener::bind(&addr) {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("cannot bind {addr}: {e}");
            exit(1);
        }
    };

    if let Err(e) = Server::new(store).run(listener) {
        log::error!("server stopped: {e}");
        exit(1);
    }
}
