use std::{
    io::{BufRead as _, BufReader, Write as _},
    net::TcpListener,
    path::{Path, PathBuf},
    thread,
};

mod cli {
    mod config;
    mod get;
    mod jetset;
    mod show;
    mod validation;
    mod version;

    use super::*;
}

/// Runs the binary with an empty home directory, so no user config or
/// environment leaks into the test.
pub fn sedbuilder(home: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("sedbuilder");
    cmd.env("HOME", home)
        .env_remove("SEDBUILDER_PROFILE")
        .env_remove("SEDBUILDER_API_ENDPOINT")
        .env_remove("SEDBUILDER_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

/// Answers a single request on a local port with a JSON body. Returns the
/// endpoint to point the CLI at, and a handle that yields the request line.
pub fn serve_once(status: &'static str, body: String) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(&stream);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        let mut header = String::new();
        loop {
            header.clear();
            if reader.read_line(&mut header).unwrap() <= 2 {
                break;
            }
        }

        let mut out = &stream;
        write!(
            out,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();

        request_line.trim_end().to_owned()
    });

    (endpoint, handle)
}
