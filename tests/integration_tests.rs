//! Integration tests for remotecc
//!
//! One full compile exchange over a loopback TCP connection, file
//! handles and all.

use std::fs;
use std::io::{BufReader, BufWriter};
use std::net::TcpListener;
use std::thread;

use remotecc::{compile_file, ClientConfig, ServerDriver};

/// Accept one connection, parse the request, and answer with the given
/// status. Returns the parsed argv and received source bytes.
fn serve_one(
    listener: TcpListener,
    status: i32,
    object: &'static [u8],
) -> thread::JoinHandle<(Vec<String>, Vec<u8>)> {
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let reader = BufReader::new(stream.try_clone().unwrap());
        let writer = BufWriter::new(stream);
        let mut driver = ServerDriver::new(reader, writer);

        let args = driver.read_request().unwrap();
        let mut source = Vec::new();
        driver.read_source_to(&mut source).unwrap();
        driver
            .send_response(status, b"", b"", Some(object))
            .unwrap();
        (args, source)
    })
}

#[test]
fn test_compile_file_success() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = serve_one(listener, 0, b"fakeobject");

    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("foo.i");
    let object_path = dir.path().join("foo.o");
    fs::write(&source_path, b"int main(void) { return 0; }\n").unwrap();

    let config = ClientConfig::builder()
        .server_addr(addr.to_string())
        .read_timeout_ms(5000)
        .write_timeout_ms(5000)
        .build();
    let args: Vec<String> = ["gcc", "-c", "-o", "foo.o", "foo.c"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let status = compile_file(&config, &args, &source_path, &object_path).unwrap();
    assert_eq!(status, 0);
    assert_eq!(fs::read(&object_path).unwrap(), b"fakeobject");

    let (seen_args, seen_source) = server.join().unwrap();
    assert_eq!(seen_args, args);
    assert_eq!(seen_source, b"int main(void) { return 0; }\n");
}

#[test]
fn test_compile_file_remote_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = serve_one(listener, 1, b"");

    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("bad.i");
    let object_path = dir.path().join("bad.o");
    fs::write(&source_path, b"int main(void) {\n").unwrap();

    let config = ClientConfig::builder()
        .server_addr(addr.to_string())
        .build();
    let args: Vec<String> = ["gcc", "-c", "-o", "bad.o", "bad.c"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    // The exchange itself succeeds; the remote compiler's status is 1
    // and no object payload arrives
    let status = compile_file(&config, &args, &source_path, &object_path).unwrap();
    assert_eq!(status, 1);
    assert!(fs::read(&object_path).unwrap().is_empty());

    server.join().unwrap();
}

#[test]
fn test_compile_file_connection_refused() {
    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("foo.i");
    let object_path = dir.path().join("foo.o");
    fs::write(&source_path, b"x").unwrap();

    // Bind then drop to get a port nothing listens on
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let config = ClientConfig::builder().server_addr(addr.to_string()).build();
    let args = vec!["gcc".to_string(), "-c".to_string(), "foo.c".to_string()];
    assert!(compile_file(&config, &args, &source_path, &object_path).is_err());
}
