//! End-to-end checks of `HttpTransport` against a loopback HTTP server.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use vt_report::{Client, ErrorKind, HttpTransport, ReportStatus};

const EICAR_MD5: &str = "44d88612fea8a8f36de82e1278abb02f";

/// Serves exactly one request with `body`, returning the base URL and a handle
/// yielding the request line the client sent.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let port = listener.local_addr().expect("local addr").port();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("read request line");
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).expect("read header");
            if header == "\r\n" || header.is_empty() {
                break;
            }
        }

        let mut stream = stream;
        write!(
            stream,
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .expect("write response");
        stream.flush().expect("flush");

        request_line.trim_end().to_string()
    });

    (format!("http://127.0.0.1:{port}/vtapi/v2/"), handle)
}

/// Loopback traffic must not be routed through a proxy picked up from the environment.
fn transport() -> Arc<HttpTransport> {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("build reqwest client");
    Arc::new(HttpTransport::from_client(client))
}

#[test]
fn fetches_and_decodes_over_http() {
    let (base, server) = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"response_code":1,"resource":"44d88612fea8a8f36de82e1278abb02f","positives":5,"total":60,"scans":{"EngineX":{"detected":true,"version":"1.0","result":"Eicar","update":"20130601"}}}"#,
    );
    let client = Client::new("ABC123", base).with_transport(transport());

    let report = client.get_report(EICAR_MD5).expect("report");
    let request_line = server.join().expect("server thread");

    assert_eq!(
        request_line,
        format!("GET /vtapi/v2/file/report?apikey=ABC123&resource={EICAR_MD5} HTTP/1.1")
    );
    assert_eq!(report.status(), ReportStatus::Found);
    assert_eq!(report.resource, EICAR_MD5);
    assert_eq!(report.detection_ratio(), "5/60");
    assert_eq!(report.scans["EngineX"].result, "Eicar");
}

#[test]
fn forbidden_empty_body_is_a_decode_error() {
    let (base, server) = serve_once("HTTP/1.1 403 Forbidden", "");
    let client = Client::new("bad-key", base).with_transport(transport());

    let err = client.get_report(EICAR_MD5).unwrap_err();
    server.join().expect("server thread");

    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn refused_connection_is_a_network_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        listener.local_addr().expect("local addr").port()
    };
    let client = Client::new("SECRET", format!("http://127.0.0.1:{port}/")).with_transport(transport());

    let err = client.get_report(EICAR_MD5).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(std::error::Error::source(&err).is_some());
    assert!(!err.to_string().contains("SECRET"));
}
