//! Tests for the HTTP client against a throwaway local server.

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use sintaxis::api::Error;
use sintaxis::api::Options;
use sintaxis::region::Content;
use sintaxis::region::Slot;
use sintaxis::Api;
use sintaxis::Orchestrator;

/// A request as seen by the test server.
#[derive(Debug)]
struct Seen {
  request_line: String,
  headers: Vec<(String, String)>,
  body: Vec<u8>,
}

impl Seen {
  fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }
}

/// Serves exactly one connection, answering with `status` and `body`.
///
/// Returns the base URL to point the client at and a channel that yields the
/// request once it has been read.
fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<Seen>) {
  let listener = TcpListener::bind("127.0.0.1:0").unwrap();
  let url = format!("http://{}", listener.local_addr().unwrap());
  let (tx, rx) = mpsc::channel();
  let response = format!(
    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
    status,
    body.len(),
    body
  );

  thread::spawn(move || {
    let (stream, _) = listener.accept().unwrap();
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut headers = Vec::new();
    loop {
      let mut line = String::new();
      reader.read_line(&mut line).unwrap();
      let line = line.trim_end();
      if line.is_empty() {
        break;
      }
      if let Some((k, v)) = line.split_once(':') {
        headers.push((k.trim().to_string(), v.trim().to_string()));
      }
    }

    let len = headers
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
      .map(|(_, v)| v.parse::<usize>().unwrap())
      .unwrap_or(0);
    let mut body = vec![0; len];
    reader.read_exact(&mut body).unwrap();

    let mut stream = stream;
    stream.write_all(response.as_bytes()).unwrap();
    stream.flush().unwrap();

    let _ = tx.send(Seen {
      request_line: request_line.trim_end().to_string(),
      headers,
      body,
    });
  });

  (url, rx)
}

fn api(base_url: String, cache_control: bool) -> Api {
  Api::with_options(Options {
    base_url,
    cache_control,
  })
}

#[test]
fn posts_sentence_as_json() {
  let (url, seen) =
    serve_once("200 OK", r#"{"breakdown": "(Verbo: corre)", "tree": "<svg></svg>"}"#);

  let analysis = api(url, true).generate(" corre ").unwrap();
  assert_eq!(analysis.breakdown.as_deref(), Some("(Verbo: corre)"));
  assert_eq!(analysis.tree.as_deref(), Some("<svg></svg>"));

  let seen = seen.recv().unwrap();
  assert_eq!(seen.request_line, "POST /generate HTTP/1.1");
  assert_eq!(
    seen.header("content-type"),
    Some("application/json; charset=utf-8")
  );
  assert_eq!(
    seen.header("cache-control"),
    Some("no-store, no-cache, must-revalidate")
  );

  let body: serde_json::Value = serde_json::from_slice(&seen.body).unwrap();
  assert_eq!(body, serde_json::json!({ "sentence": " corre " }));
}

#[test]
fn cache_control_can_be_turned_off() {
  let (url, seen) = serve_once("200 OK", r#"{"breakdown": "B", "tree": "T"}"#);
  api(url, false).generate("hola").unwrap();
  assert_eq!(seen.recv().unwrap().header("cache-control"), None);
}

#[test]
fn error_status_carries_server_message() {
  let (url, _seen) =
    serve_once("400 Bad Request", r#"{"error": "No sentence provided."}"#);

  match api(url, true).generate("x") {
    Err(Error::Status { status, message }) => {
      assert_eq!(status.as_u16(), 400);
      assert_eq!(message.as_deref(), Some("No sentence provided."));
    }
    other => panic!("unexpected result: {:?}", other),
  }
}

#[test]
fn error_status_without_json_body() {
  let (url, _seen) = serve_once("502 Bad Gateway", "<html>oops</html>");

  match api(url, true).generate("x") {
    Err(Error::Status { status, message }) => {
      assert_eq!(status.as_u16(), 502);
      assert_eq!(message, None);
    }
    other => panic!("unexpected result: {:?}", other),
  }
}

#[test]
fn malformed_body_is_a_json_error() {
  let (url, _seen) = serve_once("200 OK", "definitely not json");
  match api(url, true).generate("x") {
    Err(Error::Json(_)) => {}
    other => panic!("unexpected result: {:?}", other),
  }
}

#[test]
fn non_object_bodies_are_json_errors() {
  for body in &[r#"["B", "<svg/>"]"#, "null", r#""B""#] {
    let (url, _seen) = serve_once("200 OK", body);
    match api(url, true).generate("x") {
      Err(Error::Json(_)) => {}
      other => panic!("unexpected result for {}: {:?}", body, other),
    }
  }
}

#[test]
fn orchestrator_renders_errors_on_array_body() {
  let (url, _seen) = serve_once("200 OK", r#"["B", "<svg/>"]"#);

  let breakdown = Slot::new();
  let tree = Slot::new();
  let orch = Orchestrator::new(api(url, true), breakdown.clone(), tree.clone());

  assert!(!orch.submit("hola").wait().unwrap().is_rendered());
  assert_eq!(
    breakdown.content(),
    Content::Text("Error: Could not generate the analysis.".into())
  );
  assert_eq!(
    tree.content(),
    Content::Text("Error: Could not generate the tree.".into())
  );
}

#[test]
fn connection_refused_is_an_http_error() {
  // Grab a free port, then close it again so nothing is listening.
  let url = {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    format!("http://{}", listener.local_addr().unwrap())
  };

  match api(url, true).generate("x") {
    Err(Error::Http(_)) => {}
    other => panic!("unexpected result: {:?}", other),
  }
}

#[test]
fn orchestrator_end_to_end() {
  let (url, _seen) = serve_once(
    "200 OK",
    r#"{"breakdown": "(Determinante: el)\n(Sustantivo: perro)", "tree": "<svg class=\"displacy\"></svg>"}"#,
  );

  let breakdown = Slot::new();
  let tree = Slot::new();
  let orch = Orchestrator::new(api(url, true), breakdown.clone(), tree.clone());

  assert!(orch.submit("el perro").wait().unwrap().is_rendered());
  assert_eq!(
    breakdown.content(),
    Content::Text("(Determinante: el)\n(Sustantivo: perro)".into())
  );
  assert_eq!(
    tree.content(),
    Content::Markup(r#"<svg class="displacy"></svg>"#.into())
  );
}

#[test]
fn orchestrator_renders_errors_on_missing_field() {
  let (url, _seen) = serve_once("200 OK", r#"{"breakdown": "B"}"#);

  let breakdown = Slot::new();
  let tree = Slot::new();
  let orch = Orchestrator::new(api(url, true), breakdown.clone(), tree.clone());

  assert!(!orch.submit("hola").wait().unwrap().is_rendered());
  assert_eq!(
    breakdown.content(),
    Content::Text("Error: Could not generate the analysis.".into())
  );
  assert_eq!(
    tree.content(),
    Content::Text("Error: Could not generate the tree.".into())
  );
}
