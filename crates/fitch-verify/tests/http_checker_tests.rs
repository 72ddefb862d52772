//! HTTP checker against a throwaway local responder.

use async_trait::async_trait;
use fitch_proof::{CheckReply, CheckStatus, ProofDocument, ProofLine, ProofSession};
use fitch_verify::protocol::{PREDICATE_SETTINGS, PREMISE_COUNT, PROOF_DATA, WANTED_CONCLUSION};
use fitch_verify::{
    run_check, send_check, CheckerConfig, HttpChecker, ProofChecker, VerificationRequest,
    VerifyError,
};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serve exactly one request with `status` and `body`; the request body is
/// sent back through the returned channel.
async fn respond_once(
    status: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let request_body = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break String::new();
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(split) = text.find("\r\n\r\n") {
                let length = text[..split]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                let body_start = split + 4;
                if buf.len() >= body_start + length {
                    break String::from_utf8_lossy(&buf[body_start..body_start + length])
                        .to_string();
                }
            }
        };

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(request_body);
    });

    (format!("http://{addr}/checkproof"), rx)
}

fn modus_ponens_session() -> ProofSession {
    let mut doc = ProofDocument::from_premises(["P → Q", "P"]);
    doc.nodes.push(ProofLine::new("Q", "→E 1,2").into());
    ProofSession::new(doc, "Q")
}

#[tokio::test]
async fn test_complete_proof_round_trip() {
    let (endpoint, sent) = respond_once("200 OK", r#"{"issues":[],"concReached":true}"#).await;
    let config = CheckerConfig::new(endpoint).with_predicate_settings("{\"constants\":\"\"}");
    let checker = HttpChecker::new(config).unwrap();
    let mut session = modus_ponens_session();

    let status = run_check(&mut session, &checker).await;
    assert_eq!(status, CheckStatus::Complete);
    assert!(!session.is_checking());

    let body = sent.await.unwrap();
    let fields: HashMap<String, String> = url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect();
    assert_eq!(fields[PREDICATE_SETTINGS], "{\"constants\":\"\"}");
    assert_eq!(fields[WANTED_CONCLUSION], "Q");
    assert_eq!(fields[PREMISE_COUNT], "2");
    let proof = ProofDocument::from_json(&fields[PROOF_DATA]).unwrap();
    assert_eq!(&proof, session.document());
}

#[tokio::test]
async fn test_reported_issues_are_kept_verbatim() {
    let (endpoint, _sent) = respond_once(
        "200 OK",
        r#"{"issues":["Line 3: →E needs two citations"],"concReached":false}"#,
    )
    .await;
    let checker = HttpChecker::new(CheckerConfig::new(endpoint)).unwrap();
    let mut session = modus_ponens_session();

    let status = run_check(&mut session, &checker).await;
    assert_eq!(
        status,
        CheckStatus::Error {
            issues: vec!["Line 3: →E needs two citations".to_string()]
        }
    );
}

#[tokio::test]
async fn test_server_error_status() {
    let (endpoint, _sent) = respond_once("500 Internal Server Error", "boom").await;
    let checker = HttpChecker::new(CheckerConfig::new(endpoint)).unwrap();
    let ticket = modus_ponens_session().begin_check();

    let err = send_check(&checker, &ticket).await.unwrap_err();
    assert_eq!(
        err,
        VerifyError::Status {
            status: 500,
            body: "boom".to_string()
        }
    );
}

#[tokio::test]
async fn test_unparsable_reply() {
    let (endpoint, _sent) = respond_once("200 OK", "not json").await;
    let checker = HttpChecker::new(CheckerConfig::new(endpoint)).unwrap();
    let mut session = modus_ponens_session();

    let status = run_check(&mut session, &checker).await;
    assert!(matches!(status, CheckStatus::Unavailable { reason } if reason.contains("Invalid response")));
}

#[tokio::test]
async fn test_unreachable_checker_marks_session_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = CheckerConfig::new(format!("http://{addr}/checkproof")).with_timeout_secs(2);
    let checker = HttpChecker::new(config).unwrap();
    let mut session = modus_ponens_session();

    let status = run_check(&mut session, &checker).await;
    assert!(matches!(status, CheckStatus::Unavailable { .. }));
    assert!(!session.is_checking());
}

/// Answers every request with a fixed reply and remembers what it saw.
struct FixedChecker {
    reply: CheckReply,
    seen: Mutex<Vec<VerificationRequest>>,
}

#[async_trait]
impl ProofChecker for FixedChecker {
    async fn check(&self, request: &VerificationRequest) -> Result<CheckReply, VerifyError> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(self.reply.clone())
    }
}

#[tokio::test]
async fn test_run_check_commits_open_cell_first() {
    let checker = FixedChecker {
        reply: CheckReply {
            issues: vec![],
            conc_reached: false,
        },
        seen: Default::default(),
    };
    let mut session = ProofSession::new(ProofDocument::from_premises(["P"]), "P ∨ Q");
    let position = session.add_line(0);
    session.set_input("P | Q").unwrap();

    let status = run_check(&mut session, &checker).await;
    assert_eq!(status, CheckStatus::Incomplete);
    let seen = checker.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].predicate_settings, "");
    assert!(session.focus().is_closed());
    assert_eq!(session.rows()[position].formula, "P ∨ Q");
}

#[tokio::test]
async fn test_configured_predicate_settings_are_sent() {
    let (endpoint, sent) = respond_once("200 OK", r#"{"issues":[],"concReached":false}"#).await;
    let config = CheckerConfig::new(endpoint).with_predicate_settings("constants: a b c");
    let checker = HttpChecker::new(config).unwrap();
    assert_eq!(checker.predicate_settings(), "constants: a b c");

    let ticket = modus_ponens_session().begin_check();
    send_check(&checker, &ticket).await.unwrap();

    let body = sent.await.unwrap();
    let fields: HashMap<String, String> = url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect();
    assert_eq!(fields[PREDICATE_SETTINGS], "constants: a b c");
}
