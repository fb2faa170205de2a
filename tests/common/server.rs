//! Local HTTP servers for exercising the real transport

use std::io::Read;
use std::thread;

use jutge_api_client::protocol::Envelope;
use jutge_api_client::protocol::multipart::{self, FormPart};
use tiny_http::{Header, Request, Response, Server};

use super::mocks::fake_jutge;

/// Start a server answering like the fake Jutge, returning its API URL
pub fn spawn_fake_jutge() -> String {
    spawn_jutge_with(fake_jutge)
}

/// Start a server that decodes envelopes and answers with `handler`
pub fn spawn_jutge_with(
    handler: impl Fn(&Envelope, &[Vec<u8>]) -> Vec<FormPart> + Send + 'static,
) -> String {
    spawn(move |mut request| {
        let content_type = request
            .headers()
            .iter()
            .find(|h| h.field.equiv("Content-Type"))
            .map(|h| h.value.to_string())
            .unwrap_or_default();
        let mut body = Vec::new();
        request.as_reader().read_to_end(&mut body).unwrap();

        let mut envelope = None;
        let mut files = Vec::new();
        for part in multipart::decode(&content_type, &body).unwrap() {
            if part.header("content-type").is_some() {
                files.push(part.body);
            } else {
                envelope = Some(serde_json::from_slice::<Envelope>(&part.body).unwrap());
            }
        }
        let reply = multipart::encode(&handler(&envelope.unwrap(), &files));
        let response = Response::from_data(reply.body)
            .with_header(Header::from_bytes("Content-Type", reply.content_type).unwrap());
        request.respond(response).unwrap();
    })
}

/// Start a server that answers every request with a plain-text 500
pub fn spawn_broken_server() -> String {
    spawn(|request| {
        let response = Response::from_data(b"Internal Server Error".to_vec())
            .with_status_code(500)
            .with_header(Header::from_bytes("Content-Type", "text/plain").unwrap());
        request.respond(response).unwrap();
    })
}

fn spawn(handle: impl Fn(Request) + Send + 'static) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    thread::spawn(move || {
        for request in server.incoming_requests() {
            handle(request);
        }
    });
    format!("http://127.0.0.1:{port}/api")
}
