//! Tests for the reqwest transport against a local HTTP server

use jutge_api_client::{ErrorKind, HttpRequest, HttpTransport, JutgeApiClient, Transport};
use serde_json::Value;

use crate::common::fixtures::{self, EMAIL, PASSWORD, PNG_SIGNATURE};
use crate::common::mocks::test_config;
use crate::common::server::{spawn_broken_server, spawn_fake_jutge};

fn http_client(url: &str) -> JutgeApiClient {
    JutgeApiClient::with_config(test_config().with_api_url(url)).unwrap()
}

#[test]
fn test_login_and_authenticated_call_over_http() {
    let url = spawn_fake_jutge();
    let mut client = http_client(&url);

    client.login(EMAIL, PASSWORD).unwrap();
    let (profile, _) = client.execute("student.profile.get", Value::Null, &mut []).unwrap();
    assert_eq!(profile["name"], "Alice");

    client.logout(false).unwrap();
    assert!(!client.is_authenticated());
}

#[test]
fn test_binary_attachment_over_http() {
    let url = spawn_fake_jutge();
    let mut client = http_client(&url);

    let logo = client.misc().get_logo().unwrap();
    assert_eq!(logo.data()[..8], PNG_SIGNATURE);
    assert_eq!(logo.data(), fixtures::logo_bytes().as_slice());
}

#[test]
fn test_input_files_over_http() {
    let url = spawn_fake_jutge();
    let mut client = http_client(&url);
    let mut source: &[u8] = b"int main() { return 0; }\r\n";

    let (output, files) = client
        .execute("playground.upload", Value::Null, &mut [&mut source])
        .unwrap();
    assert_eq!(output["sizes"][0], 26);
    assert_eq!(files[0].data(), b"int main() { return 0; }\r\n");
}

#[test]
fn test_non_multipart_error_page_is_protocol_error() {
    let url = spawn_broken_server();
    let mut client = http_client(&url);

    let err = client.misc().get_fortune().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(err.to_string().contains("500"));
}

#[test]
fn test_unreachable_server_is_transport_error() {
    let transport = HttpTransport::new().unwrap();
    let request = HttpRequest {
        content_type: "multipart/form-data; boundary=x".to_string(),
        body: b"--x--\r\n".to_vec(),
    };
    let err = transport.post("http://127.0.0.1:1/api", request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
