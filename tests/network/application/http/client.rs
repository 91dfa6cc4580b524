use std::cell::RefCell;

use telenode::network::application::http::{
    ClientConfig, NetworkClient, ResponseParser, TransferState,
};
use telenode::network::error::{Error, Outcome};
use telenode::network::transport::Transport;

use crate::MockTransport;

const REQUEST: &[u8] = b"GET /update?field1=21.5000 HTTP/1.1\r\nHost: www.example.com\r\n\r\n";
const RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n42";

/// Tick until the client goes idle, returning the number of ticks taken.
fn run<T: Transport, F: FnOnce(bool)>(client: &mut NetworkClient<'_, T, F>, limit: usize) -> usize {
    for n in 1..=limit {
        client.tick();
        if client.state() == TransferState::Idle {
            return n;
        }
    }
    panic!("transfer still {:?} after {} ticks", client.state(), limit);
}

#[test]
fn test_complete_transfer() {
    let calls = RefCell::new(Vec::new());
    let on_complete = |ok: bool| calls.borrow_mut().push(ok);

    let mut response = [0xAAu8; 128];
    let mut client = NetworkClient::new(MockTransport::new().reply(RESPONSE));

    client.send_http_request("www.example.com", REQUEST, &mut response, on_complete);
    assert_eq!(client.state(), TransferState::Sending);
    assert!(calls.borrow().is_empty());

    run(&mut client, 100);

    assert_eq!(*calls.borrow(), [true]);
    assert_eq!(client.last_outcome(), Some(Outcome::Complete));
    assert_eq!(client.last_error(), "");
    assert_eq!(client.bytes_sent(), REQUEST.len());
    assert_eq!(client.response(), RESPONSE);

    let parsed = ResponseParser::parse(client.response());
    assert_eq!(parsed.version(), 11);
    assert_eq!(parsed.status(), 200);
    assert_eq!(parsed.body(), b"42");
    drop(parsed);

    let transport = client.transport();
    assert_eq!(transport.sent, REQUEST);
    assert_eq!(transport.connects, [("www.example.com".to_string(), 80)]);
    assert_eq!(transport.stops, 1);
    assert!(!transport.open);

    let buffer = client.take_response().unwrap();
    assert_eq!(&buffer[..RESPONSE.len()], RESPONSE);
    assert_eq!(buffer[RESPONSE.len()], 0);
    assert_eq!(buffer[RESPONSE.len() + 1], 0xAA);
}

#[test]
fn test_send_moves_one_chunk_per_tick() {
    let mut response = [0u8; 64];
    let request = [b'x'; 40];
    let mut client = NetworkClient::new(MockTransport::new().trickle(b""));
    client.send_http_request("host", &request, &mut response, |_: bool| {});

    client.tick();
    assert_eq!(client.bytes_sent(), 16);
    assert_eq!(client.state(), TransferState::Sending);

    client.tick();
    assert_eq!(client.bytes_sent(), 32);
    assert_eq!(client.state(), TransferState::Sending);

    client.tick();
    assert_eq!(client.bytes_sent(), 40);
    assert_eq!(client.state(), TransferState::Receiving);
    assert_eq!(client.transport().prints, 3);
}

#[test]
fn test_request_multiple_of_chunk_takes_extra_tick() {
    let mut response = [0u8; 64];
    let request = [b'x'; 32];
    let mut client = NetworkClient::new(MockTransport::new().trickle(b""));
    client.send_http_request("host", &request, &mut response, |_: bool| {});

    client.tick();
    client.tick();
    assert_eq!(client.bytes_sent(), 32);
    assert_eq!(client.state(), TransferState::Sending);

    client.tick();
    assert_eq!(client.state(), TransferState::Receiving);
    // The empty remainder is not pushed to the transport.
    assert_eq!(client.transport().prints, 2);
}

#[test]
fn test_receive_moves_one_chunk_per_tick() {
    let config = ClientConfig {
        send_chunk: 64,
        recv_chunk: 4,
        ..ClientConfig::default()
    };
    let mut response = [0u8; 64];
    let mut client =
        NetworkClient::with_config(MockTransport::new().reply(b"HTTP/1.0 204 No"), config);
    client.send_http_request("host", b"GET / HTTP/1.1\r\n", &mut response, |_: bool| {});

    client.tick();
    assert_eq!(client.state(), TransferState::Receiving);

    for expected in [4, 8, 12] {
        client.tick();
        assert_eq!(client.response().len(), expected);
        assert_eq!(client.state(), TransferState::Receiving);
    }

    // Last three bytes, then the end marker.
    client.tick();
    assert_eq!(client.state(), TransferState::Idle);
    assert_eq!(client.response(), b"HTTP/1.0 204 No");
}

#[test]
fn test_receive_waits_for_data() {
    let mut response = [0u8; 64];
    let mut client = NetworkClient::new(MockTransport::new().trickle(b""));
    client.send_http_request("host", b"GET / HTTP/1.1\r\n", &mut response, |_: bool| {});

    run_until_receiving(&mut client);
    for _ in 0..50 {
        client.tick();
    }
    assert_eq!(client.state(), TransferState::Receiving);
    assert!(client.is_connected());
    assert_eq!(client.last_outcome(), None);
}

fn run_until_receiving<T: Transport, F: FnOnce(bool)>(client: &mut NetworkClient<'_, T, F>) {
    while client.state() == TransferState::Sending {
        client.tick();
    }
}

#[test]
fn test_response_arriving_in_bursts() {
    let config = ClientConfig {
        recv_chunk: 8,
        ..ClientConfig::default()
    };
    let status_line = &RESPONSE[..17];
    let mut response = [0u8; 128];
    let mut client =
        NetworkClient::with_config(MockTransport::new().trickle(status_line), config);
    client.send_http_request("host", REQUEST, &mut response, |ok: bool| assert!(ok));

    run_until_receiving(&mut client);
    for _ in 0..10 {
        client.tick();
    }
    // The link went quiet after the first burst; that is not end-of-stream.
    assert_eq!(client.state(), TransferState::Receiving);
    assert_eq!(client.response(), status_line);
    assert_eq!(client.last_outcome(), None);

    client.transport_mut().burst(&RESPONSE[17..]);
    client.transport_mut().finish();
    run(&mut client, 100);

    assert_eq!(client.last_outcome(), Some(Outcome::Complete));
    assert_eq!(client.last_error(), "");
    assert_eq!(client.response(), RESPONSE);
}

#[test]
fn test_partial_print_offers_rest_next_tick() {
    let mut transport = MockTransport::new().reply(RESPONSE);
    transport.accept = Some(5);
    let request = [b'x'; 20];
    let mut response = [0u8; 128];
    let mut client = NetworkClient::new(transport);
    client.send_http_request("host", &request, &mut response, |ok: bool| assert!(ok));

    for expected in [5, 10, 15] {
        client.tick();
        assert_eq!(client.bytes_sent(), expected);
        assert_eq!(client.state(), TransferState::Sending);
    }
    client.tick();
    assert_eq!(client.bytes_sent(), 20);
    assert_eq!(client.state(), TransferState::Receiving);

    run(&mut client, 100);
    assert_eq!(client.transport().sent, request);
    assert_eq!(client.response(), RESPONSE);
}

#[test]
fn test_stalled_print_times_out() {
    let mut transport = MockTransport::new().reply(RESPONSE);
    transport.accept = Some(0);
    let mut response = [0u8; 64];
    let mut client = NetworkClient::new(transport);
    client.send_http_request_with_deadline("host", REQUEST, &mut response, Some(3), |ok: bool| {
        assert!(!ok)
    });

    assert_eq!(run(&mut client, 10), 4);
    assert_eq!(client.bytes_sent(), 0);
    assert_eq!(client.last_outcome(), Some(Outcome::Failed(Error::Timeout)));
}

#[test]
fn test_connect_failure() {
    let calls = RefCell::new(Vec::new());
    let mut transport = MockTransport::new();
    transport.refuse_connect = true;

    let mut response = [0u8; 64];
    let mut client = NetworkClient::new(transport);
    client.send_http_request("www.example.com", REQUEST, &mut response, |ok: bool| {
        calls.borrow_mut().push(ok)
    });

    assert_eq!(*calls.borrow(), [false]);
    assert_eq!(client.state(), TransferState::Idle);
    assert_eq!(client.last_error(), "failed to connect to www.example.com");
    assert_eq!(
        client.last_outcome(),
        Some(Outcome::Failed(Error::ConnectFailed))
    );

    client.tick();
    assert_eq!(calls.borrow().len(), 1);
    assert!(client.transport().sent.is_empty());
}

#[test]
fn test_busy_request_is_rejected() {
    let calls = RefCell::new(Vec::new());
    let on_complete = |ok: bool| calls.borrow_mut().push(ok);

    let mut first = [0u8; 64];
    let mut second = [0u8; 64];
    let mut client = NetworkClient::new(MockTransport::new().reply(RESPONSE));

    client.send_http_request("first.example.com", REQUEST, &mut first, on_complete);
    client.tick();
    let sent = client.bytes_sent();

    client.send_http_request("second.example.com", b"POST / HTTP/1.1\r\n", &mut second, on_complete);

    assert_eq!(*calls.borrow(), [false]);
    assert_eq!(client.last_error(), "already connected to a client");
    assert_eq!(client.state(), TransferState::Sending);
    assert_eq!(client.bytes_sent(), sent);
    assert_eq!(client.transport().connects.len(), 1);

    run(&mut client, 100);
    assert_eq!(*calls.borrow(), [false, true]);
    assert_eq!(client.transport().sent, REQUEST);
    assert_eq!(client.response(), RESPONSE);
}

#[test]
fn test_disconnect_mid_receive_then_retry() {
    let calls = RefCell::new(Vec::new());
    let on_complete = |ok: bool| calls.borrow_mut().push(ok);
    let config = ClientConfig {
        recv_chunk: 4,
        ..ClientConfig::default()
    };

    let mut first = [0u8; 64];
    let mut second = [0u8; 64];
    let mut client =
        NetworkClient::with_config(MockTransport::new().trickle(b"HTTP/1.1 200 OK\r\n"), config);

    client.send_http_request("host", b"GET / HTTP/1.1\r\n", &mut first, on_complete);
    run_until_receiving(&mut client);
    client.tick();
    assert_eq!(client.response(), b"HTTP");

    client.transport_mut().hang_up();
    client.tick();

    assert_eq!(*calls.borrow(), [false]);
    assert_eq!(client.state(), TransferState::Idle);
    assert_eq!(client.last_error(), "client disconnected");
    assert_eq!(
        client.last_outcome(),
        Some(Outcome::Failed(Error::Disconnected))
    );

    client.tick();
    assert_eq!(calls.borrow().len(), 1);

    // An immediate retry goes through.
    client.send_http_request("host", b"GET / HTTP/1.1\r\n", &mut second, on_complete);
    assert_eq!(client.state(), TransferState::Sending);
    assert_eq!(client.last_error(), "");
    assert_eq!(client.transport().connects.len(), 2);
}

#[test]
fn test_truncated_response() {
    let calls = RefCell::new(Vec::new());
    let mut response = [0u8; 10];
    let mut client = NetworkClient::new(MockTransport::new().reply(RESPONSE));
    client.send_http_request("host", REQUEST, &mut response, |ok: bool| {
        calls.borrow_mut().push(ok)
    });

    run(&mut client, 100);

    assert_eq!(*calls.borrow(), [true]);
    assert_eq!(client.last_outcome(), Some(Outcome::Truncated));
    assert_eq!(client.last_error(), "response truncated");
    assert_eq!(client.response(), &RESPONSE[..10]);
    assert_eq!(client.transport().stops, 1);
}

#[test]
fn test_response_exactly_filling_buffer_is_truncated() {
    let mut response = [0u8; RESPONSE.len()];
    let mut client = NetworkClient::new(MockTransport::new().reply(RESPONSE));
    client.send_http_request("host", REQUEST, &mut response, |ok: bool| assert!(ok));

    run(&mut client, 100);

    assert_eq!(client.last_outcome(), Some(Outcome::Truncated));
    assert_eq!(client.response(), RESPONSE);
}

#[test]
fn test_deadline_expires() {
    let calls = RefCell::new(Vec::new());
    let mut response = [0u8; 64];
    let mut client = NetworkClient::new(MockTransport::new().trickle(b""));
    client.send_http_request_with_deadline(
        "host",
        b"GET / HTTP/1.1\r\n",
        &mut response,
        Some(5),
        |ok: bool| calls.borrow_mut().push(ok),
    );

    for _ in 0..5 {
        client.tick();
    }
    assert!(calls.borrow().is_empty());
    assert_eq!(client.state(), TransferState::Receiving);

    client.tick();
    assert_eq!(*calls.borrow(), [false]);
    assert_eq!(client.state(), TransferState::Idle);
    assert_eq!(client.last_error(), "timed out");
    assert_eq!(client.last_outcome(), Some(Outcome::Failed(Error::Timeout)));
    assert!(!client.is_connected());
}

#[test]
fn test_configured_deadline_applies() {
    let config = ClientConfig {
        deadline_ticks: Some(2),
        ..ClientConfig::default()
    };
    let mut response = [0u8; 64];
    let mut client = NetworkClient::with_config(MockTransport::new().trickle(b""), config);
    client.send_http_request("host", &[b'x'; 100], &mut response, |ok: bool| assert!(!ok));

    assert_eq!(run(&mut client, 10), 3);
    assert_eq!(client.bytes_sent(), 32);
    assert_eq!(client.last_outcome(), Some(Outcome::Failed(Error::Timeout)));
}

#[test]
fn test_cancel() {
    let calls = RefCell::new(Vec::new());
    let on_complete = |ok: bool| calls.borrow_mut().push(ok);
    let mut response = [0u8; 64];
    let mut client = NetworkClient::new(MockTransport::new().reply(RESPONSE));

    client.cancel();
    assert!(calls.borrow().is_empty());

    client.send_http_request("host", REQUEST, &mut response, on_complete);
    client.tick();
    client.cancel();

    assert_eq!(*calls.borrow(), [false]);
    assert_eq!(client.state(), TransferState::Idle);
    assert_eq!(client.last_error(), "transfer cancelled");
    assert_eq!(client.transport().stops, 1);

    client.cancel();
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn test_write_error() {
    let calls = RefCell::new(Vec::new());
    let mut transport = MockTransport::new().reply(RESPONSE);
    transport.fail_print = true;

    let mut response = [0u8; 64];
    let mut client = NetworkClient::new(transport);
    client.send_http_request("host", REQUEST, &mut response, |ok: bool| {
        calls.borrow_mut().push(ok)
    });

    assert_eq!(run(&mut client, 10), 1);
    assert_eq!(*calls.borrow(), [false]);
    assert_eq!(client.last_error(), "failed to send");
    assert_eq!(client.last_outcome(), Some(Outcome::Failed(Error::WriteError)));
}

#[test]
fn test_connected_while_transfer_active() {
    let mut response = [0u8; 256];
    let config = ClientConfig {
        send_chunk: 3,
        recv_chunk: 5,
        ..ClientConfig::default()
    };
    let mut client = NetworkClient::with_config(MockTransport::new().reply(RESPONSE), config);
    client.send_http_request("host", REQUEST, &mut response, |_: bool| {});

    while client.state() != TransferState::Idle {
        assert_eq!(client.is_connected(), client.transport().connected());
        assert!(client.is_connected());
        client.tick();
    }
    assert!(!client.is_connected());
    assert_eq!(client.response(), RESPONSE);
}

#[test]
fn test_take_response_only_when_idle() {
    let mut response = [0u8; 64];
    let mut client = NetworkClient::new(MockTransport::new().reply(RESPONSE));
    client.send_http_request("host", REQUEST, &mut response, |_: bool| {});

    assert!(client.take_response().is_none());
    run(&mut client, 100);
    assert!(client.take_response().is_some());
    assert!(client.take_response().is_none());
    assert_eq!(client.response(), b"");
}

#[test]
fn test_reuse_after_completion() {
    let calls = RefCell::new(Vec::new());
    let on_complete = |ok: bool| calls.borrow_mut().push(ok);
    let mut first = [0u8; 64];
    let mut second = [0u8; 64];
    let mut client = NetworkClient::new(MockTransport::new().reply(RESPONSE));

    client.send_http_request("host", REQUEST, &mut first, on_complete);
    run(&mut client, 100);

    client.transport_mut().rx.extend(b"HTTP/1.1 404 Not Found\r\n");
    client.send_http_request("host", REQUEST, &mut second, on_complete);
    run(&mut client, 100);

    assert_eq!(*calls.borrow(), [true, true]);
    assert_eq!(ResponseParser::parse(client.response()).status(), 404);
    assert_eq!(client.transport().stops, 2);
}

#[test]
fn test_custom_port() {
    let config = ClientConfig {
        port: 8080,
        ..ClientConfig::default()
    };
    let mut response = [0u8; 8];
    let mut client = NetworkClient::with_config(MockTransport::new(), config);
    client.send_http_request("host", REQUEST, &mut response, |_: bool| {});
    assert_eq!(client.transport().connects, [("host".to_string(), 8080)]);
}

#[test]
fn test_update_round_trip() {
    use telenode::config::NodeConfig;
    use telenode::network::application::http::RequestBuilder;
    use telenode::telemetry::UpdateComposer;

    let config = NodeConfig::from_json(
        r#"{"host":"api.example.com","api_key":"W1","send_chunk":32,"recv_chunk":32}"#,
    )
    .unwrap();

    let mut composer: UpdateComposer<3> = UpdateComposer::new();
    composer.set_readings(&[12.25, 0.5, 1013.0]).unwrap();
    let mut builder = RequestBuilder::new();
    composer.compose(&config, &mut builder).unwrap();

    let mut request = [0u8; 256];
    let len = builder.write_to_buffer(&mut request, false);

    let mut response = [0u8; 128];
    let reply = b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\n117";
    let mut client =
        NetworkClient::with_config(MockTransport::new().reply(reply), config.client_config());
    client.send_http_request(config.host, &request[..len], &mut response, |ok: bool| {
        assert!(ok)
    });
    run(&mut client, 100);

    let sent = String::from_utf8(client.transport().sent.clone()).unwrap();
    assert!(sent.starts_with(
        "GET /update?api_key=W1&field1=12.2500&field2=0.5000&field3=1013.0000 HTTP/1.1\r\n"
    ));
    assert!(sent.contains("\r\nHost: api.example.com\r\n"));

    let parsed = ResponseParser::parse(client.response());
    assert_eq!(parsed.status(), 200);
    assert_eq!(parsed.body(), b"117");
    assert_eq!(parsed.content_length(), Some(3));
}
