use rand::Rng;
use telenode::network::application::http::{MAX_HEADERS, RequestBuilder};

fn written(builder: &RequestBuilder<'_>, add_content_length: bool) -> String {
    let mut buffer = [0u8; 512];
    let len = builder.write_to_buffer(&mut buffer, add_content_length);
    String::from_utf8(buffer[..len].to_vec()).unwrap()
}

#[test]
fn test_request_line_only() {
    let mut builder = RequestBuilder::new();
    builder.set_method_and_url("GET", "/");
    assert_eq!(written(&builder, false), "GET / HTTP/1.1\r\n");
}

#[test]
fn test_headers_in_insertion_order() {
    let mut builder = RequestBuilder::new();
    builder.set_method_and_url("GET", "/");
    builder.put_header("Host", "www.example.com");
    builder.put_header("Content-Type", "text/html");
    assert_eq!(
        written(&builder, false),
        "GET / HTTP/1.1\r\nHost: www.example.com\r\nContent-Type: text/html\r\n"
    );
}

#[test]
fn test_body_with_content_length() {
    let mut builder = RequestBuilder::new();
    builder.set_method_and_url("GET", "/");
    builder.put_header("Host", "www.example.com");
    builder.put_header("Content-Type", "text/html");
    builder.put_body(Some("This is some data in the body."));
    assert_eq!(
        written(&builder, true),
        "GET / HTTP/1.1\r\n\
         Host: www.example.com\r\n\
         Content-Type: text/html\r\n\
         Content-Length: 30\r\n\
         \r\n\
         This is some data in the body.\r\n"
    );
}

#[test]
fn test_body_without_content_length() {
    let mut builder = RequestBuilder::new();
    builder.set_method_and_url("POST", "/data");
    builder.put_body(Some("a=1"));
    assert_eq!(written(&builder, false), "POST /data HTTP/1.1\r\n\r\na=1\r\n");
}

#[test]
fn test_content_length_needs_body() {
    let mut builder = RequestBuilder::new();
    builder.set_method_and_url("GET", "/");
    assert_eq!(written(&builder, true), "GET / HTTP/1.1\r\n");
}

#[test]
fn test_url_parameters() {
    let mut builder = RequestBuilder::new();
    builder.set_method_and_url("GET", "/update");
    builder.set_url_param("Param1", "Param1Value");
    builder.set_url_param("Param2", "Param2Value");
    builder.put_header("Host", "www.example.com");
    assert_eq!(
        written(&builder, false),
        "GET /update?Param1=Param1Value&Param2=Param2Value HTTP/1.1\r\nHost: www.example.com\r\n"
    );
}

#[test]
fn test_reset_clears_everything() {
    let mut builder = RequestBuilder::new();
    builder.set_method_and_url("POST", "/a");
    builder.set_url_param("k", "v");
    builder.put_header("Host", "h");
    builder.put_body(Some("body"));

    builder.reset();
    builder.set_method_and_url("GET", "/b");
    assert_eq!(written(&builder, true), "GET /b HTTP/1.1\r\n");
}

#[test]
fn test_header_list_is_bounded() {
    let mut builder = RequestBuilder::new();
    for _ in 0..MAX_HEADERS {
        assert!(builder.put_header("X-A", "1"));
    }
    assert!(!builder.put_header("X-B", "2"));
    assert_eq!(builder.headers().len(), MAX_HEADERS);
}

#[test]
fn test_small_buffer_truncates() {
    let mut builder = RequestBuilder::new();
    builder.set_method_and_url("GET", "/");
    builder.put_header("Host", "www.example.com");

    let mut buffer = [0u8; 10];
    let len = builder.write_to_buffer(&mut buffer, false);
    assert_eq!(len, 10);
    assert_eq!(&buffer, b"GET / HTTP");
    assert_eq!(builder.encoded_len(false), 39);
}

const WORDS: [&str; 8] = ["a", "id", "Host", "text/plain", "/x", "value", "42", "Keep"];

#[test]
fn test_random_requests_stay_in_bounds() {
    let mut rng = rand::thread_rng();

    for _ in 0..500 {
        let mut builder = RequestBuilder::new();
        let method = ["GET", "POST", "PUT", "DELETE"][rng.gen_range(0..4)];
        let url = WORDS[rng.gen_range(0..WORDS.len())];
        builder.set_method_and_url(method, url);

        for _ in 0..rng.gen_range(0..6) {
            builder.set_url_param(
                WORDS[rng.gen_range(0..WORDS.len())],
                WORDS[rng.gen_range(0..WORDS.len())],
            );
        }
        let mut names = Vec::new();
        for _ in 0..rng.gen_range(0..6) {
            let name = WORDS[rng.gen_range(0..WORDS.len())];
            builder.put_header(name, WORDS[rng.gen_range(0..WORDS.len())]);
            names.push(name);
        }
        if rng.gen_bool(0.5) {
            builder.put_body(Some(WORDS[rng.gen_range(0..WORDS.len())]));
        }
        let add_content_length = rng.gen_bool(0.5);

        let full = written(&builder, add_content_length);
        assert!(full.starts_with(&format!("{} {}", method, url)));
        assert!(full.lines().next().unwrap().ends_with(" HTTP/1.1"));
        assert_eq!(full.len(), builder.encoded_len(add_content_length));

        // Header lines follow the request line in insertion order.
        for (line, name) in full.split("\r\n").skip(1).zip(&names) {
            assert!(line.starts_with(&format!("{}: ", name)));
        }

        let capacity = rng.gen_range(0..full.len() + 8);
        let mut buffer = vec![0u8; capacity];
        let len = builder.write_to_buffer(&mut buffer, add_content_length);
        assert!(len <= capacity);
        assert_eq!(&buffer[..len], &full.as_bytes()[..len]);
    }
}
