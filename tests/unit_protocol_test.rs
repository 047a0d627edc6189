use bytes::{Bytes, BytesMut};
use cacheorbust::core::CacheOrBustError;
use cacheorbust::core::protocol::{MAX_LINE_LENGTH, Request, Response, TextCodec};
use tokio_util::codec::Decoder;

// --- Request parsing ---

#[test]
fn test_parse_get() {
    let request = Request::parse("get mykey http://example.com/page 60").unwrap();
    assert_eq!(
        request,
        Request::Get {
            key: "mykey".to_string(),
            url: "http://example.com/page".to_string(),
            ttl: Some(60),
        }
    );
}

#[test]
fn test_parse_get_without_ttl() {
    let request = Request::parse("get mykey http://example.com/page").unwrap();
    assert!(matches!(request, Request::Get { ttl: None, .. }));
}

#[test]
fn test_parse_get_malformed_ttl_is_accepted() {
    let request = Request::parse("get mykey http://example.com/page soon").unwrap();
    assert!(matches!(request, Request::Get { ttl: None, .. }));
}

#[test]
fn test_parse_get_negative_ttl() {
    let request = Request::parse("get mykey http://example.com/page -1").unwrap();
    assert!(matches!(request, Request::Get { ttl: Some(-1), .. }));
}

#[test]
fn test_parse_get_missing_key() {
    let err = Request::parse("get").unwrap_err();
    assert!(matches!(err, CacheOrBustError::ClientError("missing key")));
}

#[test]
fn test_parse_get_missing_url() {
    let err = Request::parse("get mykey").unwrap_err();
    assert!(matches!(err, CacheOrBustError::ClientError("missing URL")));
}

#[test]
fn test_parse_get_extra_data() {
    let err = Request::parse("get mykey http://example.com/ 60 surplus").unwrap_err();
    assert!(matches!(
        err,
        CacheOrBustError::ClientError("extra data after TTL")
    ));
}

#[test]
fn test_parse_simple_commands() {
    assert_eq!(Request::parse("stats").unwrap(), Request::Stats);
    assert_eq!(Request::parse("flush_all").unwrap(), Request::FlushAll);
    assert_eq!(Request::parse("quit").unwrap(), Request::Quit);
}

#[test]
fn test_parse_unknown_command() {
    let err = Request::parse("set mykey 0 0 5").unwrap_err();
    assert!(matches!(err, CacheOrBustError::UnknownCommand(cmd) if cmd == "set"));
}

#[test]
fn test_parse_empty_line_is_unknown() {
    let err = Request::parse("").unwrap_err();
    assert!(matches!(err, CacheOrBustError::UnknownCommand(cmd) if cmd.is_empty()));
}

// --- Line decoding ---

#[test]
fn test_decode_strips_crlf() {
    let mut codec = TextCodec;
    let mut buf = BytesMut::from(&b"stats\r\nquit\r\n"[..]);
    assert_eq!(codec.decode(&mut buf).unwrap(), Some("stats".to_string()));
    assert_eq!(codec.decode(&mut buf).unwrap(), Some("quit".to_string()));
    assert_eq!(codec.decode(&mut buf).unwrap(), None);
}

#[test]
fn test_decode_accepts_bare_newline() {
    let mut codec = TextCodec;
    let mut buf = BytesMut::from(&b"stats\n"[..]);
    assert_eq!(codec.decode(&mut buf).unwrap(), Some("stats".to_string()));
}

#[test]
fn test_decode_waits_for_terminator() {
    let mut codec = TextCodec;
    let mut buf = BytesMut::from(&b"get partial"[..]);
    assert_eq!(codec.decode(&mut buf).unwrap(), None);
    buf.extend_from_slice(b" http://x/\r\n");
    assert!(codec.decode(&mut buf).unwrap().is_some());
}

#[test]
fn test_decode_oversized_line_is_an_error() {
    let mut codec = TextCodec;
    let mut buf = BytesMut::from(vec![b'a'; MAX_LINE_LENGTH + 2].as_slice());
    assert!(matches!(
        codec.decode(&mut buf),
        Err(CacheOrBustError::LineTooLong)
    ));
}

// --- Response encoding ---

#[test]
fn test_encode_value() {
    let response = Response::Value {
        key: "k".to_string(),
        body: Bytes::from_static(b"hello"),
    };
    assert_eq!(
        response.encode_to_vec().unwrap(),
        b"VALUE k 0 5\r\nhello\r\nEND\r\n"
    );
}

#[test]
fn test_encode_empty_value() {
    let response = Response::Value {
        key: "k".to_string(),
        body: Bytes::new(),
    };
    assert_eq!(response.encode_to_vec().unwrap(), b"VALUE k 0 0\r\n\r\nEND\r\n");
}

#[test]
fn test_encode_simple_responses() {
    assert_eq!(Response::End.encode_to_vec().unwrap(), b"END\r\n");
    assert_eq!(Response::Ok.encode_to_vec().unwrap(), b"OK\r\n");
    assert_eq!(Response::Error.encode_to_vec().unwrap(), b"ERROR\r\n");
    assert_eq!(
        Response::ClientError("missing URL").encode_to_vec().unwrap(),
        b"CLIENT_ERROR missing URL\r\n"
    );
    assert_eq!(
        Response::ServerError("could not set sentinel".to_string())
            .encode_to_vec()
            .unwrap(),
        b"SERVER_ERROR could not set sentinel\r\n"
    );
}

#[test]
fn test_encode_stats() {
    let response = Response::Stats(vec![("hit", "3".to_string()), ("miss", "2".to_string())]);
    assert_eq!(
        response.encode_to_vec().unwrap(),
        b"STAT hit 3\r\nSTAT miss 2\r\nEND\r\n"
    );
}
