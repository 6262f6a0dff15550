use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use redpepper_client::{
    Client, ClientError, ConnectionConfig, KeyValuePair, ReplyShape, ScoredMember,
};

/// Spawns a scripted server on an ephemeral port. For each entry in
/// `replies` it reads one command, forwards the received tokens to the
/// returned channel, and writes the scripted reply bytes.
fn spawn_server(replies: Vec<Vec<u8>>) -> (String, Receiver<Vec<Vec<u8>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr").to_string();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));
        for reply in replies {
            let args = match read_command(&mut reader) {
                Ok(args) => args,
                Err(_) => return,
            };
            let _ = tx.send(args);
            let _ = stream.write_all(&reply);
            let _ = stream.flush();
        }
    });

    (addr, rx)
}

fn read_command(reader: &mut BufReader<TcpStream>) -> std::io::Result<Vec<Vec<u8>>> {
    let mut line = Vec::new();
    read_line(reader, &mut line)?;
    if line.first() != Some(&b'*') {
        return Err(invalid("expected array header"));
    }
    let count = parse_usize(&line[1..])?;
    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        read_line(reader, &mut line)?;
        if line.first() != Some(&b'$') {
            return Err(invalid("expected bulk header"));
        }
        let len = parse_usize(&line[1..])?;
        let mut data = vec![0u8; len];
        reader.read_exact(&mut data)?;
        let mut crlf = [0u8; 2];
        reader.read_exact(&mut crlf)?;
        if crlf != *b"\r\n" {
            return Err(invalid("missing crlf"));
        }
        args.push(data);
    }
    Ok(args)
}

fn read_line(reader: &mut BufReader<TcpStream>, buf: &mut Vec<u8>) -> std::io::Result<()> {
    buf.clear();
    let read = reader.read_until(b'\n', buf)?;
    if read == 0 {
        return Err(invalid("eof"));
    }
    if buf.len() < 2 || buf[buf.len() - 2] != b'\r' {
        return Err(invalid("invalid line"));
    }
    buf.truncate(buf.len() - 2);
    Ok(())
}

fn parse_usize(data: &[u8]) -> std::io::Result<usize> {
    let text = std::str::from_utf8(data).map_err(|_| invalid("non-utf8 length"))?;
    text.parse().map_err(|_| invalid("bad length"))
}

fn invalid(message: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, message.to_string())
}

// Scripted reply builders.

fn simple(text: &str) -> Vec<u8> {
    format!("+{text}\r\n").into_bytes()
}

fn store_error(text: &str) -> Vec<u8> {
    format!("-{text}\r\n").into_bytes()
}

fn integer(value: i64) -> Vec<u8> {
    format!(":{value}\r\n").into_bytes()
}

fn bulk(data: &[u8]) -> Vec<u8> {
    let mut out = format!("${}\r\n", data.len()).into_bytes();
    out.extend_from_slice(data);
    out.extend_from_slice(b"\r\n");
    out
}

fn nil() -> Vec<u8> {
    b"$-1\r\n".to_vec()
}

fn array(items: &[Vec<u8>]) -> Vec<u8> {
    let mut out = format!("*{}\r\n", items.len()).into_bytes();
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

fn connect(addr: String) -> Client {
    let config = ConnectionConfig {
        addr,
        read_timeout: Some(Duration::from_secs(2)),
        write_timeout: Some(Duration::from_secs(2)),
        connect_timeout: Some(Duration::from_secs(2)),
    };
    let mut client = Client::with_config(config);
    client.connect().expect("connect");
    client
}

fn next_request(rx: &Receiver<Vec<Vec<u8>>>) -> Vec<Vec<u8>> {
    rx.recv_timeout(Duration::from_secs(2)).expect("request")
}

fn tokens(parts: &[&str]) -> Vec<Vec<u8>> {
    parts.iter().map(|p| p.as_bytes().to_vec()).collect()
}

#[test]
fn set_get_roundtrip() {
    let (addr, requests) = spawn_server(vec![simple("OK"), bulk(b"value")]);
    let mut client = connect(addr);

    assert!(client.set(b"key", b"value").expect("set"));
    assert_eq!(client.get(b"key").expect("get"), Some(b"value".to_vec()));

    assert_eq!(next_request(&requests), tokens(&["SET", "key", "value"]));
    assert_eq!(next_request(&requests), tokens(&["GET", "key"]));
}

#[test]
fn get_distinguishes_missing_from_empty() {
    let (addr, _requests) = spawn_server(vec![nil(), bulk(b"")]);
    let mut client = connect(addr);

    assert_eq!(client.get(b"missing").expect("get"), None);
    assert_eq!(client.get(b"empty").expect("get"), Some(Vec::new()));
}

#[test]
fn del_on_missing_key_counts_zero() {
    let (addr, _requests) = spawn_server(vec![integer(0)]);
    let mut client = connect(addr);

    assert_eq!(client.del(b"missing-key").expect("del"), 0);
}

#[test]
fn exists_reports_zero_and_one() {
    let (addr, _requests) = spawn_server(vec![integer(0), integer(1)]);
    let mut client = connect(addr);

    assert_eq!(client.exists(b"k").expect("exists"), 0);
    assert_eq!(client.exists(b"k").expect("exists"), 1);
}

#[test]
fn setnx_reports_first_write_only() {
    let (addr, _requests) = spawn_server(vec![integer(1), integer(0)]);
    let mut client = connect(addr);

    assert!(client.setnx(b"k", b"v").expect("first setnx"));
    assert!(!client.setnx(b"k", b"v").expect("second setnx"));
}

#[test]
fn ttl_passes_negative_conventions_through() {
    let (addr, _requests) = spawn_server(vec![integer(-2), integer(-1), integer(30)]);
    let mut client = connect(addr);

    assert_eq!(client.ttl(b"missing").expect("ttl"), -2);
    assert_eq!(client.ttl(b"no-expiry").expect("ttl"), -1);
    assert_eq!(client.ttl(b"expiring").expect("ttl"), 30);
}

#[test]
fn store_error_is_surfaced_verbatim() {
    let (addr, _requests) = spawn_server(vec![store_error("ERR wrong kind of value")]);
    let mut client = connect(addr);

    match client.get(b"k") {
        Err(ClientError::Store(message)) => assert_eq!(message, "ERR wrong kind of value"),
        other => panic!("expected store error, got {other:?}"),
    }
}

#[test]
fn integer_command_rejects_status_reply() {
    let (addr, _requests) = spawn_server(vec![simple("OK")]);
    let mut client = connect(addr);

    match client.incr(b"k") {
        Err(ClientError::UnexpectedShape { expected, actual }) => {
            assert_eq!(expected, ReplyShape::Integer);
            assert_eq!(actual, "simple string");
        }
        other => panic!("expected shape error, got {other:?}"),
    }
}

#[test]
fn hgetall_builds_pairs() {
    let reply = array(&[bulk(b"f1"), bulk(b"v1"), bulk(b"f2"), bulk(b"v2")]);
    let (addr, requests) = spawn_server(vec![reply, array(&[])]);
    let mut client = connect(addr);

    assert_eq!(
        client.hgetall(b"h").expect("hgetall"),
        vec![KeyValuePair::new("f1", "v1"), KeyValuePair::new("f2", "v2")]
    );
    assert_eq!(client.hgetall(b"empty").expect("hgetall"), Vec::new());

    assert_eq!(next_request(&requests), tokens(&["HGETALL", "h"]));
}

#[test]
fn hgetall_odd_reply_is_shape_error() {
    let reply = array(&[bulk(b"f1"), bulk(b"v1"), bulk(b"dangling")]);
    let (addr, _requests) = spawn_server(vec![reply]);
    let mut client = connect(addr);

    assert!(matches!(
        client.hgetall(b"h"),
        Err(ClientError::UnexpectedShape { .. })
    ));
}

#[test]
fn hmget_embedded_nil_becomes_empty_placeholder() {
    let reply = array(&[bulk(b"v1"), nil()]);
    let (addr, requests) = spawn_server(vec![reply]);
    let mut client = connect(addr);

    let values = client.hmget(b"h", &[b"f1", b"f2"]).expect("hmget");
    assert_eq!(values, vec![b"v1".to_vec(), Vec::new()]);

    assert_eq!(next_request(&requests), tokens(&["HMGET", "h", "f1", "f2"]));
}

#[test]
fn mget_preserves_key_order() {
    let reply = array(&[bulk(b"1"), nil(), bulk(b"3")]);
    let (addr, requests) = spawn_server(vec![reply]);
    let mut client = connect(addr);

    let values = client.mget(&["a", "b", "c"]).expect("mget");
    assert_eq!(values, vec![b"1".to_vec(), Vec::new(), b"3".to_vec()]);

    assert_eq!(next_request(&requests), tokens(&["MGET", "a", "b", "c"]));
}

#[test]
fn mset_flattens_pairs_in_order() {
    let (addr, requests) = spawn_server(vec![simple("OK")]);
    let mut client = connect(addr);

    let pairs = vec![KeyValuePair::new("k1", "v1"), KeyValuePair::new("k2", "v2")];
    assert!(client.mset(&pairs).expect("mset"));

    assert_eq!(
        next_request(&requests),
        tokens(&["MSET", "k1", "v1", "k2", "v2"])
    );
}

#[test]
fn mset_interleaved_rejects_odd_input_before_sending() {
    let (addr, requests) = spawn_server(vec![simple("OK")]);
    let mut client = connect(addr);

    let result = client.mset_interleaved(&["k1", "v1", "k2"]);
    assert!(matches!(result, Err(ClientError::MalformedBatch(_))));

    // The even retry is the first request the server ever sees.
    assert!(client.mset_interleaved(&["k1", "v1"]).expect("mset"));
    assert_eq!(next_request(&requests), tokens(&["MSET", "k1", "v1"]));
}

#[test]
fn detached_client_short_circuits_every_operation() {
    let mut client = Client::new();

    assert!(!client.is_connected());
    assert!(matches!(
        client.get(b"k"),
        Err(ClientError::NotConnected(_))
    ));
    assert!(matches!(
        client.del_many(&[b"a", b"b"]),
        Err(ClientError::NotConnected(_))
    ));
    // Missing connection outranks batch validation.
    assert!(matches!(
        client.mset_interleaved(&["k1", "v1", "k2"]),
        Err(ClientError::NotConnected(_))
    ));
}

#[test]
fn zadd_many_flattens_scores_before_members() {
    let (addr, requests) = spawn_server(vec![integer(2)]);
    let mut client = connect(addr);

    let members = vec![ScoredMember::new(1, "a"), ScoredMember::new(2, "b")];
    assert_eq!(client.zadd_many(b"z", &members).expect("zadd"), 2);

    assert_eq!(
        next_request(&requests),
        tokens(&["ZADD", "z", "1", "a", "2", "b"])
    );
}

#[test]
fn zrangebyscore_passes_bounds_verbatim() {
    let reply = array(&[bulk(b"m1"), bulk(b"m2")]);
    let (addr, requests) = spawn_server(vec![reply]);
    let mut client = connect(addr);

    let members = client
        .zrangebyscore(b"z", b"-inf", b"(10")
        .expect("zrangebyscore");
    assert_eq!(members, vec![b"m1".to_vec(), b"m2".to_vec()]);

    assert_eq!(
        next_request(&requests),
        tokens(&["ZRANGEBYSCORE", "z", "-inf", "(10"])
    );
}

#[test]
fn list_pops_distinguish_empty_lists() {
    let (addr, requests) = spawn_server(vec![bulk(b"head"), nil()]);
    let mut client = connect(addr);

    assert_eq!(client.lpop(b"l").expect("lpop"), Some(b"head".to_vec()));
    assert_eq!(client.rpop(b"l").expect("rpop"), None);

    assert_eq!(next_request(&requests), tokens(&["LPOP", "l"]));
    assert_eq!(next_request(&requests), tokens(&["RPOP", "l"]));
}

#[test]
fn variadic_forms_share_singular_keyword() {
    let (addr, requests) = spawn_server(vec![integer(2), integer(3), integer(1)]);
    let mut client = connect(addr);

    assert_eq!(client.del_many(&["a", "b"]).expect("del"), 2);
    assert_eq!(client.hdel_many(b"h", &["f1", "f2", "f3"]).expect("hdel"), 3);
    assert_eq!(client.sadd_many(b"s", &["m1"]).expect("sadd"), 1);

    assert_eq!(next_request(&requests), tokens(&["DEL", "a", "b"]));
    assert_eq!(
        next_request(&requests),
        tokens(&["HDEL", "h", "f1", "f2", "f3"])
    );
    assert_eq!(next_request(&requests), tokens(&["SADD", "s", "m1"]));
}

#[test]
fn setex_encodes_seconds_between_key_and_value() {
    let (addr, requests) = spawn_server(vec![simple("OK")]);
    let mut client = connect(addr);

    assert!(client.setex(b"k", 60, b"v").expect("setex"));
    assert_eq!(next_request(&requests), tokens(&["SETEX", "k", "60", "v"]));
}

#[test]
fn binary_tokens_survive_whitespace_and_separators() {
    let (addr, requests) = spawn_server(vec![simple("OK")]);
    let mut client = connect(addr);

    assert!(client.set(b"key with spaces", b"v\r\n*1").expect("set"));
    assert_eq!(
        next_request(&requests),
        vec![
            b"SET".to_vec(),
            b"key with spaces".to_vec(),
            b"v\r\n*1".to_vec()
        ]
    );
}
