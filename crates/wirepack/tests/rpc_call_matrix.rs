use wirepack::rpc::{CallError, Connector, Transport, TransportError};
use wirepack::{from_bytes, to_bytes, PackError, Tag};

/// In-memory transport: records every request, hands back a scripted reply.
struct ScriptedTransport {
    sent: Vec<(String, Vec<u8>)>,
    reply: Result<Vec<u8>, TransportError>,
}

impl ScriptedTransport {
    fn replying(reply: Result<Vec<u8>, TransportError>) -> Self {
        Self {
            sent: Vec::new(),
            reply,
        }
    }
}

impl Transport for ScriptedTransport {
    fn send_request(&mut self, name: &str, args: &[u8]) -> Result<(), TransportError> {
        self.sent.push((name.to_string(), args.to_vec()));
        Ok(())
    }

    fn receive_reply(&mut self) -> Result<Vec<u8>, TransportError> {
        self.reply.clone()
    }
}

#[test]
fn call_encodes_args_and_decodes_reply() {
    let transport = ScriptedTransport::replying(Ok(to_bytes(&(3i64, "sum".to_string()))));
    let mut conn = Connector::new(transport);

    let (n, s): (i64, String) = conn.call("math.add", &(1i64, 2i64)).unwrap();
    assert_eq!(n, 3);
    assert_eq!(s, "sum");

    let transport = conn.into_transport();
    assert_eq!(transport.sent.len(), 1);
    assert_eq!(transport.sent[0].0, "math.add");
    // The argument tuple travels as a positional wire array.
    assert_eq!(
        from_bytes::<(i64, i64)>(&transport.sent[0].1).unwrap(),
        (1, 2)
    );
}

#[test]
fn remote_error_message_is_verbatim() {
    let transport = ScriptedTransport::replying(Err(TransportError::Remote(
        "ER_NO_SUCH_PROC: foo".to_string(),
    )));
    let mut conn = Connector::new(transport);
    let err = conn.call::<_, i64>("foo", &(1u8,)).unwrap_err();
    match err {
        CallError::Transport(TransportError::Remote(msg)) => {
            assert_eq!(msg, "ER_NO_SUCH_PROC: foo");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn raw_reply_supports_incremental_parse() {
    let transport = ScriptedTransport::replying(Ok(to_bytes(&(1u8, 2u8))));
    let mut conn = Connector::new(transport);
    let reply = conn.call_raw("probe", &(0u8,)).unwrap();
    assert_eq!(reply.tag(), Ok(Tag::Array));
    assert_eq!(reply.bytes()[0], 0x92);
    assert_eq!(reply.parse::<(u8, u8)>(), Ok((1, 2)));
    // Parsing is on demand and repeatable over the owned payload.
    assert_eq!(reply.parse::<(u8, u8)>(), Ok((1, 2)));
}

#[test]
fn reply_decode_failure_is_distinct_from_transport_failure() {
    let transport = ScriptedTransport::replying(Ok(to_bytes(&"not a number")));
    let mut conn = Connector::new(transport);
    let err = conn.call::<_, i64>("f", &(0u8,)).unwrap_err();
    assert_eq!(
        err,
        CallError::Decode(PackError::TypeMismatch {
            found: Tag::Str,
            expected: "int or uint",
        })
    );
}

#[test]
fn connection_failure_propagates() {
    struct DeadTransport;
    impl Transport for DeadTransport {
        fn send_request(&mut self, _name: &str, _args: &[u8]) -> Result<(), TransportError> {
            Err(TransportError::Connection("connection refused".to_string()))
        }
        fn receive_reply(&mut self) -> Result<Vec<u8>, TransportError> {
            unreachable!("send already failed")
        }
    }

    let mut conn = Connector::new(DeadTransport);
    let err = conn.call::<_, i64>("f", &(0u8,)).unwrap_err();
    assert_eq!(
        err,
        CallError::Transport(TransportError::Connection(
            "connection refused".to_string()
        ))
    );
}
