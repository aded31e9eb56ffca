use bytes::Bytes;
use citrine::core::commands::shapers;
use citrine::core::protocol::{RespReply, Value};

fn bulk(data: &'static [u8]) -> RespReply {
    RespReply::Bulk(Some(Bytes::from_static(data)))
}

#[tokio::test]
async fn test_default_shaper_lifts_ok_to_true() {
    let value = shapers::shape_value(RespReply::Status("OK".to_string())).unwrap();
    assert_eq!(value, Value::Bool(true));
}

#[tokio::test]
async fn test_default_shaper_keeps_other_status_text() {
    let value = shapers::shape_value(RespReply::Status("QUEUED".to_string())).unwrap();
    assert_eq!(value, Value::Status("QUEUED".to_string()));
}

#[tokio::test]
async fn test_default_shaper_maps_nils() {
    assert_eq!(shapers::shape_value(RespReply::Bulk(None)).unwrap(), Value::Nil);
    assert_eq!(shapers::shape_value(RespReply::Integer(None)).unwrap(), Value::Nil);
    assert_eq!(
        shapers::shape_value(RespReply::MultiBulk(None)).unwrap(),
        Value::Nil
    );
}

#[tokio::test]
async fn test_default_shaper_recurses_into_multibulk() {
    let value = shapers::shape_value(RespReply::MultiBulk(Some(vec![
        bulk(b"a"),
        RespReply::Integer(Some(2)),
        RespReply::Bulk(None),
    ])))
    .unwrap();
    assert_eq!(
        value,
        Value::List(vec![
            Value::Blob(Bytes::from_static(b"a")),
            Value::Int(2),
            Value::Nil,
        ])
    );
}

#[tokio::test]
async fn test_pong_shaper_true_only_for_pong() {
    assert_eq!(
        shapers::shape_pong(RespReply::Status("PONG".to_string())).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(shapers::shape_pong(bulk(b"PONG")).unwrap(), Value::Bool(true));
    assert_eq!(
        shapers::shape_pong(RespReply::Status("pong".to_string())).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        shapers::shape_pong(RespReply::Integer(Some(1))).unwrap(),
        Value::Bool(false)
    );
}

#[tokio::test]
async fn test_bool_shaper_coerces_integers() {
    assert_eq!(
        shapers::shape_bool(RespReply::Integer(Some(1))).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        shapers::shape_bool(RespReply::Integer(Some(0))).unwrap(),
        Value::Bool(false)
    );
    // DEL over several keys answers with the count; still a success.
    assert_eq!(
        shapers::shape_bool(RespReply::Integer(Some(3))).unwrap(),
        Value::Bool(true)
    );
}

#[tokio::test]
async fn test_keys_shaper_splits_bulk_on_spaces() {
    let value = shapers::shape_keys(bulk(b"a b c d")).unwrap();
    assert_eq!(
        value,
        Value::List(vec![
            Value::Blob(Bytes::from_static(b"a")),
            Value::Blob(Bytes::from_static(b"b")),
            Value::Blob(Bytes::from_static(b"c")),
            Value::Blob(Bytes::from_static(b"d")),
        ])
    );
}

#[tokio::test]
async fn test_keys_shaper_empty_bulk_is_empty_list() {
    assert_eq!(shapers::shape_keys(bulk(b"")).unwrap(), Value::List(Vec::new()));
    assert_eq!(
        shapers::shape_keys(RespReply::Bulk(None)).unwrap(),
        Value::List(Vec::new())
    );
}

#[tokio::test]
async fn test_keys_shaper_accepts_protocol_multibulk() {
    let value = shapers::shape_keys(RespReply::MultiBulk(Some(vec![
        bulk(b"alpha"),
        bulk(b"beta"),
    ])))
    .unwrap();
    assert_eq!(
        value,
        Value::List(vec![
            Value::Blob(Bytes::from_static(b"alpha")),
            Value::Blob(Bytes::from_static(b"beta")),
        ])
    );
}

#[tokio::test]
async fn test_randomkey_shaper_maps_empty_to_nil() {
    assert_eq!(shapers::shape_randomkey(bulk(b"")).unwrap(), Value::Nil);
    assert_eq!(
        shapers::shape_randomkey(RespReply::Status(String::new())).unwrap(),
        Value::Nil
    );
    assert_eq!(
        shapers::shape_randomkey(bulk(b"some-key")).unwrap(),
        Value::Blob(Bytes::from_static(b"some-key"))
    );
}

#[tokio::test]
async fn test_info_shaper_builds_ordered_mapping() {
    let report = b"redis_version:1.2.6\r\nconnected_clients:1\r\nrole:master\r\n\r\n";
    let value = shapers::shape_info(bulk(report)).unwrap();
    assert_eq!(
        value,
        Value::Map(vec![
            ("redis_version".to_string(), "1.2.6".to_string()),
            ("connected_clients".to_string(), "1".to_string()),
            ("role".to_string(), "master".to_string()),
        ])
    );
}

#[tokio::test]
async fn test_info_shaper_splits_on_first_colon_only() {
    let value = shapers::shape_info(bulk(b"config_file:/etc/redis:6379.conf\r\n")).unwrap();
    assert_eq!(
        value,
        Value::Map(vec![(
            "config_file".to_string(),
            "/etc/redis:6379.conf".to_string()
        )])
    );
}
