//! Corrupted and truncated blobs must fail with a message naming the
//! offending field.

use settings_blob::{
    decode_blob, encode_blob_with, ConfigBlobBuilder, DecodeError, ErrorKind, FilterSyntaxError,
};

const HEADER: &[u8] = b"DOVECOT-CONFIG\t1.0\n";

fn size(n: u64) -> [u8; 8] {
    n.to_be_bytes()
}

fn blob(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

fn cases() -> Vec<(&'static str, Vec<u8>, &'static str)> {
    vec![
        ("short header", b"D".to_vec(), "File header doesn't begin with DOVECOT-CONFIG line"),
        (
            "header without version",
            b"DOVECOT-CONFIG\t".to_vec(),
            "File header doesn't begin with DOVECOT-CONFIG line",
        ),
        (
            "header without newline",
            b"DOVECOT-CONFIG\t1.0".to_vec(),
            "File header doesn't begin with DOVECOT-CONFIG line",
        ),
        (
            "unsupported version",
            b"DOVECOT-CONFIG\t2.3\n".to_vec(),
            "Unsupported config file version '2.3'",
        ),
        (
            "full size exceeds file",
            blob(&[HEADER, &size(1)]),
            "Full size mismatch",
        ),
        (
            "block size truncated",
            blob(&[HEADER, &size(7), &[0u8; 7]]),
            "Area too small when reading size of 'block size'",
        ),
        (
            "block size zero",
            blob(&[HEADER, &size(8), &size(0)]),
            "'block name' points outside area",
        ),
        (
            "block size exceeds full size",
            blob(&[HEADER, &size(8), &size(1)]),
            "'block size' points outside are",
        ),
        (
            "block name not NUL-terminated",
            blob(&[HEADER, &size(10), &size(1), b"N", b"\0"]),
            "Settings block doesn't end with NUL at offset",
        ),
        (
            "base settings size truncated",
            blob(&[HEADER, &size(17), &size(9), b"N\0", &[0u8; 7]]),
            "Area too small when reading size of 'base settings size'",
        ),
        (
            "base settings size zero",
            blob(&[HEADER, &size(18), &size(10), b"N\0", &size(0)]),
            "'base settings error' points outside area",
        ),
        (
            "base settings error not NUL-terminated",
            blob(&[HEADER, &size(20), &size(12), b"N\0", &size(1), b"E", b"\0"]),
            "'base settings error' points outside area",
        ),
        (
            "filter settings size truncated",
            blob(&[HEADER, &size(26), &size(18), b"N\0", &size(1), b"\0", &[0u8; 7]]),
            "Area too small when reading size of 'filter settings size'",
        ),
        (
            "filter settings size zero",
            blob(&[HEADER, &size(27), &size(19), b"N\0", &size(1), b"\0", &size(0)]),
            "'filter string' points outside area",
        ),
        (
            "filter string not NUL-terminated",
            blob(&[HEADER, &size(29), &size(21), b"N\0", &size(1), b"\0", &size(1), b"F", b"\0"]),
            "'filter string' points outside area",
        ),
        (
            "filter error missing",
            blob(&[HEADER, &size(29), &size(21), b"N\0", &size(1), b"\0", &size(2), b"F\0"]),
            "'filter settings error' points outside area",
        ),
        (
            "filter error not NUL-terminated",
            blob(&[
                HEADER,
                &size(31),
                &size(23),
                b"N\0",
                &size(1),
                b"\0",
                &size(3),
                b"F\0",
                b"E",
                b"\0",
            ]),
            "'filter settings error' points outside area",
        ),
        (
            "invalid filter string",
            blob(&[HEADER, &size(30), &size(22), b"N\0", &size(1), b"\0", &size(3), b"F\0", b"\0"]),
            "Received invalid filter 'F': event filter: syntax error",
        ),
        (
            "duplicate block name",
            blob(&[
                HEADER,
                &size(39),
                &size(21),
                b"N\0",
                &size(1),
                b"\0",
                &size(2),
                b"\0",
                b"\0",
                &size(2),
                b"N\0",
            ]),
            "Duplicate block name 'N'",
        ),
    ]
}

#[test]
fn test_corrupted_blobs_report_field() {
    for (name, data, expected) in cases() {
        let err = match decode_blob(&data) {
            Ok(blob) => panic!("{name}: decoded unexpectedly: {blob:?}"),
            Err(err) => err,
        };
        let message = err.to_string();
        assert!(
            message.contains(expected),
            "{name}: expected {expected:?} in {message:?}"
        );
    }
}

#[test]
fn test_error_kinds() {
    let kinds: Vec<_> = cases()
        .into_iter()
        .map(|(_, data, _)| decode_blob(&data).map(|_| ()).unwrap_err().kind())
        .collect();

    assert_eq!(kinds[0], ErrorKind::Header);
    assert_eq!(kinds[3], ErrorKind::Header);
    assert_eq!(kinds[4], ErrorKind::SizeMismatch);
    assert!(kinds[5..17].iter().all(|k| *k == ErrorKind::AreaBounds));
    assert_eq!(kinds[17], ErrorKind::FilterSyntax);
    assert_eq!(kinds[18], ErrorKind::DuplicateBlock);
}

#[test]
fn test_well_formed_single_block() {
    let data = blob(&[HEADER, &size(29), &size(21), b"N\0", &size(1), b"\0", &size(2), b"\0", b"\0"]);
    let decoded = decode_blob(&data).unwrap();
    assert_eq!(decoded.version, "1.0");
    assert_eq!(decoded.len(), 1);

    let block = decoded.get("N").unwrap();
    assert!(block.base.data.is_empty());
    assert!(!block.base.has_error());
    assert!(block.filter.is_unfiltered());
}

/// Encodes one block carrying `filter` without checking its syntax.
fn blob_with_filter(filter: String) -> Vec<u8> {
    let accept_all = |_: &str| -> Result<(), FilterSyntaxError> { Ok(()) };
    let blob = ConfigBlobBuilder::new().block("N", |b| b.filter(filter)).build();
    encode_blob_with(&blob, &accept_all).unwrap()
}

#[test]
fn test_deeply_nested_filter_is_rejected() {
    let nested = format!("{}a=1{}", "(".repeat(200_000), ")".repeat(200_000));
    let negated = format!("{}a=1", "NOT ".repeat(200_000));

    for filter in [nested, negated] {
        let data = blob_with_filter(filter);
        let err = decode_blob(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FilterSyntax);
        assert!(err
            .to_string()
            .ends_with("event filter: syntax error, expression nested too deeply"));
    }
}

#[test]
fn test_empty_block_name() {
    let data = blob(&[HEADER, &size(28), &size(20), b"\0", &size(1), b"\0", &size(2), b"\0", b"\0"]);
    let err = decode_blob(&data).unwrap_err();
    assert_eq!(err, DecodeError::EmptyBlockName { offset: HEADER.len() + 16 });
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[test]
fn test_non_utf8_diagnostics_decode() {
    let data = blob(&[
        HEADER,
        &size(34),
        &size(26),
        b"N\0",
        &size(5),
        b"caf\xe9\0",
        &size(3),
        b"\0",
        b"\xff\0",
    ]);
    let decoded = decode_blob(&data).unwrap();
    let block = decoded.get("N").unwrap();
    assert_eq!(block.base.error.as_ref(), b"caf\xe9");
    assert_eq!(block.base.error_text(), "caf\u{fffd}");
    assert_eq!(block.filter.error.as_ref(), b"\xff");
}
