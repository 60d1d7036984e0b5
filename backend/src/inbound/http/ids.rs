//! Translation between opaque identifiers and record ids at the boundary.
//!
//! Path identifiers that fail to decode are `InvalidId`; cursors supplied in
//! the query string are `InvalidParam`. Neither reveals whether the string
//! was corrupt or simply never issued.

use opaque_id::OpaqueIdCodec;

use crate::domain::{Error, ErrorCode, RecordCursor, RecordId};

fn decode(codec: &OpaqueIdCodec, raw: &str) -> Result<RecordId, String> {
    let numeric = codec.decode(raw).map_err(|err| err.to_string())?;
    RecordId::new(numeric).map_err(|err| err.to_string())
}

/// Decode a record id taken from the path.
pub(crate) fn record_id(codec: &OpaqueIdCodec, raw: &str) -> Result<RecordId, Error> {
    decode(codec, raw).map_err(|detail| Error::new(ErrorCode::InvalidId).wrap(detail))
}

/// Decode the optional `from` cursor. Absent or empty means "newest first".
pub(crate) fn cursor(codec: &OpaqueIdCodec, raw: Option<&str>) -> Result<RecordCursor, Error> {
    match raw {
        None | Some("") => Ok(RecordCursor::newest()),
        Some(raw) => decode(codec, raw)
            .map(RecordCursor::before)
            .map_err(|detail| Error::new(ErrorCode::InvalidParam).wrap(format!("from: {detail}"))),
    }
}

/// Encode a stored id for clients.
pub(crate) fn opaque(codec: &OpaqueIdCodec, id: RecordId) -> Result<String, Error> {
    codec
        .encode(id.get())
        .map_err(|err| Error::internal(format!("encoding record {}: {err}", id.get())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn codec() -> OpaqueIdCodec {
        OpaqueIdCodec::new("boundary-salt", 10).expect("valid codec")
    }

    #[rstest]
    fn issued_ids_decode(codec: OpaqueIdCodec) {
        let id = RecordId::new(42).expect("valid id");
        let raw = opaque(&codec, id).expect("encodes");
        assert_eq!(record_id(&codec, &raw), Ok(id));
    }

    #[rstest]
    #[case("")]
    #[case("not!base62")]
    #[case("abc")]
    fn garbage_path_ids_are_invalid_ids(codec: OpaqueIdCodec, #[case] raw: &str) {
        let err = record_id(&codec, raw).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::InvalidId);
    }

    #[rstest]
    fn zero_is_not_a_record_id(codec: OpaqueIdCodec) {
        let raw = codec.encode(0).expect("zero encodes");
        let err = record_id(&codec, &raw).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::InvalidId);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn missing_or_empty_cursors_start_from_the_newest(
        codec: OpaqueIdCodec,
        #[case] raw: Option<&str>,
    ) {
        assert_eq!(cursor(&codec, raw), Ok(RecordCursor::newest()));
    }

    #[rstest]
    fn cursors_bound_below_the_decoded_id(codec: OpaqueIdCodec) {
        let id = RecordId::new(3).expect("valid id");
        let raw = opaque(&codec, id).expect("encodes");
        assert_eq!(cursor(&codec, Some(&raw)), Ok(RecordCursor::before(id)));
    }

    #[rstest]
    fn undecodable_cursors_are_invalid_params(codec: OpaqueIdCodec) {
        let err = cursor(&codec, Some("???")).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::InvalidParam);
    }
}
