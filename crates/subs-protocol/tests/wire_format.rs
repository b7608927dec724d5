//! Wire-format scenarios checked through the public API only: codec and
//! validator together, the way the stream uses them.

use subs_protocol::{
    Packer, Packet, PacketType, ProtocolError, Status, TextPacker, Validator,
    VersionValidator,
};

#[test]
fn test_attempt_encodes_and_decodes_to_equal_packet() {
    let packet = Packet::attempt("1.0", 3, 4);
    let bytes = TextPacker.pack(&packet).unwrap();
    assert_eq!(bytes, b"VERSION: 1.0\nTYPE: ATTEMPT\nX-COOR: 3\nY-COOR: 4");
    assert_eq!(TextPacker.unpack(&bytes).unwrap(), packet);
}

#[test]
fn test_answer_encodes_with_status_before_coordinates() {
    let packet = Packet::answer("1.0", Status::Correct, 1, 2);
    assert_eq!(
        TextPacker.pack(&packet).unwrap(),
        b"VERSION: 1.0\nTYPE: ANSWER\nSTATUS: CORRECT\nX-COOR: 1\nY-COOR: 2"
    );
}

#[test]
fn test_decoded_packet_from_old_peer_fails_validation() {
    let validator = VersionValidator::new("1.0");
    let packet = TextPacker
        .unpack(b"VERSION: 0.9\nTYPE: ATTEMPT\nX-COOR: 3\nY-COOR: 4")
        .unwrap();
    assert_eq!(packet.packet_type(), PacketType::Attempt);
    assert!(!validator.is_valid(&packet));
}

#[test]
fn test_status_from_the_wrong_group_decodes_but_is_invalid() {
    let validator = VersionValidator::new("1.0");

    let answer = TextPacker
        .unpack(b"VERSION: 1.0\nTYPE: ANSWER\nSTATUS: CLOSED\nX-COOR: 1\nY-COOR: 1")
        .unwrap();
    assert!(!validator.is_valid(&answer));

    let error = TextPacker
        .unpack(b"VERSION: 1.0\nTYPE: ERROR\nSTATUS: VICTORY")
        .unwrap();
    assert!(!validator.is_valid(&error));
}

#[test]
fn test_decode_failures_are_unpack_errors() {
    let cases: [&[u8]; 4] = [
        b"VERSION: 1.0",
        b"TYPE: READY",
        b"VERSION: 1.0\nTYPE: GARBAGE",
        b"VERSION: 1.0\nTYPE: ATTEMPT\nX-COOR: abc\nY-COOR: 1",
    ];
    for raw in cases {
        let result = TextPacker.unpack(raw);
        assert!(
            matches!(result, Err(ProtocolError::Unpack(_))),
            "{:?} should fail to unpack",
            String::from_utf8_lossy(raw)
        );
    }
}

#[cfg(feature = "json")]
#[test]
fn test_json_and_text_codecs_agree_on_packets() {
    use subs_protocol::JsonPacker;

    let packets = [
        Packet::ready("1.0"),
        Packet::attempt("1.0", 0, -3),
        Packet::answer("1.0", Status::FullSub, 2, 2),
        Packet::error("1.0", Status::OutOfRange),
    ];
    for packet in packets {
        let via_text = TextPacker.unpack(&TextPacker.pack(&packet).unwrap()).unwrap();
        let via_json = JsonPacker.unpack(&JsonPacker.pack(&packet).unwrap()).unwrap();
        assert_eq!(via_text, via_json);
    }
}
