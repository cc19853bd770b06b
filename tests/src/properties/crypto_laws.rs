//! # Signing Laws
//!
//! Property tests over the MAC primitives: round-trip, tamper detection,
//! and the data/command region asymmetry.

#[cfg(test)]
mod tests {
    use gateway_crypto::{sign_command, sign_data, verify_command, verify_data};
    use proptest::prelude::*;

    fn secret() -> impl Strategy<Value = Vec<u8>> {
        proptest::collection::vec(any::<u8>(), 16..64)
    }

    fn payload() -> impl Strategy<Value = Vec<u8>> {
        proptest::collection::vec(any::<u8>(), 0..256)
    }

    proptest! {
        /// verify(sign(...)) holds for arbitrary inputs.
        #[test]
        fn prop_sign_verify_round_trip(
            device_id in "[A-Za-z0-9_-]{1,32}",
            timestamp in any::<i64>(),
            message_id in "[a-f0-9-]{1,64}",
            payload in payload(),
            secret in secret(),
        ) {
            let tag = sign_data(&device_id, timestamp, &message_id, &payload, &secret).unwrap();
            prop_assert!(verify_data(&device_id, timestamp, &message_id, &payload, &secret, &tag).unwrap());
        }

        /// Tags are always 64 lowercase hex characters.
        #[test]
        fn prop_tag_is_lowercase_hex(
            device_id in "[A-Za-z0-9_-]{1,32}",
            timestamp in any::<i64>(),
            message_id in "[a-f0-9-]{1,64}",
            payload in payload(),
            secret in secret(),
        ) {
            let tag = sign_data(&device_id, timestamp, &message_id, &payload, &secret).unwrap();
            prop_assert_eq!(tag.len(), 64);
            prop_assert!(tag.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
        }

        /// Flipping any single payload byte after signing breaks the tag.
        #[test]
        fn prop_single_byte_tamper_is_detected(
            device_id in "[A-Za-z0-9_-]{1,32}",
            timestamp in any::<i64>(),
            message_id in "[a-f0-9-]{1,64}",
            (payload, index) in proptest::collection::vec(any::<u8>(), 1..256)
                .prop_flat_map(|p| {
                    let len = p.len();
                    (Just(p), 0..len)
                }),
            secret in secret(),
        ) {
            let tag = sign_data(&device_id, timestamp, &message_id, &payload, &secret).unwrap();
            let mut tampered = payload.clone();
            tampered[index] ^= 0x01;
            prop_assert!(!verify_data(&device_id, timestamp, &message_id, &tampered, &secret, &tag).unwrap());
        }

        /// A timestamp off by one breaks the tag.
        #[test]
        fn prop_timestamp_tamper_is_detected(
            device_id in "[A-Za-z0-9_-]{1,32}",
            timestamp in (i64::MIN + 1)..i64::MAX,
            message_id in "[a-f0-9-]{1,64}",
            payload in payload(),
            secret in secret(),
        ) {
            let tag = sign_data(&device_id, timestamp, &message_id, &payload, &secret).unwrap();
            prop_assert!(!verify_data(&device_id, timestamp + 1, &message_id, &payload, &secret, &tag).unwrap());
            prop_assert!(!verify_data(&device_id, timestamp - 1, &message_id, &payload, &secret, &tag).unwrap());
        }

        /// Command tags verify as commands and never as data messages: the
        /// command region deliberately omits the device identifier.
        #[test]
        fn prop_command_region_asymmetry(
            device_id in "[A-Za-z0-9_-]{1,32}",
            timestamp in any::<i64>(),
            message_id in "[a-f0-9-]{1,64}",
            payload in payload(),
            secret in secret(),
        ) {
            let tag = sign_command(timestamp, &message_id, &payload, &secret).unwrap();
            prop_assert!(verify_command(timestamp, &message_id, &payload, &secret, &tag).unwrap());
            prop_assert!(!verify_data(&device_id, timestamp, &message_id, &payload, &secret, &tag).unwrap());
        }

        /// A different key never verifies.
        #[test]
        fn prop_wrong_key_is_rejected(
            device_id in "[A-Za-z0-9_-]{1,32}",
            timestamp in any::<i64>(),
            message_id in "[a-f0-9-]{1,64}",
            payload in payload(),
            secret in secret(),
            other in secret(),
        ) {
            prop_assume!(secret != other);
            let tag = sign_data(&device_id, timestamp, &message_id, &payload, &secret).unwrap();
            prop_assert!(!verify_data(&device_id, timestamp, &message_id, &payload, &other, &tag).unwrap());
        }
    }
}
