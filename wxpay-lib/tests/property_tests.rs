//! Property-based tests for wxpay-lib
//!
//! These tests use proptest to verify signing invariants across a wide range of inputs.

#[cfg(test)]
mod signing_properties {
    use proptest::prelude::*;
    use wxpay_lib::signing::{self, VerifyResult};
    use wxpay_lib::FieldSet;

    fn field_pairs() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::btree_map("[a-zA-Z_]{1,12}", "[ -~]{1,24}", 0..12)
            .prop_map(|m| {
                m.into_iter()
                    .filter(|(k, _)| k != "sign" && k != "key")
                    .collect()
            })
    }

    proptest! {
        /// Signing twice yields the same signature
        #[test]
        fn sign_deterministic(pairs in field_pairs(), secret in "[a-zA-Z0-9]{32}") {
            let fields: FieldSet = pairs.into_iter().collect();
            prop_assert_eq!(signing::sign(&fields, &secret), signing::sign(&fields, &secret));
        }

        /// Insertion order never affects the signature
        #[test]
        fn sign_ignores_insertion_order(pairs in field_pairs(), secret in "[a-zA-Z0-9]{32}") {
            let forward: FieldSet = pairs.iter().cloned().collect();
            let reversed: FieldSet = pairs.iter().rev().cloned().collect();
            prop_assert_eq!(signing::sign(&forward, &secret), signing::sign(&reversed, &secret));
        }

        /// Empty-valued fields never affect the signature
        #[test]
        fn sign_ignores_empty_fields(
            pairs in field_pairs(),
            extra in "[a-z]{1,12}",
            secret in "[a-zA-Z0-9]{32}"
        ) {
            let fields: FieldSet = pairs.into_iter().collect();
            prop_assume!(!fields.contains_key(&extra));
            let padded = fields.clone().with(extra, "");
            prop_assert_eq!(signing::sign(&fields, &secret), signing::sign(&padded, &secret));
        }

        /// An existing sign entry is stripped before signing
        #[test]
        fn sign_strips_reserved_keys(
            pairs in field_pairs(),
            stale in "[A-F0-9]{32}",
            secret in "[a-zA-Z0-9]{32}"
        ) {
            let fields: FieldSet = pairs.into_iter().collect();
            let with_sign = fields.clone().with("sign", stale).with("key", "other");
            prop_assert_eq!(signing::sign(&fields, &secret), signing::sign(&with_sign, &secret));
        }

        /// Signatures are 32 uppercase hex characters
        #[test]
        fn sign_format(pairs in field_pairs(), secret in "[a-zA-Z0-9]{1,32}") {
            let fields: FieldSet = pairs.into_iter().collect();
            let sig = signing::sign(&fields, &secret);
            prop_assert_eq!(sig.len(), 32);
            prop_assert!(sig.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        }

        /// Verification does not care about the case of the presented signature
        #[test]
        fn verify_case_insensitive(data in "[ -~]{0,64}", secret in "[a-zA-Z0-9]{32}") {
            let sig = format!("{:x}", md5::compute(format!("{}&Key={}", data, secret)));
            prop_assert_eq!(signing::verify(&data, &sig, &secret), VerifyResult::Ok);
            prop_assert_eq!(signing::verify(&data, &sig.to_uppercase(), &secret), VerifyResult::Ok);
            prop_assert_eq!(
                signing::verify(&data, &sig.to_lowercase(), &secret),
                signing::verify(&data, &sig, &secret)
            );
        }

        /// Flipping any single character of a valid signature is rejected
        #[test]
        fn verify_rejects_tampering(
            data in "[ -~]{0,64}",
            secret in "[a-zA-Z0-9]{32}",
            index in 0usize..32
        ) {
            let sig = format!("{:x}", md5::compute(format!("{}&Key={}", data, secret)));
            let mut chars: Vec<char> = sig.chars().collect();
            chars[index] = if chars[index] == '0' { '1' } else { '0' };
            let tampered: String = chars.into_iter().collect();
            prop_assert_eq!(signing::verify(&data, &tampered, &secret), VerifyResult::Mismatch);
        }
    }
}

#[cfg(test)]
mod codec_properties {
    use proptest::prelude::*;
    use wxpay_lib::{xml, FieldSet};

    proptest! {
        /// Whatever is encoded decodes back to the same field set
        #[test]
        fn encoded_fields_decode(
            pairs in prop::collection::btree_map("[a-z][a-z_]{0,11}", "[ -~\u{4e00}-\u{4e20}]{0,24}", 0..10)
        ) {
            let fields: FieldSet = pairs.into_iter().collect();
            let decoded = xml::decode_fields(&xml::encode_fields(&fields)).unwrap();
            prop_assert_eq!(decoded, fields);
        }
    }
}
