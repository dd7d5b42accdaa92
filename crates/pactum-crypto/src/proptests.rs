
#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use crate::encoding;
    use crate::keypair::{sign, verify, KeyPair};

    proptest! {
        // Any seed, any payload: a signature verifies under its own key
        #[test]
        fn test_sign_verify_round_trip(
            seed in any::<[u8; 32]>(),
            payload in any::<Vec<u8>>()
        ) {
            let pair = KeyPair::from_private_key(&seed).unwrap();
            let sig = sign(&payload, pair.private_key()).unwrap();
            prop_assert!(verify(&sig, &payload, pair.public_key()).unwrap());
        }

        // Signature by another key over the same payload is rejected
        #[test]
        fn test_foreign_signature_rejected(
            seed_a in any::<[u8; 32]>(),
            seed_b in any::<[u8; 32]>(),
            payload in any::<Vec<u8>>()
        ) {
            prop_assume!(seed_a != seed_b);
            let a = KeyPair::from_private_key(&seed_a).unwrap();
            let b = KeyPair::from_private_key(&seed_b).unwrap();

            let sig = sign(&payload, b.private_key()).unwrap();
            prop_assert!(!verify(&sig, &payload, a.public_key()).unwrap());
        }

        // Flipping any bit of the signed payload breaks verification
        #[test]
        fn test_tampered_payload_rejected(
            seed in any::<[u8; 32]>(),
            payload in proptest::collection::vec(any::<u8>(), 1..128),
            index in any::<prop::sample::Index>(),
            bit in 0u8..8
        ) {
            let pair = KeyPair::from_private_key(&seed).unwrap();
            let sig = sign(&payload, pair.private_key()).unwrap();

            let mut tampered = payload.clone();
            let i = index.index(tampered.len());
            tampered[i] ^= 1 << bit;
            prop_assert!(!verify(&sig, &tampered, pair.public_key()).unwrap());
        }

        // Base64 is lossless for every length, including non-multiples of 3
        #[test]
        fn test_base64_lossless(bytes in any::<Vec<u8>>()) {
            let text = encoding::encode(&bytes);
            prop_assert_eq!(encoding::decode(&text).unwrap(), bytes);
        }
    }
}
