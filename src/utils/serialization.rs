// Canonical encoding used for hashing. Everything goes through serde_json::Value
// first so object keys come out sorted no matter how the struct declares them.
use crate::utils::hash_hex;
use serde::Serialize;

/// Compact JSON with sorted object keys
pub fn canonical_json<T: Serialize + ?Sized>(data: &T) -> String {
    let value = serde_json::to_value(data)
        .expect("Ledger records only contain string keys and finite numbers");
    value.to_string()
}

/// Hex SHA-256 over the canonical JSON of `data`
pub fn digest<T: Serialize + ?Sized>(data: &T) -> String {
    hash_hex(canonical_json(data).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Unordered {
        zeta: u64,
        alpha: String,
        middle: f64,
    }

    #[test]
    fn test_keys_are_sorted() {
        let data = Unordered {
            zeta: 1,
            alpha: "a".to_string(),
            middle: 2.5,
        };
        assert_eq!(
            canonical_json(&data),
            r#"{"alpha":"a","middle":2.5,"zeta":1}"#
        );
    }

    #[test]
    fn test_digest_is_stable_across_copies() {
        let first = Unordered {
            zeta: 7,
            alpha: "x".to_string(),
            middle: 0.1,
        };
        let second = Unordered {
            zeta: 7,
            alpha: "x".to_string(),
            middle: 0.1,
        };
        assert_eq!(digest(&first), digest(&second));
    }

    #[test]
    fn test_digest_changes_with_content() {
        assert_ne!(digest(&vec![1, 2, 3]), digest(&vec![1, 2, 4]));
    }
}
