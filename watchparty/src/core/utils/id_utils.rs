use nanoid::nanoid;

pub const ROOM_ID_LEN: usize = 21;

pub fn generate_room_id() -> String {
    nanoid!(ROOM_ID_LEN)
}

/// Room ids are nanoids: 21 characters of `[A-Za-z0-9_-]`.
pub fn is_valid_room_id(room_id: &str) -> bool {
    room_id.len() == ROOM_ID_LEN
        && room_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_valid_and_distinct() {
        let a = generate_room_id();
        let b = generate_room_id();
        assert!(is_valid_room_id(&a));
        assert!(is_valid_room_id(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_malformed_ids() {
        assert!(!is_valid_room_id(""));
        assert!(!is_valid_room_id("short"));
        assert!(!is_valid_room_id("V1StGXR8_Z5jdHi6B-myT0"));
        assert!(!is_valid_room_id("V1StGXR8 Z5jdHi6B-myT"));
        assert!(!is_valid_room_id("V1StGXR8%Z5jdHi6B-myT"));
        assert!(is_valid_room_id("V1StGXR8_Z5jdHi6B-myT"));
    }
}
