/// Allocate an id for a host-side pending bridge call.
///
/// Ids only need to be unique among outstanding calls, but a full v4 uuid
/// keeps them unique for the lifetime of the process as well.
pub fn new_callback_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_id_is_hex() {
        let id = new_callback_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn callback_id_is_unique() {
        let a = new_callback_id();
        let b = new_callback_id();
        assert_ne!(a, b);
    }

    #[test]
    fn callback_id_needs_no_js_escaping() {
        let id = new_callback_id();
        assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{id}\""));
    }
}
