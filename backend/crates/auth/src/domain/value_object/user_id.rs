pub use kernel::id::UserId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_roundtrip() {
        let user_id = UserId::new(12);
        assert_eq!(user_id.get(), 12);
        assert_eq!(UserId::from(12), user_id);
    }
}
