//! Hash map backed by AHash.

pub use ahash::AHashMap as HashMap;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert("projection", 1u32);
        assert_eq!(map.get("projection"), Some(&1));
    }
}
