//! Media storage implementations - local filesystem and in-memory.

mod fs;
mod memory;

pub use fs::FileSystemMediaStorage;
pub use memory::InMemoryMediaStorage;

/// `name.ext` → `name_<7 random chars>.ext`, used when a name is taken.
pub(crate) fn with_random_suffix(file_name: &str) -> String {
    let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(7).collect();
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, suffix, ext),
        _ => format!("{}_{}", file_name, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_suffix_keeps_extension() {
        let name = with_random_suffix("small.gif");
        assert!(name.starts_with("small_"));
        assert!(name.ends_with(".gif"));
        assert_eq!(name.len(), "small_.gif".len() + 7);

        assert!(with_random_suffix("README").starts_with("README_"));
    }
}
