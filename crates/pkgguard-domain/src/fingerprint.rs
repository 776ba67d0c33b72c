use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a finding.
///
/// Identity fields:
/// - check_id
/// - code
/// - manifest_path (relative to the checked root)
/// - dependency name (empty for manifest-level findings)
/// - section key (if present)
pub fn fingerprint_for_dep(
    check_id: &str,
    code: &str,
    manifest_path: &str,
    dep_name: &str,
    section: Option<&str>,
) -> String {
    let mut parts = vec![check_id, code, manifest_path, dep_name];
    if let Some(s) = section {
        parts.push(s);
    }
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_section_sensitive() {
        let a = fingerprint_for_dep("c", "x", "package.json", "rollup", None);
        let b = fingerprint_for_dep("c", "x", "package.json", "rollup", None);
        let c = fingerprint_for_dep("c", "x", "package.json", "rollup", Some("dependencies"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
