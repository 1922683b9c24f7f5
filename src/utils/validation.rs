/// Strips directory components and control characters from a
/// client-supplied filename. Falls back to `"unnamed"` when nothing
/// usable remains.
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);

    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    let trimmed = cleaned.trim().trim_matches('.').trim();

    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_unchanged() {
        assert_eq!(sanitize_filename("cube.glb"), "cube.glb");
    }

    #[test]
    fn test_path_components_stripped() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\temp\\part.obj"), "part.obj");
    }

    #[test]
    fn test_dot_names_rejected() {
        assert_eq!(sanitize_filename(".."), "unnamed");
        assert_eq!(sanitize_filename(""), "unnamed");
    }

    #[test]
    fn test_control_characters_removed() {
        assert_eq!(sanitize_filename("mo\u{0}del\n.obj"), "model.obj");
    }
}
