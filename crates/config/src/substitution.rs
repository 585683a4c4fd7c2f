use std::env;
use tracing::{debug, warn};

/// Substitute environment variables in the `${VAR_NAME}` form.
///
/// Unset variables keep their placeholder so the validator can flag
/// them later instead of failing the load.
pub fn substitute_env_vars(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if after[..end].chars().all(|c| c.is_alphanumeric() || c == '_') => {
                let var_name = &after[..end];
                match env::var(var_name) {
                    Ok(value) => {
                        debug!(var = var_name, "Substituting environment variable");
                        result.push_str(&value);
                    }
                    Err(_) => {
                        warn!(var = var_name, "Environment variable not set");
                        result.push_str(&rest[start..start + 2 + end + 1]);
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                // Not a well-formed placeholder, emit it verbatim
                result.push_str("${");
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

/// Check if a string still contains unresolved `${VAR}` placeholders.
pub fn has_unresolved_env_vars(content: &str) -> bool {
    let mut rest = content;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        if let Some(end) = after.find('}') {
            if !after[..end].is_empty()
                && after[..end].chars().all(|c| c.is_alphanumeric() || c == '_')
            {
                return true;
            }
        }
        rest = after;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_set_variable() {
        std::env::set_var("OPENBID_TEST_SUB_VAR", "42");
        let out = substitute_env_vars("capacity: ${OPENBID_TEST_SUB_VAR}");
        assert_eq!(out, "capacity: 42");
    }

    #[test]
    fn test_keeps_unset_variable_placeholder() {
        let out = substitute_env_vars("secret: ${OPENBID_TEST_UNSET_VAR}");
        assert_eq!(out, "secret: ${OPENBID_TEST_UNSET_VAR}");
        assert!(has_unresolved_env_vars(&out));
    }

    #[test]
    fn test_plain_content_untouched() {
        let out = substitute_env_vars("name: OpenBid\nport: 9090\n");
        assert_eq!(out, "name: OpenBid\nport: 9090\n");
        assert!(!has_unresolved_env_vars(&out));
    }
}
