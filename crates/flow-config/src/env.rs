use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Matches `{{ env.VAR }}` and `{{ env.VAR | default("fallback") }}`
fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in raw TOML text
///
/// A `| default("...")` suffix supplies the value for unset variables.
/// Comment lines are copied through untouched so that commented-out
/// secrets never have to exist in the environment.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut lines = Vec::new();

    for line in input.split('\n') {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_owned());
        } else {
            lines.push(expand_line(line)?);
        }
    }

    Ok(lines.join("\n"))
}

fn expand_line(line: &str) -> Result<String, String> {
    let mut expanded = String::with_capacity(line.len());
    let mut cursor = 0;

    for captures in placeholder().captures_iter(line) {
        let whole = captures.get(0).expect("group 0 always matches");
        expanded.push_str(&line[cursor..whole.start()]);
        expanded.push_str(&resolve(&captures)?);
        cursor = whole.end();
    }

    expanded.push_str(&line[cursor..]);
    Ok(expanded)
}

fn resolve(captures: &Captures<'_>) -> Result<String, String> {
    let key = &captures[1];
    let fallback = captures.get(2).map(|m| m.as_str());

    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(var_name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_owned()),
        (Err(_), None) => Err(format!("environment variable not found: `{var_name}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "[endpoint]\ntimeout = \"30s\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn api_key_from_environment() {
        temp_env::with_var("FLOW_TEST_KEY", Some("sk-123"), || {
            let result = expand_env("api_key = \"{{ env.FLOW_TEST_KEY }}\"").unwrap();
            assert_eq!(result, "api_key = \"sk-123\"");
        });
    }

    #[test]
    fn several_placeholders_on_one_line() {
        let vars = [("FLOW_TENANT", Some("acme")), ("FLOW_AGENT", Some("bot"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("x = \"{{ env.FLOW_TENANT }}/{{env.FLOW_AGENT}}\"").unwrap();
            assert_eq!(result, "x = \"acme/bot\"");
        });
    }

    #[test]
    fn unset_variable_names_the_variable() {
        temp_env::with_var_unset("FLOW_MISSING", || {
            let err = expand_env("api_key = \"{{ env.FLOW_MISSING }}\"").unwrap_err();
            assert!(err.contains("FLOW_MISSING"));
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        temp_env::with_var_unset("FLOW_OPTIONAL", || {
            let result = expand_env("t = \"{{ env.FLOW_OPTIONAL | default(\"60s\") }}\"").unwrap();
            assert_eq!(result, "t = \"60s\"");
        });

        temp_env::with_var("FLOW_OPTIONAL", Some("5s"), || {
            let result = expand_env("t = \"{{ env.FLOW_OPTIONAL | default(\"60s\") }}\"").unwrap();
            assert_eq!(result, "t = \"5s\"");
        });
    }

    #[test]
    fn non_env_scope_is_rejected() {
        let err = expand_env("key = \"{{ secrets.KEY }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));
    }

    #[test]
    fn comments_are_not_expanded() {
        temp_env::with_var_unset("FLOW_MISSING", || {
            let input = "  # api_key = \"{{ env.FLOW_MISSING }}\"\nmodel = \"o3-mini\"";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
