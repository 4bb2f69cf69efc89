use aos_config::AosConfig;

/// Emit warnings for an oracle that is missing or configured through
/// mistyped env var keys.
pub fn warn_unconfigured(config: &AosConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &AosConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.oracle.is_configured() {
        if has_single_underscore_key(&env_keys, "AOS_ORACLE") {
            warnings.push(
                "Oracle config appears default while AOS_ORACLE* env vars exist. Use double underscores (example: AOS_ORACLE__API_KEY)."
                    .to_string(),
            );
        } else {
            warnings.push(
                "Oracle not configured; feedback submissions will be marked as errors.".to_string(),
            );
        }
    }

    if has_single_underscore_key(&env_keys, "AOS_ESCALATION") {
        warnings.push(
            "Escalation config appears default while AOS_ESCALATION_* env vars exist. Use double underscores (example: AOS_ESCALATION__STRICT_TRANSITIONS)."
                .to_string(),
        );
    }

    warnings
}

/// `AOS_SECTION_KEY` instead of `AOS_SECTION__KEY`.
fn has_single_underscore_key(keys: &[String], section: &str) -> bool {
    let single = format!("{section}_");
    let double = format!("{section}__");
    keys.iter()
        .any(|key| key.starts_with(&single) && !key.starts_with(&double))
}
