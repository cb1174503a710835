use salary_advance_core::AdvancePolicy;

use crate::input;

/// Load the advance policy named by `--policy`, or the built-in default.
///
/// `.yaml` / `.yml` files are read as YAML, anything else as JSON.
/// Omitted fields keep their default values.
pub fn load_policy(path: Option<&str>) -> Result<AdvancePolicy, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(AdvancePolicy::default());
    };

    let (resolved, contents) = input::file::read_text(path)?;
    let is_yaml = resolved
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let policy = if is_yaml {
        let policy: AdvancePolicy = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?;
        policy.validate()?;
        policy
    } else {
        AdvancePolicy::from_json_str(&contents)?
    };

    tracing::debug!(path = %resolved.display(), ?policy, "loaded advance policy");
    Ok(policy)
}
