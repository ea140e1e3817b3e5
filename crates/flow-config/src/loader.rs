use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is unparsable, a profile has no
    /// model, or a sampling value is out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.endpoint.timeout()?;
        self.validate_completion_profiles()?;
        self.validate_invocation()?;
        Ok(())
    }

    fn validate_completion_profiles(&self) -> anyhow::Result<()> {
        if self.completion.is_empty() {
            anyhow::bail!("at least one completion profile must be configured");
        }

        for (name, profile) in &self.completion {
            if profile.model.trim().is_empty() {
                anyhow::bail!("completion profile '{name}' has an empty model");
            }
            if let Some(temperature) = profile.temperature {
                check_temperature(temperature).map_err(|e| anyhow::anyhow!("completion profile '{name}': {e}"))?;
            }
            if let Some(top_p) = profile.top_p {
                check_top_p(top_p).map_err(|e| anyhow::anyhow!("completion profile '{name}': {e}"))?;
            }
        }

        Ok(())
    }

    fn validate_invocation(&self) -> anyhow::Result<()> {
        let invocation = &self.invocation;

        check_temperature(invocation.temperature).map_err(|e| anyhow::anyhow!("invocation: {e}"))?;
        check_top_p(invocation.top_p).map_err(|e| anyhow::anyhow!("invocation: {e}"))?;

        if invocation.allowed_models.is_empty() {
            anyhow::bail!("invocation.allowed_models must not be empty");
        }

        Ok(())
    }
}

fn check_temperature(value: f64) -> Result<(), String> {
    if (0.0..=2.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("temperature {value} is outside 0.0..=2.0"))
    }
}

fn check_top_p(value: f64) -> Result<(), String> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("top_p {value} is outside 0.0..=1.0"))
    }
}
