use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

use crate::error::{ProfileError, ProfileResult};

/// The closed set of run profile kinds, in drop-down order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// Runs tests with the runner executable found on `PATH`.
    Pybot,
    /// Runs tests with a user-supplied script.
    CustomScript,
}

impl ProfileKind {
    pub const ALL: [Self; 2] = [Self::Pybot, Self::CustomScript];

    /// Display name; also the prefix of every persisted settings key.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Pybot => "pybot",
            Self::CustomScript => "custom script",
        }
    }

    /// Accepts the display name as well as `_` and `-` separated spellings.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        Self::ALL.into_iter().find(|kind| kind.name() == normalized)
    }

    /// Names of the settings this kind understands.
    #[must_use]
    pub fn setting_names(self) -> &'static [&'static str] {
        const RUNNER: &[&str] = &[
            "arguments",
            "include_tags",
            "exclude_tags",
            "apply_include_tags",
            "apply_exclude_tags",
        ];
        const SCRIPT: &[&str] = &[
            "arguments",
            "include_tags",
            "exclude_tags",
            "apply_include_tags",
            "apply_exclude_tags",
            "runner_script",
        ];
        match self {
            Self::Pybot => RUNNER,
            Self::CustomScript => SCRIPT,
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed settings of a run profile. Every field has a default so a profile
/// can be built before anything was ever saved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    /// Space separated extra arguments for the runner.
    pub arguments: String,
    /// Comma separated tags passed as `--include`.
    pub include_tags: String,
    /// Comma separated tags passed as `--exclude`.
    pub exclude_tags: String,
    pub apply_include_tags: bool,
    pub apply_exclude_tags: bool,
    /// Script executed by the custom script profile.
    pub runner_script: String,
}

/// A single settings update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Setting {
    Arguments(String),
    IncludeTags(String),
    ExcludeTags(String),
    ApplyIncludeTags(bool),
    ApplyExcludeTags(bool),
    RunnerScript(String),
}

impl Setting {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Arguments(_) => "arguments",
            Self::IncludeTags(_) => "include_tags",
            Self::ExcludeTags(_) => "exclude_tags",
            Self::ApplyIncludeTags(_) => "apply_include_tags",
            Self::ApplyExcludeTags(_) => "apply_exclude_tags",
            Self::RunnerScript(_) => "runner_script",
        }
    }

    #[must_use]
    pub fn value(&self) -> Value {
        match self {
            Self::Arguments(text)
            | Self::IncludeTags(text)
            | Self::ExcludeTags(text)
            | Self::RunnerScript(text) => Value::String(text.clone()),
            Self::ApplyIncludeTags(flag) | Self::ApplyExcludeTags(flag) => Value::Bool(*flag),
        }
    }

    /// Builds a setting from its name and textual value, as typed on a
    /// command line.
    pub fn parse(name: &str, raw: &str) -> ProfileResult<Self> {
        match name {
            "arguments" => Ok(Self::Arguments(raw.to_string())),
            "include_tags" => Ok(Self::IncludeTags(raw.to_string())),
            "exclude_tags" => Ok(Self::ExcludeTags(raw.to_string())),
            "runner_script" => Ok(Self::RunnerScript(raw.to_string())),
            "apply_include_tags" => parse_flag(name, raw).map(Self::ApplyIncludeTags),
            "apply_exclude_tags" => parse_flag(name, raw).map(Self::ApplyExcludeTags),
            other => Err(ProfileError::unsupported_setting(
                "unknown setting",
                serde_json::json!({
                    "setting": other,
                    "known": ProfileKind::CustomScript.setting_names(),
                }),
            )),
        }
    }
}

fn parse_flag(name: &str, raw: &str) -> ProfileResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ProfileError::unsupported_setting(
            "boolean setting expects true or false",
            serde_json::json!({"setting": name, "value": raw}),
        )),
    }
}

/// Command derived from a profile, ready to hand to a process launcher.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunCommand {
    pub profile: String,
    pub command: Vec<String>,
    pub cwd: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip_through_alternate_spellings() {
        assert_eq!(
            ProfileKind::from_name("custom-script"),
            Some(ProfileKind::CustomScript)
        );
        assert_eq!(
            ProfileKind::from_name("Custom_Script"),
            Some(ProfileKind::CustomScript)
        );
        assert_eq!(ProfileKind::from_name("pybot"), Some(ProfileKind::Pybot));
        assert_eq!(ProfileKind::from_name("jybot"), None);
    }

    #[test]
    fn boolean_settings_accept_common_spellings() {
        assert_eq!(
            Setting::parse("apply_include_tags", "yes").ok(),
            Some(Setting::ApplyIncludeTags(true))
        );
        assert_eq!(
            Setting::parse("apply_exclude_tags", "0").ok(),
            Some(Setting::ApplyExcludeTags(false))
        );
        assert!(Setting::parse("apply_exclude_tags", "maybe").is_err());
        assert!(Setting::parse("colour", "red").is_err());
    }
}
