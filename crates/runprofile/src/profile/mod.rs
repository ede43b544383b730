//! Run profiles: how a test run is invoked and how its failures are read.

pub mod tags;

pub use tags::normalize_tags;

use crate::arguments::{invalid_message, ArgumentParser};
use crate::error::{ProfileError, ProfileResult};
use crate::model::{LogMessage, ProfileKind, ProfileSettings, RunCommand, Setting};
use crate::settings::SettingsStore;
use std::path::PathBuf;
use tracing::debug;

/// Return code used by POSIX shells when a command is not found.
pub const COMMAND_NOT_FOUND_CODE: i32 = 127;

/// Shell error text for a missing command (bash, zsh).
pub const NOT_FOUND_PHRASE: &str = "not found";

/// Windows error text for a missing executable.
pub const WINDOWS_NOT_FOUND_PHRASE: &str = "system cannot find the file specified";

/// Runner executable used by the default profile.
#[must_use]
pub fn default_runner() -> &'static str {
    if cfg!(windows) {
        "pybot.bat"
    } else {
        "pybot"
    }
}

#[derive(Clone, Debug)]
pub struct RunProfile {
    kind: ProfileKind,
    settings: ProfileSettings,
    parser: ArgumentParser,
}

impl RunProfile {
    /// Profile with default settings.
    #[must_use]
    pub fn new(kind: ProfileKind) -> Self {
        Self::with_settings(kind, ProfileSettings::default())
    }

    #[must_use]
    pub fn with_settings(kind: ProfileKind, settings: ProfileSettings) -> Self {
        Self {
            kind,
            settings,
            parser: ArgumentParser::default(),
        }
    }

    /// Builds a profile from persisted settings. Missing or mistyped values
    /// fall back to the defaults.
    pub fn load(kind: ProfileKind, store: &impl SettingsStore) -> Self {
        let text = |name: &str, default: &str| -> String {
            match store.get(&profile_key(kind, name)) {
                Some(serde_json::Value::String(value)) => value,
                Some(other) => {
                    debug!(profile = kind.name(), setting = name, value = %other, "ignoring mistyped setting");
                    default.to_string()
                }
                None => default.to_string(),
            }
        };
        let flag = |name: &str, default: bool| -> bool {
            store
                .get(&profile_key(kind, name))
                .and_then(|value| value.as_bool())
                .unwrap_or(default)
        };
        let defaults = ProfileSettings::default();
        let settings = ProfileSettings {
            arguments: text("arguments", &defaults.arguments),
            include_tags: text("include_tags", &defaults.include_tags),
            exclude_tags: text("exclude_tags", &defaults.exclude_tags),
            apply_include_tags: flag("apply_include_tags", defaults.apply_include_tags),
            apply_exclude_tags: flag("apply_exclude_tags", defaults.apply_exclude_tags),
            runner_script: match kind {
                ProfileKind::CustomScript => text("runner_script", &defaults.runner_script),
                ProfileKind::Pybot => defaults.runner_script.clone(),
            },
        };
        Self::with_settings(kind, settings)
    }

    #[must_use]
    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    #[must_use]
    pub fn settings(&self) -> &ProfileSettings {
        &self.settings
    }

    /// Persisted key of `setting`: the profile name with spaces replaced by
    /// underscores, an underscore, then the setting name.
    #[must_use]
    pub fn settings_key(&self, setting: &str) -> String {
        profile_key(self.kind, setting)
    }

    /// The executable to launch. Not checked for existence.
    #[must_use]
    pub fn command(&self) -> String {
        match self.kind {
            ProfileKind::Pybot => default_runner().to_string(),
            ProfileKind::CustomScript => self.settings.runner_script.clone(),
        }
    }

    /// Executable followed by the user's free-text arguments.
    #[must_use]
    pub fn command_prefix(&self) -> Vec<String> {
        let mut prefix = vec![self.command()];
        prefix.extend(self.settings.arguments.split_whitespace().map(str::to_string));
        prefix
    }

    /// `--include`/`--exclude` arguments derived from the tag settings.
    #[must_use]
    pub fn custom_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.settings.apply_include_tags && !self.settings.include_tags.is_empty() {
            args.extend(
                normalize_tags(&self.settings.include_tags)
                    .into_iter()
                    .map(|tag| format!("--include={tag}")),
            );
        }
        if self.settings.apply_exclude_tags && !self.settings.exclude_tags.is_empty() {
            args.extend(
                normalize_tags(&self.settings.exclude_tags)
                    .into_iter()
                    .map(|tag| format!("--exclude={tag}")),
            );
        }
        args
    }

    /// Working directory for the run. The custom script runs from its own
    /// directory; the default runner inherits the caller's.
    #[must_use]
    pub fn cwd(&self) -> Option<PathBuf> {
        match self.kind {
            ProfileKind::Pybot => None,
            ProfileKind::CustomScript => std::path::Path::new(&self.settings.runner_script)
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(std::path::Path::to_path_buf),
        }
    }

    /// Full command with tag arguments and working directory.
    #[must_use]
    pub fn run_command(&self) -> RunCommand {
        let mut command = self.command_prefix();
        command.extend(self.custom_args());
        debug!(profile = self.name(), ?command, "derived run command");
        RunCommand {
            profile: self.name().to_string(),
            command,
            cwd: self.cwd(),
        }
    }

    /// Checks free-text arguments against the runner's options. Custom
    /// scripts accept anything.
    #[must_use]
    pub fn validate_arguments(&self, text: &str) -> Option<String> {
        match self.kind {
            ProfileKind::Pybot => invalid_message(&self.parser, text),
            ProfileKind::CustomScript => None,
        }
    }

    /// Maps a failed run to a user-facing message, if it is recognised.
    #[must_use]
    pub fn classify_failure(&self, error: &str, return_code: i32) -> Option<LogMessage> {
        match self.kind {
            ProfileKind::Pybot => {
                let missing = return_code == COMMAND_NOT_FOUND_CODE
                    || error.contains(NOT_FOUND_PHRASE)
                    || error.contains(WINDOWS_NOT_FOUND_PHRASE);
                missing.then(LogMessage::runner_not_installed)
            }
            ProfileKind::CustomScript => None,
        }
    }

    /// Passes `error` through unchanged together with its classification.
    #[must_use]
    pub fn format_error(&self, error: &str, return_code: i32) -> (String, Option<LogMessage>) {
        (error.to_string(), self.classify_failure(error, return_code))
    }

    /// Applies `setting` and schedules it for saving.
    pub fn set_setting(
        &mut self,
        setting: Setting,
        store: &mut impl SettingsStore,
    ) -> ProfileResult<()> {
        let key = self.settings_key(setting.name());
        let value = setting.value();
        match setting {
            Setting::Arguments(text) => self.settings.arguments = text,
            Setting::IncludeTags(text) => self.settings.include_tags = text,
            Setting::ExcludeTags(text) => self.settings.exclude_tags = text,
            Setting::ApplyIncludeTags(flag) => self.settings.apply_include_tags = flag,
            Setting::ApplyExcludeTags(flag) => self.settings.apply_exclude_tags = flag,
            Setting::RunnerScript(path) => {
                if self.kind != ProfileKind::CustomScript {
                    return Err(ProfileError::unsupported_setting(
                        "setting is not available for this profile",
                        serde_json::json!({
                            "profile": self.name(),
                            "setting": "runner_script",
                            "known": self.kind.setting_names(),
                        }),
                    ));
                }
                self.settings.runner_script = path;
            }
        }
        store.save(&key, value);
        Ok(())
    }
}

fn profile_key(kind: ProfileKind, setting: &str) -> String {
    format!("{}_{}", kind.name().replace(' ', "_"), setting)
}

/// One profile per kind, in drop-down order.
pub fn all_profiles(store: &impl SettingsStore) -> Vec<RunProfile> {
    ProfileKind::ALL
        .into_iter()
        .map(|kind| RunProfile::load(kind, store))
        .collect()
}
