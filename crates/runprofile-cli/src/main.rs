//! runprofile CLI: build runner commands and resolve keyword specs.
//!
//! Command-line access to run profiles, argument validation, failure
//! classification, and library spec resolution.

// CLI-specific lint allowances (CLI binary, not library)
#![allow(missing_docs)]
#![allow(clippy::print_stdout)] // CLI must print to stdout
#![allow(clippy::print_stderr)] // CLI must print to stderr
#![allow(clippy::exit)] // CLI uses exit codes

use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use miette::{IntoDiagnostic, Result};
use runprofile::model::{ProfileKind, Setting};
use runprofile::profile::RunProfile;
use runprofile::settings::JsonSettingsStore;
use runprofile::spec::{load_resolver_config, ResolverConfig, SpecResolver};
use runprofile::ProfileError;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Settings file used when `--settings` is not given.
const DEFAULT_SETTINGS_FILE: &str = "runprofile-settings.json";

/// Color output mode
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and `NO_COLOR` env
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Parser)]
#[command(
    name = "runprofile",
    version,
    about = "Build Robot Framework run commands and resolve keyword specs"
)]
struct Cli {
    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,

    /// Profile settings file
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the command a profile would run
    Show {
        #[arg(long, default_value = "pybot")]
        profile: String,
        #[arg(long)]
        json: bool,
    },
    /// List the available profiles and their settings
    Profiles {
        #[arg(long)]
        json: bool,
    },
    /// Change a profile setting
    Set {
        #[arg(long, default_value = "pybot")]
        profile: String,
        #[arg(help = "Setting name, e.g. arguments or apply_include_tags")]
        setting: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Check runner arguments (defaults to the saved arguments)
    Validate {
        #[arg(long, default_value = "pybot")]
        profile: String,
        #[arg(long)]
        json: bool,
        #[arg(last = true)]
        arguments: Vec<String>,
    },
    /// Explain a failed run from its error output and return code
    Classify {
        #[arg(long, default_value = "pybot")]
        profile: String,
        #[arg(long, allow_hyphen_values = true)]
        return_code: i32,
        #[arg(long, default_value = "")]
        error: String,
        #[arg(long)]
        json: bool,
    },
    /// Locate and parse the keyword spec of a library
    Resolve {
        library: String,
        #[arg(long, help = "Resolver config file (JSON or YAML)")]
        config: Option<PathBuf>,
        #[arg(long = "dir", help = "Spec directory searched before the default one")]
        directories: Vec<PathBuf>,
        #[arg(long, help = "Override the default spec directory")]
        default_dir: Option<PathBuf>,
        #[arg(long, help = "Add a pythonpath entry")]
        pythonpath: Vec<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        #[arg(value_enum, help = "Shell to generate completions for")]
        shell: Shell,
    },
}

/// Whether stderr output should be colored.
fn use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable
            if std::env::var("NO_COLOR").is_ok() {
                false
            } else {
                supports_color::on(supports_color::Stream::Stderr).is_some()
            }
        }
    }
}

/// Configure miette's graphical reporting based on color mode
fn configure_colors(color: bool) {
    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .color(color)
                .unicode(color)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set
}

fn init_tracing(verbose: u8, color: bool) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(color)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let color = use_color(cli.color);
    configure_colors(color);
    init_tracing(cli.verbose, color);
    match cli.command {
        Commands::Show { profile, json } => cmd_show(&cli.settings, &profile, json),
        Commands::Profiles { json } => cmd_profiles(&cli.settings, json),
        Commands::Set {
            profile,
            setting,
            value,
        } => cmd_set(&cli.settings, &profile, &setting, &value),
        Commands::Validate {
            profile,
            json,
            arguments,
        } => cmd_validate(&cli.settings, &profile, json, &arguments),
        Commands::Classify {
            profile,
            return_code,
            error,
            json,
        } => cmd_classify(&cli.settings, &profile, return_code, &error, json),
        Commands::Resolve {
            library,
            config,
            directories,
            default_dir,
            pythonpath,
            json,
        } => cmd_resolve(
            &library,
            config,
            &directories,
            default_dir,
            pythonpath,
            json,
        ),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}

// =============================================================================
// Command Handlers
// =============================================================================

/// Handle the show command.
fn cmd_show(settings: &Path, profile: &str, json: bool) -> Result<()> {
    let profile = match load_profile(settings, profile) {
        Ok(profile) => profile,
        Err(err) => return emit_error(json, &err),
    };
    let run = profile.run_command();
    if json {
        let payload = serde_json::to_string(&run).into_diagnostic()?;
        println!("{payload}");
    } else {
        println!("{}", run.command.join(" "));
        if let Some(cwd) = run.cwd {
            println!("cwd: {}", cwd.display());
        }
    }
    Ok(())
}

/// Handle the profiles command.
fn cmd_profiles(settings: &Path, json: bool) -> Result<()> {
    let store = match open_store(settings) {
        Ok(store) => store,
        Err(err) => return emit_error(json, &err),
    };
    let profiles = runprofile::all_profiles(&store);
    if json {
        let payload: Vec<_> = profiles
            .iter()
            .map(|profile| {
                serde_json::json!({
                    "name": profile.name(),
                    "settings": profile.settings(),
                    "command": profile.run_command().command,
                })
            })
            .collect();
        let payload = serde_json::to_string(&payload).into_diagnostic()?;
        println!("{payload}");
    } else {
        for profile in &profiles {
            println!("{}: {}", profile.name(), profile.run_command().command.join(" "));
        }
    }
    Ok(())
}

/// Handle the set command.
fn cmd_set(settings: &Path, profile: &str, name: &str, value: &str) -> Result<()> {
    let kind = match parse_kind(profile) {
        Ok(kind) => kind,
        Err(err) => return emit_error(false, &err),
    };
    let mut store = match open_store(settings) {
        Ok(store) => store,
        Err(err) => return emit_error(false, &err),
    };
    let mut run_profile = RunProfile::load(kind, &store);
    let applied = Setting::parse(name, value)
        .and_then(|setting| run_profile.set_setting(setting, &mut store))
        .and_then(|()| store.flush());
    if let Err(err) = applied {
        return emit_error(false, &err);
    }
    // Invalid arguments are still saved; the warning is advisory.
    if name == "arguments" {
        if let Some(message) = run_profile.validate_arguments(value) {
            eprintln!("warning: {message}");
        }
    }
    Ok(())
}

/// Handle the validate command.
fn cmd_validate(settings: &Path, profile: &str, json: bool, arguments: &[String]) -> Result<()> {
    let profile = match load_profile(settings, profile) {
        Ok(profile) => profile,
        Err(err) => return emit_error(json, &err),
    };
    let text = if arguments.is_empty() {
        profile.settings().arguments.clone()
    } else {
        arguments.join(" ")
    };
    let message = profile.validate_arguments(&text);
    if json {
        let payload = serde_json::to_string(&serde_json::json!({
            "valid": message.is_none(),
            "message": message,
        }))
        .into_diagnostic()?;
        println!("{payload}");
    } else if let Some(message) = message.as_deref() {
        eprintln!("invalid: {message}");
    } else {
        println!("valid");
    }
    if message.is_some() {
        std::process::exit(1);
    }
    Ok(())
}

/// Handle the classify command.
fn cmd_classify(
    settings: &Path,
    profile: &str,
    return_code: i32,
    error: &str,
    json: bool,
) -> Result<()> {
    let profile = match load_profile(settings, profile) {
        Ok(profile) => profile,
        Err(err) => return emit_error(json, &err),
    };
    let diagnostic = profile.classify_failure(error, return_code);
    if json {
        let payload = serde_json::to_string(&diagnostic).into_diagnostic()?;
        println!("{payload}");
    } else if let Some(diagnostic) = diagnostic {
        println!("{}", diagnostic.message);
    } else {
        println!("no diagnostic");
    }
    Ok(())
}

/// Handle the resolve command.
fn cmd_resolve(
    library: &str,
    config: Option<PathBuf>,
    directories: &[PathBuf],
    default_dir: Option<PathBuf>,
    pythonpath: Vec<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut config = match config {
        Some(path) => match load_resolver_config(&path) {
            Ok(config) => config,
            Err(err) => return emit_error(json, &err),
        },
        None => ResolverConfig::default(),
    };
    if let Some(dir) = default_dir {
        config.default_directory = dir;
    }
    config.pythonpath.extend(pythonpath);
    let mut search: Vec<PathBuf> = config.directories.clone();
    search.extend_from_slice(directories);

    let resolver = SpecResolver::from_config(&config);
    let Some(discovery) = resolver.discover(library, &search) else {
        let err = ProfileError::not_found(
            "library spec not found",
            serde_json::json!({
                "library": library,
                "searched": resolver.discovery_chain(&search),
            }),
        );
        return emit_error(json, &err);
    };
    let spec = resolver.resolve(library, &search);
    if json {
        let payload = serde_json::to_string(&serde_json::json!({
            "discovery": discovery,
            "spec": spec,
        }))
        .into_diagnostic()?;
        println!("{payload}");
    } else {
        println!("found via {}: {}", discovery.step, discovery.source);
        match spec {
            Some(spec) => {
                for keyword in &spec.keywords {
                    println!("{} {}", keyword.name, keyword.args_repr());
                }
            }
            None => eprintln!("warning: spec source could not be parsed"),
        }
    }
    Ok(())
}

/// Handle the completions command.
fn cmd_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_kind(name: &str) -> Result<ProfileKind, ProfileError> {
    ProfileKind::from_name(name).ok_or_else(|| {
        ProfileError::cli_invalid_arg(format!(
            "unknown profile '{name}' (expected one of: pybot, custom script)"
        ))
    })
}

fn open_store(path: &Path) -> Result<JsonSettingsStore, ProfileError> {
    JsonSettingsStore::open(path)
}

fn load_profile(settings: &Path, name: &str) -> Result<RunProfile, ProfileError> {
    let kind = parse_kind(name)?;
    let store = open_store(settings)?;
    Ok(RunProfile::load(kind, &store))
}

fn emit_error(json: bool, err: &ProfileError) -> Result<()> {
    if json {
        let payload = serde_json::to_string(&err.to_error_info()).into_diagnostic()?;
        println!("{payload}");
    } else {
        eprintln!("error: {err}");
        if let Some(context) = err.context.as_ref() {
            eprintln!("{context}");
        }
    }
    std::process::exit(err.exit_code());
}
