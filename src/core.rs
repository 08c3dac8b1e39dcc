use clap::{CommandFactory, Parser};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::{create_app, find_app_root, AppRegistry, YamlRegistry};
use crate::cli::{Args, Command, LogFormat, Shell};
use crate::client::{ReqwestTransport, Transport};
use crate::config::{ConfigResolver, Mapping, Settings, APP_MARKER};
use crate::context::Environment;
use crate::devexp::{format_curl_pretty, render};
use crate::errors::{RecurlError, Result};
use crate::output::{self, DisplayMode};
use crate::plugins::{self, HookPipeline};
use crate::request::{build_from_merged, RequestDescriptor};
use crate::status::ExitStatus;

/// Filter directives are read from this variable
pub const LOG_ENV_VAR: &str = "RECURL_LOG";

/// Outcome of one resolution: the hooked merged view and the final request
#[derive(Debug, Clone)]
pub struct Prepared {
    pub merged: Mapping,
    pub request: RequestDescriptor,
}

/// Main entry point for the CLI.
///
/// Parses arguments, sets up logging and dispatches to the endpoint runner
/// or one of the app management subcommands.
pub fn run(args: Vec<String>, mut env: Environment) -> ExitStatus {
    if let Some(name) = args.first() {
        if let Some(basename) = Path::new(name).file_stem() {
            env.program_name = basename.to_string_lossy().to_string();
        }
    }

    let parsed = match Args::try_parse_from(&args) {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            return if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                ExitStatus::Success
            } else {
                ExitStatus::Error
            };
        }
    };

    init_logging(parsed.verbose, parsed.log_format.unwrap_or_default(), env.stderr_isatty);

    let verbose = parsed.verbose;
    match program(parsed, &env) {
        Ok(status) => status,
        Err(e) => handle_error(e, verbose),
    }
}

pub fn program(args: Args, env: &Environment) -> Result<ExitStatus> {
    let settings = Settings::from_env();
    debug!(home = %settings.home().display(), "Settings loaded");

    match &args.command {
        Some(Command::Init { name, path }) => return init_app(name, &env.cwd.join(path), &settings),
        Some(Command::ListLocal) => return list_apps(&settings),
        Some(Command::Complete { shell }) => {
            generate_completions(shell, &env.program_name);
            return Ok(ExitStatus::Success);
        }
        None => {}
    }

    let endpoint = match &args.endpoint {
        Some(endpoint) => endpoint,
        None => {
            Args::command().print_help()?;
            return Ok(ExitStatus::Success);
        }
    };

    run_endpoint(endpoint, &args, env, &settings)
}

fn run_endpoint(endpoint: &str, args: &Args, env: &Environment, settings: &Settings) -> Result<ExitStatus> {
    let app_root = locate_app(args.app.as_deref(), &env.cwd, settings)?;
    let resolver = ConfigResolver::new(args.env.as_deref(), &app_root, settings);
    let hooks = plugins::discover(&app_root);

    let prepared = prepare(&resolver, endpoint, &hooks)?;

    let mut stdout = io::stdout().lock();

    if args.dry_run || args.curlify {
        let curl = render(&prepared.request);
        if env.colors {
            writeln!(stdout, "{}", format_curl_pretty(&curl))?;
        } else {
            writeln!(stdout, "{}", curl)?;
        }
        if args.dry_run {
            return Ok(ExitStatus::Success);
        }
        writeln!(stdout)?;
    }

    let transport = ReqwestTransport::from_config(&prepared.merged)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let response = runtime.block_on(transport.send(&prepared.request))?;

    let mode = DisplayMode::from_flags(args.quiet, args.only_status);
    output::write_response(&mut stdout, &response, mode, args.output.as_deref(), env.colors)?;
    stdout.flush()?;

    Ok(ExitStatus::Success)
}

/// Resolve an endpoint, run the hooks and build its request.
///
/// The `after_config` hooks see the merged view; the request is built from
/// their result, then handed to the `after_prepare` hooks.
pub fn prepare(resolver: &ConfigResolver, endpoint: &str, hooks: &HookPipeline) -> Result<Prepared> {
    info!(endpoint, env = resolver.env(), app_root = %resolver.app_root().display(), "Resolving endpoint");

    let resolved = resolver.resolve_endpoint(endpoint)?;
    let merged = hooks.apply_config(resolved.merged().clone())?;
    let request = build_from_merged(&merged)?;
    let request = hooks.apply_request(request)?;

    debug!(method = request.method(), url = request.url(), "Request prepared");
    Ok(Prepared { merged, request })
}

/// Registered app by name, or the nearest app root above `cwd`
pub fn locate_app(app: Option<&str>, cwd: &Path, settings: &Settings) -> Result<PathBuf> {
    match app {
        Some(name) => YamlRegistry::new(settings.registry_file())
            .lookup(name)?
            .ok_or_else(|| RecurlError::AppNotRegistered(name.to_string())),
        None => find_app_root(cwd).ok_or_else(|| RecurlError::AppRootNotFound {
            marker: APP_MARKER,
            start: cwd.to_path_buf(),
        }),
    }
}

fn init_app(name: &str, parent: &Path, settings: &Settings) -> Result<ExitStatus> {
    let mut registry = YamlRegistry::new(settings.registry_file());
    let app_dir = create_app(name, parent, &mut registry)?;
    println!("Initialised recurl app in {}", app_dir.display());
    Ok(ExitStatus::Success)
}

fn list_apps(settings: &Settings) -> Result<ExitStatus> {
    let registry = YamlRegistry::new(settings.registry_file());
    println!("{}", output::format_apps(&registry.list()?));
    Ok(ExitStatus::Success)
}

fn generate_completions(shell: &Shell, bin_name: &str) {
    use clap_complete::{generate, Shell as ClapShell};

    let mut cmd = Args::command();
    let shell = match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::PowerShell => ClapShell::PowerShell,
        Shell::Elvish => ClapShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

/// Install the stderr subscriber; a second call is a no-op
fn init_logging(verbose: bool, format: LogFormat, ansi: bool) {
    let filter = if verbose {
        EnvFilter::new("recurl=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let json = format == LogFormat::Json;
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(io::stderr).with_ansi(ansi)))
        .try_init();
}

fn handle_error(error: RecurlError, verbose: bool) -> ExitStatus {
    if verbose {
        eprintln!("Error: {:?}", error);
    } else {
        eprintln!("Error: {}", error);
    }

    // All errors return the same exit code (1) following Unix conventions
    ExitStatus::Error
}
