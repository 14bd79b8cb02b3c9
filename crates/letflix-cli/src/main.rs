//! letflix - movie catalog client CLI.
#![allow(clippy::future_not_send)]

/// Application configuration (TOML).
mod config;
/// Dialog hosting a form.
mod dialog;
/// Login and registration forms.
mod forms;
/// Transient notifications.
mod notify;
/// Prompts for missing form fields.
mod prompt;
/// Path-to-view routing.
mod router;
/// File-backed session storage.
mod session;

use std::io::{self, Stderr, StdinLock};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path, resolve_session_path};
use crate::dialog::{Dialog, TerminalDialog};
use crate::forms::{LoginForm, RegistrationForm};
use crate::notify::LogNotifier;
use crate::prompt::Prompter;
use crate::router::{View, resolve};
use crate::session::SessionStore;
use letflix_api::{
    Credentials, FavoriteEntry, LocalMovieApi, Movie, MovieClient, Registration, TokenStore,
    User, UserUpdate,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/session directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Override the backend base URL from config.toml.
    #[arg(long, global = true, env = "LETFLIX_API_URL")]
    api_url: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Open a view by path ("/login", "/register"); unknown paths show the login form.
    Open(OpenArgs),
    /// Create a new account.
    Register(FormFields),
    /// Sign in and store the session token.
    Login(LoginArgs),
    /// Forget the stored session.
    Logout,
    /// Browse movies.
    Movies(MoviesCommand),
    /// Look up directors.
    Directors(DirectorsCommand),
    /// Look up genres.
    Genres(GenresCommand),
    /// Manage user accounts and favorites.
    Users(UsersCommand),
    /// Manage config.toml.
    Config(ConfigCommand),
    /// Print shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `open` subcommand.
#[derive(clap::Args)]
struct OpenArgs {
    /// Path to open (default: "").
    path: Option<String>,

    /// Pre-filled form fields; missing ones are prompted for.
    #[command(flatten)]
    fields: FormFields,
}

/// Form fields; any left out are read from stdin.
#[derive(clap::Args, Default)]
struct FormFields {
    /// Username.
    #[arg(long)]
    username: Option<String>,
    /// Password.
    #[arg(long)]
    password: Option<String>,
    /// Email address (registration only).
    #[arg(long)]
    email: Option<String>,
    /// Birthday, e.g. "1990-04-12" (registration only).
    #[arg(long)]
    birthday: Option<String>,
}

/// Arguments for the `login` subcommand.
#[derive(clap::Args)]
struct LoginArgs {
    /// Username.
    #[arg(long)]
    username: Option<String>,
    /// Password.
    #[arg(long)]
    password: Option<String>,
}

/// Arguments for the `movies` subcommand.
#[derive(clap::Args)]
struct MoviesCommand {
    /// Movies subcommand to run.
    #[command(subcommand)]
    command: MoviesSubcommands,
}

/// Available movies subcommands.
#[derive(Subcommand)]
enum MoviesSubcommands {
    /// List all movies (requires login).
    List,
    /// Show one movie by title.
    Get(TitleArgs),
}

/// Arguments for the `movies get` subcommand.
#[derive(clap::Args)]
struct TitleArgs {
    /// Movie title (e.g. "Léon: The Professional").
    #[arg(long, required = true)]
    title: String,
}

/// Arguments for the `directors` subcommand.
#[derive(clap::Args)]
struct DirectorsCommand {
    /// Directors subcommand to run.
    #[command(subcommand)]
    command: NameSubcommands,
}

/// Arguments for the `genres` subcommand.
#[derive(clap::Args)]
struct GenresCommand {
    /// Genres subcommand to run.
    #[command(subcommand)]
    command: NameSubcommands,
}

/// Lookup-by-name subcommands.
#[derive(Subcommand)]
enum NameSubcommands {
    /// Show one entry by name.
    Get(NameArgs),
}

/// Arguments for a lookup by name.
#[derive(clap::Args)]
struct NameArgs {
    /// Name to look up.
    #[arg(long, required = true)]
    name: String,
}

/// Arguments for the `users` subcommand.
#[derive(clap::Args)]
struct UsersCommand {
    /// Users subcommand to run.
    #[command(subcommand)]
    command: UsersSubcommands,
}

/// Available users subcommands.
#[derive(Subcommand)]
enum UsersSubcommands {
    /// Show a user's profile (requires login).
    Get(UsernameArgs),
    /// List a user's favorite movies.
    Favorites(UsernameArgs),
    /// Add a movie to a user's favorites (requires login).
    AddFavorite(FavoriteArgs),
    /// Remove a movie from a user's favorites (requires login).
    RemoveFavorite(FavoriteArgs),
    /// Update account details (requires login).
    Update(UpdateArgs),
    /// Delete an account (requires login).
    Delete(UserIdArgs),
}

/// Arguments naming a user; defaults to the logged-in user.
#[derive(clap::Args)]
struct UsernameArgs {
    /// Username (default: the logged-in user).
    #[arg(long)]
    username: Option<String>,
}

/// Arguments for `users add-favorite` / `users remove-favorite`.
#[derive(clap::Args)]
struct FavoriteArgs {
    /// Movie ID (e.g. "507f1f77bcf86cd799439011").
    #[arg(long, required = true)]
    movie_id: String,
    /// Username (default: the logged-in user).
    #[arg(long)]
    username: Option<String>,
}

/// Arguments for `users update`.
#[derive(clap::Args)]
struct UpdateArgs {
    /// User ID.
    #[arg(long, required = true)]
    id: String,
    /// New field values.
    #[command(flatten)]
    fields: FormFields,
}

/// Arguments for `users delete`.
#[derive(clap::Args)]
struct UserIdArgs {
    /// User ID.
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a default config.toml if none exists.
    Init,
    /// Show the effective configuration.
    Show,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: Shell,
}

/// Stdin prompter used by the form subcommands.
type StdPrompter = Prompter<StdinLock<'static>, Stderr>;

/// Shared state for a CLI invocation.
struct AppContext {
    /// Effective configuration.
    config: AppConfig,
    /// Path of config.toml.
    config_path: PathBuf,
    /// Session file, also the client's token store.
    session: Arc<SessionStore>,
}

impl AppContext {
    /// Loads config and locates the session file.
    ///
    /// # Errors
    ///
    /// Returns an error if a path cannot be resolved or config.toml is invalid.
    fn load(dir: Option<&PathBuf>, api_url: Option<String>) -> Result<Self> {
        let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
        let mut config = AppConfig::load(&config_path).context("failed to load config")?;
        if let Some(url) = api_url {
            config.api.base_url = url;
        }
        let session_path = resolve_session_path(dir).context("failed to resolve session path")?;

        Ok(Self {
            config,
            config_path,
            session: Arc::new(SessionStore::new(session_path)),
        })
    }

    /// Builds a `MovieClient` reading its token from the session file.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client fails to build.
    #[instrument(skip_all)]
    fn client(&self) -> Result<MovieClient> {
        let base_url = Url::parse(&self.config.api.base_url)
            .with_context(|| format!("invalid base URL: {}", self.config.api.base_url))?;
        MovieClient::builder()
            .base_url(base_url)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .token_store(Arc::clone(&self.session) as Arc<dyn TokenStore>)
            .timeout(self.config.timeout())
            .build()
            .context("failed to build letflix API client")
    }

    /// Notifier honouring the configured display time.
    const fn notifier(&self) -> LogNotifier {
        LogNotifier::new(self.config.notification_duration())
    }

    /// Resolves the username from the argument or the active session.
    ///
    /// # Errors
    ///
    /// Returns an error if neither is available.
    fn username(&self, explicit: Option<String>) -> Result<String> {
        explicit
            .or_else(|| self.session.username())
            .context("no --username given and no active session; run `letflix login` first")
    }
}

/// Creates a prompter on stdin/stderr.
fn std_prompter() -> StdPrompter {
    Prompter::new(io::stdin().lock(), io::stderr())
}

/// Runs the `open` subcommand.
///
/// # Errors
///
/// Returns an error if the resolved form is not completed successfully.
#[instrument(skip_all)]
async fn run_open(args: OpenArgs, ctx: &AppContext) -> Result<()> {
    let requested = args.path.unwrap_or_default();
    let resolution = resolve(&requested);
    if let Some(from) = &resolution.redirected_from {
        tracing::info!("Redirecting {from:?} to {}", resolution.view.path());
    }

    let mut prompter = std_prompter();
    match resolution.view {
        View::Login => {
            let fields = LoginArgs {
                username: args.fields.username,
                password: args.fields.password,
            };
            run_login_form(fields, ctx, &mut prompter).await
        }
        View::Registration => run_registration_form(args.fields, ctx, &mut prompter).await,
    }
}

/// Shows the login form and submits it.
///
/// # Errors
///
/// Returns an error if prompting fails or the login does not succeed.
#[instrument(skip_all)]
async fn run_login_form(
    fields: LoginArgs,
    ctx: &AppContext,
    prompter: &mut StdPrompter,
) -> Result<()> {
    let client = ctx.client()?;
    let notifier = ctx.notifier();
    let mut dialog = TerminalDialog::open(View::Login.to_string());

    let form = LoginForm::new(Credentials {
        username: prompter.value_or_prompt(fields.username, "Username")?,
        password: prompter.value_or_prompt(fields.password, "Password")?,
    });

    let outcome = form
        .submit(&client, ctx.session.as_ref(), &notifier, &mut dialog)
        .await;
    if dialog.is_open() {
        tracing::debug!("Login dialog left open");
    }
    outcome.ensure_succeeded("Login")
}

/// Shows the registration form and submits it.
///
/// # Errors
///
/// Returns an error if prompting fails or the registration does not succeed.
#[instrument(skip_all)]
async fn run_registration_form(
    fields: FormFields,
    ctx: &AppContext,
    prompter: &mut StdPrompter,
) -> Result<()> {
    let client = ctx.client()?;
    let notifier = ctx.notifier();
    let mut dialog = TerminalDialog::open(View::Registration.to_string());

    let form = RegistrationForm::new(Registration {
        username: prompter.value_or_prompt(fields.username, "Username")?,
        password: prompter.value_or_prompt(fields.password, "Password")?,
        email: prompter.value_or_prompt(fields.email, "Email")?,
        birthday: prompter.value_or_prompt(fields.birthday, "Birthday")?,
    });

    let outcome = form.submit(&client, &notifier, &mut dialog).await;
    if dialog.is_open() {
        tracing::debug!("Registration dialog left open");
    }
    outcome.ensure_succeeded("Registration")
}

/// Runs the `logout` subcommand.
///
/// # Errors
///
/// Returns an error if the session file cannot be removed.
fn run_logout(ctx: &AppContext) -> Result<()> {
    if ctx.session.sign_out()? {
        tracing::info!("Logged out; removed {}", ctx.session.path().display());
    } else {
        tracing::info!("No active session");
    }
    Ok(())
}

/// Logs a one-line movie summary.
fn log_movie_row(movie: &Movie) {
    tracing::info!(
        "{}\t{}\t{}\t{}",
        movie.id.as_deref().unwrap_or("-"),
        movie.title,
        movie.genre.as_ref().map_or("-", |g| g.name.as_str()),
        movie.director.as_ref().map_or("-", |d| d.name.as_str()),
    );
}

/// Logs a user's profile.
fn log_user(user: &User) {
    tracing::info!("ID: {}", user.id.as_deref().unwrap_or("-"));
    tracing::info!("Username: {}", user.username);
    tracing::info!("Email: {}", user.email.as_deref().unwrap_or("-"));
    tracing::info!("Birthday: {}", user.birthday.as_deref().unwrap_or("-"));
    tracing::info!("Favorites: {}", user.favorite_movies.len());
    for movie_id in &user.favorite_movies {
        tracing::info!("  {movie_id}");
    }
}

/// Runs the `movies list` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_movies_list(ctx: &AppContext) -> Result<()> {
    let client = ctx.client()?;
    let movies = client.all_movies().await.context("failed to list movies")?;

    tracing::info!("ID\t\t\t\tTitle\tGenre\tDirector");
    for movie in &movies {
        log_movie_row(movie);
    }
    tracing::info!("Total: {} movies", movies.len());

    Ok(())
}

/// Runs the `movies get` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_movies_get(args: &TitleArgs, ctx: &AppContext) -> Result<()> {
    let client = ctx.client()?;
    let movie = client
        .movie_by_title(&args.title)
        .await
        .context("failed to fetch movie")?;

    tracing::info!("ID: {}", movie.id.as_deref().unwrap_or("-"));
    tracing::info!("Title: {}", movie.title);
    tracing::info!(
        "Genre: {}",
        movie.genre.as_ref().map_or("-", |g| g.name.as_str())
    );
    tracing::info!(
        "Director: {}",
        movie.director.as_ref().map_or("-", |d| d.name.as_str())
    );
    tracing::info!(
        "Featured: {}",
        movie.featured.map_or_else(|| String::from("-"), |f| f.to_string())
    );
    tracing::info!("Image: {}", movie.image_path.as_deref().unwrap_or("-"));
    tracing::info!("---");
    tracing::info!("{}", movie.description.as_deref().unwrap_or("-"));

    Ok(())
}

/// Runs the `directors get` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_directors_get(args: &NameArgs, ctx: &AppContext) -> Result<()> {
    let client = ctx.client()?;
    let director = client
        .director(&args.name)
        .await
        .context("failed to fetch director")?;

    tracing::info!("Name: {}", director.name);
    tracing::info!("Born: {}", director.birth.as_deref().unwrap_or("-"));
    tracing::info!("Died: {}", director.death.as_deref().unwrap_or("-"));
    tracing::info!("---");
    tracing::info!("{}", director.bio.as_deref().unwrap_or("-"));

    Ok(())
}

/// Runs the `genres get` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_genres_get(args: &NameArgs, ctx: &AppContext) -> Result<()> {
    let client = ctx.client()?;
    let genre = client
        .genre(&args.name)
        .await
        .context("failed to fetch genre")?;

    tracing::info!("Name: {}", genre.name);
    tracing::info!("---");
    tracing::info!("{}", genre.description.as_deref().unwrap_or("-"));

    Ok(())
}

/// Runs the `users get` subcommand.
///
/// # Errors
///
/// Returns an error if no username is known or the request fails.
#[instrument(skip_all)]
async fn run_users_get(args: UsernameArgs, ctx: &AppContext) -> Result<()> {
    let username = ctx.username(args.username)?;
    let client = ctx.client()?;
    let user = client.user(&username).await.context("failed to fetch user")?;
    log_user(&user);
    Ok(())
}

/// Runs the `users favorites` subcommand.
///
/// # Errors
///
/// Returns an error if no username is known or the request fails.
#[instrument(skip_all)]
async fn run_users_favorites(args: UsernameArgs, ctx: &AppContext) -> Result<()> {
    let username = ctx.username(args.username)?;
    let client = ctx.client()?;
    let favorites = client
        .favorite_movies(&username)
        .await
        .context("failed to fetch favorites")?;

    for entry in &favorites {
        match entry {
            FavoriteEntry::Id(id) => tracing::info!("{id}"),
            FavoriteEntry::Movie(movie) => log_movie_row(movie),
        }
    }
    tracing::info!("Total: {} favorites", favorites.len());

    Ok(())
}

/// Runs the `users add-favorite` / `users remove-favorite` subcommands.
///
/// # Errors
///
/// Returns an error if no username is known or the request fails.
#[instrument(skip_all)]
async fn run_users_favorite(args: FavoriteArgs, add: bool, ctx: &AppContext) -> Result<()> {
    let username = ctx.username(args.username)?;
    let client = ctx.client()?;
    let user = if add {
        client
            .add_favorite_movie(&username, &args.movie_id)
            .await
            .context("failed to add favorite")?
    } else {
        client
            .remove_favorite_movie(&username, &args.movie_id)
            .await
            .context("failed to remove favorite")?
    };

    tracing::info!(
        "{} {} favorites of {}",
        if add { "Added to" } else { "Removed from" },
        args.movie_id,
        user.username
    );
    tracing::info!("Favorites: {}", user.favorite_movies.len());

    Ok(())
}

/// Runs the `users update` subcommand.
///
/// # Errors
///
/// Returns an error if no field is given or the request fails.
#[instrument(skip_all)]
async fn run_users_update(args: UpdateArgs, ctx: &AppContext) -> Result<()> {
    let update = UserUpdate {
        username: args.fields.username,
        password: args.fields.password,
        email: args.fields.email,
        birthday: args.fields.birthday,
    };
    if update.is_empty() {
        bail!("nothing to update; pass at least one of --username, --password, --email, --birthday");
    }

    let client = ctx.client()?;
    let user = client
        .update_user(&args.id, &update)
        .await
        .context("failed to update user")?;
    log_user(&user);

    Ok(())
}

/// Runs the `users delete` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_users_delete(args: &UserIdArgs, ctx: &AppContext) -> Result<()> {
    let client = ctx.client()?;
    let response = client
        .delete_user(&args.id)
        .await
        .context("failed to delete user")?;

    tracing::info!(
        "{}",
        response
            .message
            .unwrap_or_else(|| format!("User {} deleted", args.id))
    );

    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be written.
fn run_config_init(ctx: &AppContext) -> Result<()> {
    if ctx.config_path.exists() {
        tracing::info!("Config already exists at {}", ctx.config_path.display());
        return Ok(());
    }
    AppConfig::default()
        .save(&ctx.config_path)
        .context("failed to save config")?;
    tracing::info!("Wrote default config to {}", ctx.config_path.display());
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be serialized.
fn run_config_show(ctx: &AppContext) -> Result<()> {
    let content =
        toml::to_string_pretty(&ctx.config).context("failed to serialize config to TOML")?;
    tracing::info!("# {}", ctx.config_path.display());
    for line in content.lines() {
        tracing::info!("{line}");
    }
    match ctx.session.username() {
        Some(username) => tracing::info!("# logged in as {username}"),
        None => tracing::info!("# not logged in"),
    }
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        let name = command.get_name().to_owned();
        clap_complete::generate(args.shell, &mut command, name, &mut io::stdout());
        return Ok(());
    }

    let ctx = AppContext::load(cli.dir.as_ref(), cli.api_url)?;
    match cli.command {
        Commands::Open(args) => run_open(args, &ctx).await,
        Commands::Register(fields) => {
            run_registration_form(fields, &ctx, &mut std_prompter()).await
        }
        Commands::Login(args) => run_login_form(args, &ctx, &mut std_prompter()).await,
        Commands::Logout => run_logout(&ctx),
        Commands::Movies(movies) => match movies.command {
            MoviesSubcommands::List => run_movies_list(&ctx).await,
            MoviesSubcommands::Get(args) => run_movies_get(&args, &ctx).await,
        },
        Commands::Directors(directors) => match directors.command {
            NameSubcommands::Get(args) => run_directors_get(&args, &ctx).await,
        },
        Commands::Genres(genres) => match genres.command {
            NameSubcommands::Get(args) => run_genres_get(&args, &ctx).await,
        },
        Commands::Users(users) => match users.command {
            UsersSubcommands::Get(args) => run_users_get(args, &ctx).await,
            UsersSubcommands::Favorites(args) => run_users_favorites(args, &ctx).await,
            UsersSubcommands::AddFavorite(args) => run_users_favorite(args, true, &ctx).await,
            UsersSubcommands::RemoveFavorite(args) => {
                run_users_favorite(args, false, &ctx).await
            }
            UsersSubcommands::Update(args) => run_users_update(args, &ctx).await,
            UsersSubcommands::Delete(args) => run_users_delete(&args, &ctx).await,
        },
        Commands::Config(config) => match config.command {
            ConfigSubcommands::Init => run_config_init(&ctx),
            ConfigSubcommands::Show => run_config_show(&ctx),
        },
        Commands::Completions(_) => Ok(()),
    }
}
