use crate::api::Gateways;
use crate::client::ApiClient;
use crate::config::Config;
use crate::display;
use crate::guard::{Navigation, Route, RouteGuard};
use crate::models::{AiAction, Category};
use crate::session::SessionManager;
use crate::views::{
    ArticleDetailView, ArticleEditor, AuthController, HomeView, LoginForm, MyArticlesView,
    NavItem, Navbar, Notice, Outcome, SignupForm,
};
use anyhow::{anyhow, bail, Context as _, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use secrecy::SecretString;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Knowledge Hub command-line client
#[derive(Parser, Debug)]
#[command(name = "knowhub", about = "Browse, search and write Knowledge Hub articles")]
pub struct Args {
    #[arg(long, global = true, help = "API base URL (overrides config and KNOWHUB_API_URL)")]
    pub api_url: Option<String>,

    #[arg(long, global = true, help = "Session file location")]
    pub session_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Debug output")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "KNOWHUB_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "KNOWHUB_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user and menu
    Whoami,
    /// List all public articles
    List,
    /// Search public articles
    Search {
        #[arg(short, long, default_value = "")]
        keyword: String,
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Show one article
    Show { id: i64 },
    /// List your own articles
    Mine,
    /// Write a new article
    New(ArticleArgs),
    /// Edit one of your articles
    Edit {
        id: i64,
        #[command(flatten)]
        fields: ArticleArgs,
    },
    /// Delete one of your articles
    Delete {
        id: i64,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    /// Ask the AI service for a suggestion without saving anything
    Assist {
        action: AiAction,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        title: Option<String>,
    },
    /// Show where a client path would lead with the current session
    Route { path: String },
}

#[derive(ClapArgs, Debug, Default)]
pub struct ArticleArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub category: Option<Category>,
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,
    #[arg(long)]
    pub content_file: Option<PathBuf>,
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long)]
    pub summary: Option<String>,
    #[arg(long = "ai", value_name = "ACTION", help = "AI aid to apply before saving (repeatable)")]
    pub ai: Vec<AiAction>,
}

pub struct Context {
    pub config: Config,
    pub session: SessionManager,
    pub gateways: Gateways,
}

impl Context {
    pub fn new(config: Config) -> Self {
        let session = SessionManager::with_file(&config.session_file);
        let client = ApiClient::new(&config.api_url, session.clone());
        Self {
            config,
            session,
            gateways: Gateways::new(client),
        }
    }

    fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.session.clone())
    }

    /// Refuse to enter a protected view without a session.
    fn enter(&self, route: Route) -> Result<()> {
        match self.guard().check(route) {
            Navigation::Render(_) => Ok(()),
            Navigation::Redirect { to, .. } => {
                bail!("{} requires login. Run `knowhub login` first ({}).", route, to)
            }
        }
    }
}

/// Resolve configuration from file, env and flags.
pub fn resolve_config(args: &Args) -> Result<Config> {
    let cfg = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let cfg = cfg.with_overrides(args.api_url.as_deref(), args.session_file.as_deref());

    if let Err(errors) = cfg.validate() {
        for err in &errors {
            eprintln!("Config error {}", err);
        }
        return Err(anyhow!(
            "Configuration has {} validation error(s)",
            errors.len()
        ));
    }
    Ok(cfg)
}

pub async fn run(args: Args) -> Result<()> {
    let cfg = resolve_config(&args)?;
    tracing::debug!("api: {} session: {}", cfg.api_url, cfg.session_file.display());
    let ctx = Context::new(cfg);

    match args.command {
        Command::Signup {
            username,
            email,
            password,
        } => {
            let password = password_or_prompt(password)?;
            let form = SignupForm::new(&username, &email, password);
            let auth = AuthController::new(ctx.session.clone());
            finish(auth.signup(&ctx.gateways.auth, &form).await)
        }
        Command::Login { email, password } => {
            let password = password_or_prompt(password)?;
            let form = LoginForm::new(&email, password);
            let auth = AuthController::new(ctx.session.clone());
            finish(auth.login(&ctx.gateways.auth, &form).await)
        }
        Command::Logout => {
            let auth = AuthController::new(ctx.session.clone());
            finish(auth.logout(&ctx.gateways.auth).await)
        }
        Command::Whoami => {
            print_navbar(&Navbar::from_session(&ctx.session));
            Ok(())
        }
        Command::List => {
            let mut home = HomeView::new();
            home.load(&ctx.gateways.articles).await;
            print_list(&home.articles, false, "No articles found");
            Ok(())
        }
        Command::Search { keyword, category } => {
            let mut home = HomeView::new();
            home.keyword = keyword;
            home.category = category;
            home.search(&ctx.gateways.articles).await;
            print_list(&home.articles, false, "No articles found");
            Ok(())
        }
        Command::Show { id } => {
            let mut view = ArticleDetailView::new();
            view.load(&ctx.gateways.articles, id).await;
            match &view.article {
                Some(article) => {
                    println!("{}", display::article_detail(article));
                    Ok(())
                }
                None => bail!("Article not found"),
            }
        }
        Command::Mine => {
            ctx.enter(Route::MyArticles)?;
            let mut view = MyArticlesView::new();
            view.load(&ctx.gateways.articles).await;
            print_list(
                &view.articles,
                true,
                "You haven't created any articles yet. Create one with `knowhub new`.",
            );
            Ok(())
        }
        Command::New(fields) => {
            ctx.enter(Route::NewArticle)?;
            let mut editor = ArticleEditor::create();
            write_article(&ctx, &mut editor, fields).await
        }
        Command::Edit { id, fields } => {
            ctx.enter(Route::EditArticle(id))?;
            let mut editor = ArticleEditor::edit(id);
            editor.load(&ctx.gateways.articles).await;
            if let Some(err) = &editor.error {
                bail!("{}", err);
            }
            write_article(&ctx, &mut editor, fields).await
        }
        Command::Delete { id, yes } => {
            ctx.enter(Route::MyArticles)?;
            let confirmed = yes || confirm("Are you sure you want to delete this article?")?;
            let mut view = MyArticlesView::new();
            match view.delete(&ctx.gateways.articles, id, confirmed).await {
                Some(notice) => report(notice),
                None => {
                    println!("Cancelled.");
                    Ok(())
                }
            }
        }
        Command::Assist {
            action,
            content,
            content_file,
            title,
        } => {
            ctx.enter(Route::NewArticle)?;
            let mut editor = ArticleEditor::create();
            editor.form.content = read_content(content, content_file)?.unwrap_or_default();
            editor.form.title = title.unwrap_or_default();
            let notice = editor.assist(&ctx.gateways.ai, action).await;
            let failed = !matches!(notice, Notice::Success(_));
            if failed {
                return report(notice);
            }
            let field = match action {
                AiAction::Improve => &editor.form.content,
                AiAction::Summarize => &editor.form.summary,
                AiAction::SuggestTags => &editor.form.tags,
                AiAction::SuggestTitle => &editor.form.title,
            };
            println!("{}", field);
            Ok(())
        }
        Command::Route { path } => {
            let route = Route::parse(&path).ok_or_else(|| anyhow!("Unknown path: {}", path))?;
            match ctx.guard().check(route) {
                Navigation::Render(r) => println!("render {}", r),
                Navigation::Redirect { to, replace } => {
                    println!("redirect {}{}", to, if replace { " (replace)" } else { "" })
                }
            }
            Ok(())
        }
    }
}

/// Fill the form from flags, run requested AI aids, then save.
async fn write_article(ctx: &Context, editor: &mut ArticleEditor, fields: ArticleArgs) -> Result<()> {
    let form = &mut editor.form;
    if let Some(title) = fields.title {
        form.title = title;
    }
    if let Some(category) = fields.category {
        form.category = Some(category);
    }
    if let Some(content) = read_content(fields.content, fields.content_file)? {
        form.content = content;
    }
    if let Some(tags) = fields.tags {
        form.tags = tags;
    }
    if let Some(summary) = fields.summary {
        form.summary = summary;
    }

    for action in fields.ai {
        let notice = editor.assist(&ctx.gateways.ai, action).await;
        println!("{}", notice);
    }

    let outcome = editor.submit(&ctx.gateways.articles).await;
    finish(outcome)
}

fn read_content(inline: Option<String>, file: Option<PathBuf>) -> Result<Option<String>> {
    match (inline, file) {
        (Some(text), _) => Ok(Some(text)),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(Some(text))
        }
        (None, None) => Ok(None),
    }
}

fn password_or_prompt(password: Option<String>) -> Result<SecretString> {
    if let Some(p) = password {
        return Ok(SecretString::from(p));
    }
    print!("Password: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(SecretString::from(input.trim_end_matches(['\r', '\n']).to_string()))
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(matches!(input.trim(), "y" | "Y" | "yes"))
}

fn print_list(articles: &[crate::models::Article], strip: bool, empty: &str) {
    if articles.is_empty() {
        println!("{}", empty);
        return;
    }
    for article in articles {
        println!("{}", display::article_line(article));
        println!("       {}", display::preview(article, strip));
    }
}

fn print_navbar(navbar: &Navbar) {
    for item in navbar.items() {
        match item {
            NavItem::Link { label, route } => println!("  {:<12} {}", label, route),
            NavItem::Greeting(text) => println!("  {}", text),
            NavItem::Logout => println!("  Logout       knowhub logout"),
        }
    }
}

/// Print a notice; errors become a failing exit status.
fn report(notice: Notice) -> Result<()> {
    if notice.is_error() {
        return Err(anyhow!("{}", notice.message()));
    }
    println!("{}", notice);
    Ok(())
}

fn finish(outcome: Outcome) -> Result<()> {
    let next = outcome.navigate;
    report(outcome.notice)?;
    if let Some(route) = next {
        tracing::debug!("next view: {}", route);
    }
    Ok(())
}
