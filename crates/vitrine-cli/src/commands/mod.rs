pub mod account;
pub mod admin;
pub mod text;

use crate::{Cli, Commands};
use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;
use vitrine::{Config, FormOutcome, MemoryStore, SessionCookie, Viewer};

/// Loaded configuration, store and current viewer for one command
pub struct Workspace {
    pub config: Config,
    pub store: MemoryStore,
    pub viewer: Viewer,
    store_path: PathBuf,
}

impl Workspace {
    pub fn open(
        config_path: &Path,
        store_path: Option<PathBuf>,
        token: Option<&str>,
    ) -> Result<Self> {
        let config = Config::load(config_path)?;
        let store_path = store_path.unwrap_or_else(|| config.store.path.clone());

        let store = MemoryStore::load(&store_path)
            .with_context(|| format!("Failed to load store: {:?}", store_path))?;
        let viewer = Viewer::from_token(&store, token)?;
        debug!(authenticated = viewer.is_authenticated(), "workspace opened");

        Ok(Self {
            config,
            store,
            viewer,
            store_path,
        })
    }

    pub fn save(&self) -> Result<()> {
        self.store
            .save(&self.store_path)
            .with_context(|| format!("Failed to write store: {:?}", self.store_path))
    }

    pub fn images_dir(&self) -> &Path {
        &self.config.uploads.product_images_dir
    }
}

pub fn execute(cli: Cli) -> Result<()> {
    // pure helpers need no store
    match &cli.command {
        Commands::FormatId { id } => return text::format_id(*id),
        Commands::Capitalize { text } => return text::capitalize(text),
        Commands::Filter { name, value } => return text::filter(name, value),
        _ => {}
    }

    let workspace = Workspace::open(&cli.config, cli.store, cli.token.as_deref())?;

    match cli.command {
        Commands::Init { nome, email, senha } => account::init(&workspace, &nome, &email, &senha)?,
        Commands::Signup {
            nome,
            email,
            senha,
            conf_senha,
        } => account::signup(&workspace, &nome, &email, &senha, &conf_senha)?,
        Commands::Login {
            email,
            senha,
            return_url,
        } => account::login(&workspace, &email, &senha, return_url.as_deref())?,
        Commands::Logout => account::logout(&workspace)?,
        Commands::ChangePassword {
            senha_atual,
            nova_senha,
            conf_nova_senha,
        } => account::change_password(&workspace, &senha_atual, &nova_senha, &conf_nova_senha)?,
        Commands::Profile { nome, email } => account::profile(&workspace, &nome, &email)?,
        Commands::Users => admin::list_users(&workspace)?,
        Commands::DeleteUser { id } => admin::delete_user(&workspace, id)?,
        Commands::UpdateUser {
            id,
            nome,
            email,
            admin,
        } => admin::update_user(&workspace, id, &nome, &email, admin)?,
        Commands::Products => admin::list_products(&workspace)?,
        Commands::Product { id } => admin::product(&workspace, id)?,
        Commands::AddProduct { fields } => admin::add_product(&workspace, &fields)?,
        Commands::EditProduct { id, fields } => admin::edit_product(&workspace, id, &fields)?,
        Commands::DeleteProduct { id } => admin::delete_product(&workspace, id)?,
        Commands::FormatId { .. } | Commands::Capitalize { .. } | Commands::Filter { .. } => {}
    }

    Ok(())
}

/// Print a flow outcome: a colored summary on stderr, JSON on stdout.
/// Cookie changes are named the way the web layer would set them.
pub fn report(workspace: &Workspace, outcome: &FormOutcome) -> Result<()> {
    let security = &workspace.config.security;

    match outcome {
        FormOutcome::Redirect(redirect) => {
            if let Some(message) = &redirect.message {
                eprintln!("{} {}", security.message_cookie.dimmed(), message.green());
            }
            match &redirect.session {
                Some(SessionCookie::Set(token)) => eprintln!(
                    "{} set, export VITRINE_TOKEN={}",
                    security.auth_cookie.dimmed(),
                    token.cyan()
                ),
                Some(SessionCookie::Clear) => {
                    eprintln!("{} cleared", security.auth_cookie.dimmed())
                }
                None => {}
            }
            eprintln!("{} {}", "→".green().bold(), redirect.location);
        }
        FormOutcome::Rerender { errors, .. } => {
            for (field, messages) in errors {
                for message in messages {
                    eprintln!("{} {}: {}", "✗".red().bold(), field.yellow(), message);
                }
            }
        }
    }

    print_json(&serde_json::to_value(outcome)?)
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
