mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(version, about = "Vitrine - store admin flows from the command line", long_about = None)]
pub struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "vitrine.toml")]
    config: PathBuf,

    /// JSON store snapshot (overrides [store].path)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Session token returned by `login`
    #[arg(long, global = true, env = "VITRINE_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the default administrator in an empty store
    Init {
        #[arg(long, default_value = "Administrador")]
        nome: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        senha: String,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        nome: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        senha: String,

        /// Password confirmation
        #[arg(long = "conf-senha")]
        conf_senha: String,
    },

    /// Log in and print the session token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        senha: String,

        /// Where to go after login (relative paths only)
        #[arg(long)]
        return_url: Option<String>,
    },

    /// End the current session
    Logout,

    /// Change the password of the current user
    #[command(name = "change-password")]
    ChangePassword {
        #[arg(long)]
        senha_atual: String,

        #[arg(long)]
        nova_senha: String,

        #[arg(long)]
        conf_nova_senha: String,
    },

    /// Update the name and e-mail of the current user
    Profile {
        #[arg(long)]
        nome: String,

        #[arg(long)]
        email: String,
    },

    /// List users (admin)
    Users,

    /// Delete a user (admin)
    #[command(name = "delete-user")]
    DeleteUser { id: i64 },

    /// Edit a user (admin)
    #[command(name = "update-user")]
    UpdateUser {
        id: i64,

        #[arg(long)]
        nome: String,

        #[arg(long)]
        email: String,

        /// Grant administrator access
        #[arg(long)]
        admin: bool,
    },

    /// Product catalog
    Products,

    /// Show one product (admin)
    Product { id: i64 },

    /// Add a product (admin)
    #[command(name = "add-product")]
    AddProduct {
        #[command(flatten)]
        fields: ProductArgs,
    },

    /// Edit a product (admin)
    #[command(name = "edit-product")]
    EditProduct {
        id: i64,

        #[command(flatten)]
        fields: ProductArgs,
    },

    /// Delete a product and its image (admin)
    #[command(name = "delete-product")]
    DeleteProduct { id: i64 },

    /// Zero-pad a numeric id
    #[command(name = "format-id")]
    FormatId { id: Option<i64> },

    /// Proper-case a name
    Capitalize { text: String },

    /// Run a template filter by name
    Filter { name: String, value: String },
}

#[derive(clap::Args)]
pub struct ProductArgs {
    #[arg(long)]
    nome: String,

    /// Price, `,` or `.` as decimal separator
    #[arg(long)]
    preco: String,

    #[arg(long)]
    descricao: String,

    /// Image file to crop and store
    #[arg(long)]
    image: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
