use super::{report, Workspace};
use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use tracing::info;
use vitrine::flows::{account, auth};
use vitrine::{hash_password, FormData, NewUser};
use vitrine_validation::{normalize_email, normalize_name};

/// Seed the default administrator under its reserved id
pub fn init(workspace: &Workspace, nome: &str, email: &str, senha: &str) -> Result<()> {
    if workspace.store.has_default_admin()? {
        println!("{}", "Default administrator already exists".yellow());
        return Ok(());
    }
    let policy = &workspace.config.security.password;
    if !policy.accepts(senha.trim()) {
        bail!(
            "password must have at least {} characters with upper case, lower case and a digit",
            policy.min_length
        );
    }

    let admin = workspace.store.seed_default_admin(NewUser {
        name: normalize_name(nome),
        email: normalize_email(email),
        password_hash: hash_password(senha.trim()).map_err(|e| anyhow!("{e}"))?,
        admin: true,
    })?;
    workspace.save()?;
    info!(user_id = admin.id, "default administrator created");

    println!("{} {}", "Created administrator".green().bold(), admin.email.cyan());
    Ok(())
}

pub fn signup(
    workspace: &Workspace,
    nome: &str,
    email: &str,
    senha: &str,
    conf_senha: &str,
) -> Result<()> {
    let form = FormData::new()
        .with("nome", nome)
        .with("email", email)
        .with("senha", senha)
        .with("confSenha", conf_senha);

    let outcome =
        account::create_account(&workspace.store, &workspace.config.security.password, &form)?;
    if outcome.is_redirect() {
        workspace.save()?;
    }
    report(workspace, &outcome)
}

pub fn login(
    workspace: &Workspace,
    email: &str,
    senha: &str,
    return_url: Option<&str>,
) -> Result<()> {
    let form = FormData::new().with("email", email).with("senha", senha);
    let return_url = return_url.unwrap_or(&workspace.config.site.home);
    let outcome = auth::login(&workspace.store, &form, Some(return_url))?;

    // a failed login changes nothing
    if outcome.as_redirect().is_some_and(|r| r.session.is_some()) {
        workspace.save()?;
    }
    report(workspace, &outcome)
}

pub fn logout(workspace: &Workspace) -> Result<()> {
    let outcome = auth::logout(&workspace.store, &workspace.viewer)?;
    workspace.save()?;
    report(workspace, &outcome)
}

pub fn change_password(
    workspace: &Workspace,
    senha_atual: &str,
    nova_senha: &str,
    conf_nova_senha: &str,
) -> Result<()> {
    let form = FormData::new()
        .with("senha_atual", senha_atual)
        .with("nova_senha", nova_senha)
        .with("conf_nova_senha", conf_nova_senha);

    let outcome = account::change_password(
        &workspace.store,
        &workspace.config.security.password,
        &workspace.viewer,
        &form,
    )?;
    if outcome.is_redirect() {
        workspace.save()?;
    }
    report(workspace, &outcome)
}

pub fn profile(workspace: &Workspace, nome: &str, email: &str) -> Result<()> {
    let form = FormData::new().with("nome", nome).with("email", email);
    let outcome = account::update_profile(&workspace.store, &workspace.viewer, &form)?;
    if outcome.is_redirect() {
        workspace.save()?;
    }
    report(workspace, &outcome)
}
