// File: src/flows/auth.rs
// Purpose: Login and logout

use super::FlowError;
use crate::form_data::FormData;
use crate::outcome::{FormOutcome, Redirect, SessionCookie};
use crate::security::{generate_token, verify_password, Viewer};
use crate::store::UserStore;
use tracing::{info, warn};
use vitrine_validation::normalize_email;

pub const LOGIN_PATH: &str = "/login";

/// Only same-site relative paths are followed after login
pub fn safe_return_url(return_url: Option<&str>) -> &str {
    match return_url.map(str::trim) {
        Some(url) if url.starts_with('/') && !url.starts_with("//") && !url.contains('\\') => url,
        _ => "/",
    }
}

/// POST /login
///
/// Fields: `email`, `senha`. Any mismatch, including an unknown e-mail,
/// produces the same message.
pub fn login<S: UserStore + ?Sized>(
    store: &S,
    form: &FormData,
    return_url: Option<&str>,
) -> Result<FormOutcome, FlowError> {
    let email = normalize_email(form.value("email"));
    let senha = form.value("senha");

    let verified = match store.password_hash_by_email(&email)? {
        Some(hash) if !email.is_empty() => verify_password(senha, &hash)?,
        _ => false,
    };

    if !verified {
        warn!("login rejected");
        return Ok(FormOutcome::redirect(
            LOGIN_PATH,
            "Credenciais inválidas. Tente novamente.",
        ));
    }

    let token = generate_token();
    store.set_token_by_email(Some(&token), &email)?;
    info!("login succeeded");

    Ok(FormOutcome::Redirect(
        Redirect::to(safe_return_url(return_url))
            .with_message("Login realizado com sucesso.")
            .with_session(SessionCookie::Set(token)),
    ))
}

/// GET /logout
pub fn logout<S: UserStore + ?Sized>(store: &S, viewer: &Viewer) -> Result<FormOutcome, FlowError> {
    let Some(user) = viewer.user() else {
        return Ok(FormOutcome::Redirect(
            Redirect::to("/").with_session(SessionCookie::Clear),
        ));
    };

    store.set_token_by_email(None, &user.email)?;
    info!(user_id = user.id, "logged out");

    Ok(FormOutcome::Redirect(
        Redirect::to("/")
            .with_message("Saída realizada com sucesso.")
            .with_session(SessionCookie::Clear),
    ))
}
