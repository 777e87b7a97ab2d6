// File: src/flows/account.rs
// Purpose: Sign-up, password change and own-profile update

use super::{FlowError, DUPLICATE_EMAIL};
use crate::form_data::FormData;
use crate::models::{NewUser, UserUpdate};
use crate::outcome::{echo_values, FormOutcome};
use crate::security::{hash_password, verify_password, Viewer};
use crate::store::{StoreError, UserStore};
use indexmap::IndexMap;
use tracing::{debug, info};
use vitrine_validation::{
    add_error, normalize_email, normalize_name, FieldRules, PasswordPolicy, Validator,
};

pub const CREATE_ACCOUNT_TEMPLATE: &str = "root/criarConta.html";
pub const RESTRICTED_AREA_TEMPLATE: &str = "usuario/arearestrita.html";
pub const RESTRICTED_AREA_PATH: &str = "/usuario/arearestrita";

/// POST /criarConta
///
/// Fields: `nome`, `email`, `senha`, `confSenha`. Only name and e-mail are
/// echoed back on failure.
pub fn create_account<S: UserStore + ?Sized>(
    store: &S,
    policy: &PasswordPolicy,
    form: &FormData,
) -> Result<FormOutcome, FlowError> {
    let nome = normalize_name(form.value("nome"));
    let email = normalize_email(form.value("email"));
    let senha = form.value("senha").trim();
    let conf_senha = form.value("confSenha").trim();

    let mut errors = Validator::new()
        .field("nome", nome.as_str(), FieldRules::new().not_empty().full_name())
        .field("email", email.as_str(), FieldRules::new().not_empty())
        .field("senha", senha, FieldRules::new().not_empty().password(*policy))
        .field(
            "confSenha",
            conf_senha,
            FieldRules::new().not_empty().matches(senha, "Senha"),
        )
        .run();

    if errors.is_empty() {
        let new_user = NewUser {
            name: nome.clone(),
            email: email.clone(),
            password_hash: hash_password(senha)?,
            admin: false,
        };

        match store.insert_user(new_user) {
            Ok(user) => {
                info!(user_id = user.id, "account created");
                return Ok(FormOutcome::redirect(
                    "/login",
                    "Sua conta foi criada com sucesso! Use seu e-mail e senha para fazer login!",
                ));
            }
            Err(StoreError::DuplicateEmail(_)) => add_error("email", DUPLICATE_EMAIL, &mut errors),
            Err(err) => return Err(err.into()),
        }
    }

    debug!(fields = errors.len(), "account form rejected");
    Ok(FormOutcome::rerender(
        CREATE_ACCOUNT_TEMPLATE,
        errors,
        echo_values(&[("nome", &nome), ("email", &email)]),
    ))
}

/// POST /usuario/alterarsenha
///
/// Fields: `senha_atual`, `nova_senha`, `conf_nova_senha`. The stored password
/// is only checked once every other rule passed, so a malformed form never
/// reports "incorrect password" too. Nothing is echoed back.
pub fn change_password<S: UserStore + ?Sized>(
    store: &S,
    policy: &PasswordPolicy,
    viewer: &Viewer,
    form: &FormData,
) -> Result<FormOutcome, FlowError> {
    let user = viewer.require_authenticated()?;

    let senha_atual = form.value("senha_atual").trim();
    let nova_senha = form.value("nova_senha").trim();
    let conf_nova_senha = form.value("conf_nova_senha").trim();

    let mut errors = Validator::new()
        .field(
            "senha_atual",
            senha_atual,
            FieldRules::new().not_empty().password(*policy),
        )
        .field(
            "nova_senha",
            nova_senha,
            FieldRules::new().not_empty().password(*policy),
        )
        .field(
            "conf_nova_senha",
            conf_nova_senha,
            FieldRules::new()
                .not_empty()
                .matches(nova_senha, "Nova Senha"),
        )
        .run();

    if errors.is_empty() {
        if let Some(stored_hash) = store.password_hash_by_email(&user.email)? {
            if !verify_password(senha_atual, &stored_hash)? {
                add_error("senha_atual", "Senha atual está incorreta.", &mut errors);
            }
        }
    }

    if !errors.is_empty() {
        debug!(user_id = user.id, fields = errors.len(), "password change rejected");
        return Ok(FormOutcome::rerender(
            RESTRICTED_AREA_TEMPLATE,
            errors,
            IndexMap::new(),
        ));
    }

    let new_hash = hash_password(nova_senha)?;
    store.set_password_hash(user.id, &new_hash)?;
    info!(user_id = user.id, "password changed");

    Ok(FormOutcome::redirect(
        RESTRICTED_AREA_PATH,
        "Senha alterada com sucesso!",
    ))
}

/// POST /usuario/alterardados
///
/// The signed-in user edits their own `nome` and `email`.
pub fn update_profile<S: UserStore + ?Sized>(
    store: &S,
    viewer: &Viewer,
    form: &FormData,
) -> Result<FormOutcome, FlowError> {
    let user = viewer.require_authenticated()?;

    let nome = normalize_name(form.value("nome"));
    let email = normalize_email(form.value("email"));

    let mut errors = Validator::new()
        .field("nome", nome.as_str(), FieldRules::new().not_empty().full_name())
        .field("email", email.as_str(), FieldRules::new().not_empty())
        .run();

    if errors.is_empty() {
        let update = UserUpdate {
            name: Some(nome.clone()),
            email: Some(email.clone()),
            admin: None,
        };

        match store.update_user(user.id, update) {
            Ok(Some(_)) => {
                info!(user_id = user.id, "profile updated");
                return Ok(FormOutcome::redirect(
                    RESTRICTED_AREA_PATH,
                    "Usuário alterado com sucesso!",
                ));
            }
            Ok(None) => {
                return Err(FlowError::NotFound {
                    entity: "usuário",
                    id: user.id,
                })
            }
            Err(StoreError::DuplicateEmail(_)) => add_error("email", DUPLICATE_EMAIL, &mut errors),
            Err(err) => return Err(err.into()),
        }
    }

    Ok(FormOutcome::rerender(
        RESTRICTED_AREA_TEMPLATE,
        errors,
        echo_values(&[("nome", &nome), ("email", &email)]),
    ))
}
