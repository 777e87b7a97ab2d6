// File: src/flows/users.rs
// Purpose: Administrator user management

use super::{FlowError, DUPLICATE_EMAIL};
use crate::form_data::FormData;
use crate::models::{UserSummary, UserUpdate, DEFAULT_ADMIN_ID};
use crate::outcome::{echo_values, FormOutcome};
use crate::security::Viewer;
use crate::store::{StoreError, UserStore};
use tracing::{info, warn};
use vitrine_validation::{add_error, normalize_email, normalize_name, FieldRules, Validator};

pub const USERS_PATH: &str = "/usuario";
pub const EDIT_USER_TEMPLATE: &str = "usuario/alterar.html";

pub fn list<S: UserStore + ?Sized>(
    store: &S,
    viewer: &Viewer,
) -> Result<Vec<UserSummary>, FlowError> {
    viewer.require_admin()?;
    Ok(store.all_users()?.iter().map(|u| u.summary()).collect())
}

pub fn get<S: UserStore + ?Sized>(
    store: &S,
    viewer: &Viewer,
    id: i64,
) -> Result<UserSummary, FlowError> {
    viewer.require_admin()?;
    store
        .user_by_id(id)?
        .map(|u| u.summary())
        .ok_or(FlowError::NotFound {
            entity: "usuário",
            id,
        })
}

/// GET /usuario/excluir/{id}
pub fn delete<S: UserStore + ?Sized>(
    store: &S,
    viewer: &Viewer,
    id: i64,
) -> Result<FormOutcome, FlowError> {
    let admin = viewer.require_admin()?;

    if id == DEFAULT_ADMIN_ID {
        warn!(admin_id = admin.id, "refused to delete the default administrator");
        return Ok(FormOutcome::redirect(
            USERS_PATH,
            "Não é possível excluir o administrador padrão do sistema.",
        ));
    }
    if id == admin.id {
        warn!(admin_id = admin.id, "refused self-deletion");
        return Ok(FormOutcome::redirect(
            USERS_PATH,
            "Não é possível excluir o próprio usuário que está logado.",
        ));
    }

    if !store.delete_user(id)? {
        return Err(FlowError::NotFound {
            entity: "usuário",
            id,
        });
    }
    info!(admin_id = admin.id, user_id = id, "user deleted");

    Ok(FormOutcome::redirect(USERS_PATH, "Usuário excluído com sucesso."))
}

/// POST /usuario/alterar/{id}
///
/// Fields: `nome`, `email`, `administrador` (checkbox).
pub fn update<S: UserStore + ?Sized>(
    store: &S,
    viewer: &Viewer,
    id: i64,
    form: &FormData,
) -> Result<FormOutcome, FlowError> {
    let admin = viewer.require_admin()?;

    if id == DEFAULT_ADMIN_ID {
        warn!(admin_id = admin.id, "refused to edit the default administrator");
        return Ok(FormOutcome::redirect(
            USERS_PATH,
            "Não é possível alterar dados do administrador padrão.",
        ));
    }

    let nome = normalize_name(form.value("nome"));
    let email = normalize_email(form.value("email"));
    let administrador = form.flag("administrador");

    let mut errors = Validator::new()
        .field("nome", nome.as_str(), FieldRules::new().not_empty())
        .field("email", email.as_str(), FieldRules::new().not_empty())
        .run();

    if errors.is_empty() {
        let update = UserUpdate {
            name: Some(nome.clone()),
            email: Some(email.clone()),
            admin: Some(administrador),
        };
        match store.update_user(id, update) {
            Ok(Some(_)) => {
                info!(admin_id = admin.id, user_id = id, administrador, "user updated");
                return Ok(FormOutcome::redirect(
                    USERS_PATH,
                    "Usuário alterado com sucesso.",
                ));
            }
            Ok(None) => {
                return Err(FlowError::NotFound {
                    entity: "usuário",
                    id,
                })
            }
            Err(StoreError::DuplicateEmail(_)) => add_error("email", DUPLICATE_EMAIL, &mut errors),
            Err(err) => return Err(err.into()),
        }
    }

    Ok(FormOutcome::rerender(
        EDIT_USER_TEMPLATE,
        errors,
        echo_values(&[("nome", &nome), ("email", &email)]),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::models::{NewUser, User};
    use crate::security::AccessError;
    use pretty_assertions::assert_eq;

    fn seed(store: &MemoryStore, name: &str, email: &str, admin: bool) -> User {
        store
            .insert_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: String::new(),
                admin,
            })
            .unwrap()
    }

    /// Default admin (1), a second admin (2) and a member (3)
    fn fixture() -> (MemoryStore, Viewer) {
        let store = MemoryStore::new();
        seed(&store, "Administrador", "admin@vitrine.local", true);
        let second = seed(&store, "Bruno Lima", "bruno@example.com", true);
        seed(&store, "Carla Dias", "carla@example.com", false);
        (store, Viewer::authenticated(second))
    }

    #[test]
    fn test_members_are_forbidden() {
        let (store, _) = fixture();
        let member = Viewer::authenticated(store.user_by_id(3).unwrap().unwrap());

        assert!(matches!(
            list(&store, &member),
            Err(FlowError::Access(AccessError::Forbidden))
        ));
        assert!(matches!(
            delete(&store, &Viewer::anonymous(), 3),
            Err(FlowError::Access(AccessError::Unauthorized))
        ));
    }

    #[test]
    fn test_list_and_get() {
        let (store, admin) = fixture();
        let users = list(&store, &admin).unwrap();
        assert_eq!(users.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        assert_eq!(get(&store, &admin, 3).unwrap().email, "carla@example.com");
        assert_eq!(get(&store, &admin, 99).unwrap_err().status_code(), 404);
    }

    #[test]
    fn test_default_admin_cannot_be_deleted() {
        let (store, admin) = fixture();
        let outcome = delete(&store, &admin, DEFAULT_ADMIN_ID).unwrap();
        assert_eq!(
            outcome.as_redirect().unwrap().message.as_deref(),
            Some("Não é possível excluir o administrador padrão do sistema.")
        );
        assert!(store.user_by_id(DEFAULT_ADMIN_ID).unwrap().is_some());
    }

    #[test]
    fn test_admin_cannot_delete_self() {
        let (store, admin) = fixture();
        let outcome = delete(&store, &admin, 2).unwrap();
        assert_eq!(
            outcome.as_redirect().unwrap().message.as_deref(),
            Some("Não é possível excluir o próprio usuário que está logado.")
        );
        assert!(store.user_by_id(2).unwrap().is_some());
    }

    #[test]
    fn test_delete_member() {
        let (store, admin) = fixture();
        let outcome = delete(&store, &admin, 3).unwrap();
        let redirect = outcome.as_redirect().unwrap();
        assert_eq!(redirect.location, USERS_PATH);
        assert_eq!(redirect.message.as_deref(), Some("Usuário excluído com sucesso."));
        assert!(store.user_by_id(3).unwrap().is_none());

        assert!(matches!(
            delete(&store, &admin, 3),
            Err(FlowError::NotFound { id: 3, .. })
        ));
    }

    #[test]
    fn test_default_admin_cannot_be_edited() {
        let (store, admin) = fixture();
        let form = FormData::new().with("nome", "Outro Nome").with("email", "x@y.com");
        let outcome = update(&store, &admin, DEFAULT_ADMIN_ID, &form).unwrap();
        assert_eq!(
            outcome.as_redirect().unwrap().message.as_deref(),
            Some("Não é possível alterar dados do administrador padrão.")
        );
        assert_eq!(
            store.user_by_id(DEFAULT_ADMIN_ID).unwrap().unwrap().name,
            "Administrador"
        );
    }

    #[test]
    fn test_promote_member() {
        let (store, admin) = fixture();
        let form = FormData::new()
            .with("nome", "carla DIAS")
            .with("email", "Carla@Example.com")
            .with("administrador", "on");
        let outcome = update(&store, &admin, 3, &form).unwrap();
        assert_eq!(
            outcome.as_redirect().unwrap().message.as_deref(),
            Some("Usuário alterado com sucesso.")
        );

        let carla = store.user_by_id(3).unwrap().unwrap();
        assert_eq!(carla.name, "Carla Dias");
        assert!(carla.admin);
    }

    #[test]
    fn test_update_duplicate_email() {
        let (store, admin) = fixture();
        let form = FormData::new()
            .with("nome", "Carla Dias")
            .with("email", "bruno@example.com");
        let outcome = update(&store, &admin, 3, &form).unwrap();
        assert_eq!(
            outcome.errors().and_then(|e| e.first("email")),
            Some(DUPLICATE_EMAIL)
        );
        assert_eq!(store.user_by_id(3).unwrap().unwrap().email, "carla@example.com");
    }
}
