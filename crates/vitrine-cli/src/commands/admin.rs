use super::{print_json, report, Workspace};
use crate::ProductArgs;
use anyhow::{Context, Result};
use vitrine::flows::{products, users};
use vitrine::{FormData, UploadedFile};
use vitrine_validation::format_id;

pub fn list_users(workspace: &Workspace) -> Result<()> {
    let users = users::list(&workspace.store, &workspace.viewer)?;
    print_json(&serde_json::to_value(users)?)
}

pub fn delete_user(workspace: &Workspace, id: i64) -> Result<()> {
    let outcome = users::delete(&workspace.store, &workspace.viewer, id)?;
    workspace.save()?;
    report(workspace, &outcome)
}

pub fn update_user(
    workspace: &Workspace,
    id: i64,
    nome: &str,
    email: &str,
    admin: bool,
) -> Result<()> {
    let mut form = FormData::new().with("nome", nome).with("email", email);
    if admin {
        form = form.with("administrador", "on");
    }

    let outcome = users::update(&workspace.store, &workspace.viewer, id, &form)?;
    if outcome.is_redirect() {
        workspace.save()?;
    }
    report(workspace, &outcome)
}

/// Catalog with the image stem each product renders with
pub fn list_products(workspace: &Workspace) -> Result<()> {
    let listed: Vec<_> = products::catalog(&workspace.store, &workspace.viewer)?
        .into_iter()
        .map(|product| {
            serde_json::json!({
                "id": product.id,
                "nome": product.name,
                "preco": product.price,
                "descricao": product.description,
                "imagem": format!("{}.jpg", format_id(Some(product.id))),
            })
        })
        .collect();
    print_json(&serde_json::Value::Array(listed))
}

pub fn product(workspace: &Workspace, id: i64) -> Result<()> {
    let product = products::get(&workspace.store, &workspace.viewer, id)?;
    print_json(&serde_json::to_value(product)?)
}

fn product_form(fields: &ProductArgs) -> Result<FormData> {
    let mut form = FormData::new()
        .with("nome", fields.nome.as_str())
        .with("preco", fields.preco.as_str())
        .with("descricao", fields.descricao.as_str());

    if let Some(path) = &fields.image {
        let content = std::fs::read(path)
            .with_context(|| format!("Failed to read image: {:?}", path))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        form = form.with_file(products::IMAGE_FIELD, UploadedFile::new(filename, content));
    }

    Ok(form)
}

pub fn add_product(workspace: &Workspace, fields: &ProductArgs) -> Result<()> {
    let form = product_form(fields)?;
    let outcome = products::insert(
        &workspace.store,
        &workspace.viewer,
        workspace.images_dir(),
        &form,
    )?;
    if outcome.is_redirect() {
        workspace.save()?;
    }
    report(workspace, &outcome)
}

pub fn edit_product(workspace: &Workspace, id: i64, fields: &ProductArgs) -> Result<()> {
    let form = product_form(fields)?;
    let outcome = products::update(
        &workspace.store,
        &workspace.viewer,
        workspace.images_dir(),
        id,
        &form,
    )?;
    if outcome.is_redirect() {
        workspace.save()?;
    }
    report(workspace, &outcome)
}

pub fn delete_product(workspace: &Workspace, id: i64) -> Result<()> {
    let outcome = products::delete(
        &workspace.store,
        &workspace.viewer,
        workspace.images_dir(),
        id,
    )?;
    workspace.save()?;
    report(workspace, &outcome)
}
