// File: src/flows/products.rs
// Purpose: Product catalog and administrator product management

use super::FlowError;
use crate::form_data::FormData;
use crate::models::{Product, ProductInput};
use crate::outcome::{echo_values, FormOutcome};
use crate::product_image;
use crate::security::Viewer;
use crate::store::ProductStore;
use image::DynamicImage;
use std::path::Path;
use tracing::{debug, info, warn};
use vitrine_validation::{add_error, ErrorMap, FieldRules, Validator};

pub const PRODUCTS_PATH: &str = "/produto";
pub const INSERT_TEMPLATE: &str = "produto/inserir.html";
pub const EDIT_TEMPLATE: &str = "produto/alterar.html";
pub const IMAGE_FIELD: &str = "arquivoImagem";

/// Parse a price typed in a form; both `12.5` and `12,5` are accepted
pub fn parse_price(raw: &str) -> Option<f64> {
    let price: f64 = raw.trim().replace(',', ".").parse().ok()?;
    (price.is_finite() && price >= 0.0).then_some(price)
}

/// Validated product form
struct ProductForm {
    input: Option<ProductInput>,
    image: Option<DynamicImage>,
    errors: ErrorMap,
    nome: String,
    preco: String,
    descricao: String,
}

impl ProductForm {
    /// Fields: `nome`, `preco`, `descricao`, and an optional `arquivoImagem` upload
    fn read(form: &FormData) -> Self {
        let nome = form.value("nome").trim().to_string();
        let preco = form.value("preco").trim().to_string();
        let descricao = form.value("descricao").trim().to_string();

        let mut errors = Validator::new()
            .field("nome", nome.as_str(), FieldRules::new().not_empty())
            .field("preco", preco.as_str(), FieldRules::new().not_empty())
            .field("descricao", descricao.as_str(), FieldRules::new().not_empty())
            .run();

        let price = parse_price(&preco);
        if price.is_none() && !preco.is_empty() {
            add_error("preco", "Preço deve ser um número válido.", &mut errors);
        }

        let image = match form.file(IMAGE_FIELD).map(|f| product_image::decode(&f.content)) {
            Some(Ok(image)) => Some(image),
            Some(Err(err)) => {
                debug!(error = %err, "uploaded product image rejected");
                add_error(IMAGE_FIELD, "Arquivo de imagem inválido.", &mut errors);
                None
            }
            None => None,
        };

        let input = match price {
            Some(price) if errors.is_empty() => Some(ProductInput {
                name: nome.clone(),
                price,
                description: descricao.clone(),
            }),
            _ => None,
        };

        Self {
            input,
            image,
            errors,
            nome,
            preco,
            descricao,
        }
    }

    fn rerender(self, template: &str) -> FormOutcome {
        FormOutcome::rerender(
            template,
            self.errors,
            echo_values(&[
                ("nome", &self.nome),
                ("preco", &self.preco),
                ("descricao", &self.descricao),
            ]),
        )
    }
}

fn not_found(id: i64) -> FlowError {
    FlowError::NotFound {
        entity: "produto",
        id,
    }
}

/// Products shown to any signed-in user
pub fn catalog<S: ProductStore + ?Sized>(
    store: &S,
    viewer: &Viewer,
) -> Result<Vec<Product>, FlowError> {
    viewer.require_authenticated()?;
    Ok(store.all_products()?)
}

pub fn list<S: ProductStore + ?Sized>(
    store: &S,
    viewer: &Viewer,
) -> Result<Vec<Product>, FlowError> {
    viewer.require_admin()?;
    Ok(store.all_products()?)
}

pub fn get<S: ProductStore + ?Sized>(
    store: &S,
    viewer: &Viewer,
    id: i64,
) -> Result<Product, FlowError> {
    viewer.require_admin()?;
    store.product_by_id(id)?.ok_or_else(|| not_found(id))
}

/// POST /produto/inserir
pub fn insert<S: ProductStore + ?Sized>(
    store: &S,
    viewer: &Viewer,
    images_dir: &Path,
    form: &FormData,
) -> Result<FormOutcome, FlowError> {
    let admin = viewer.require_admin()?;
    let mut product_form = ProductForm::read(form);

    let Some(input) = product_form.input.take() else {
        return Ok(product_form.rerender(INSERT_TEMPLATE));
    };

    // the id is only known after insertion, so a failed image write undoes it
    let product = store.insert_product(input)?;
    if let Some(image) = &product_form.image {
        if let Err(err) = product_image::save_square_jpeg(image, images_dir, product.id) {
            warn!(product_id = product.id, error = %err, "product image not stored, insert undone");
            store.delete_product(product.id)?;
            return Err(err.into());
        }
    }
    info!(admin_id = admin.id, product_id = product.id, "product inserted");

    Ok(FormOutcome::redirect(
        PRODUCTS_PATH,
        "Produto inserido com sucesso!",
    ))
}

/// POST /produto/alterar/{id}
///
/// The stored image is only replaced when a new file was uploaded.
pub fn update<S: ProductStore + ?Sized>(
    store: &S,
    viewer: &Viewer,
    images_dir: &Path,
    id: i64,
    form: &FormData,
) -> Result<FormOutcome, FlowError> {
    let admin = viewer.require_admin()?;
    if store.product_by_id(id)?.is_none() {
        return Err(not_found(id));
    }

    let mut product_form = ProductForm::read(form);
    let Some(input) = product_form.input.take() else {
        return Ok(product_form.rerender(EDIT_TEMPLATE));
    };

    // image first: a failed write leaves the record untouched
    if let Some(image) = &product_form.image {
        product_image::save_square_jpeg(image, images_dir, id)?;
    }
    if !store.update_product(&input.into_product(id))? {
        return Err(not_found(id));
    }
    info!(admin_id = admin.id, product_id = id, "product updated");

    Ok(FormOutcome::redirect(
        PRODUCTS_PATH,
        "Produto alterado com sucesso!",
    ))
}

/// GET /produto/excluir/{id}
pub fn delete<S: ProductStore + ?Sized>(
    store: &S,
    viewer: &Viewer,
    images_dir: &Path,
    id: i64,
) -> Result<FormOutcome, FlowError> {
    let admin = viewer.require_admin()?;
    if !store.delete_product(id)? {
        return Err(not_found(id));
    }

    let removed_image = product_image::remove_product_image(images_dir, id)?;
    info!(admin_id = admin.id, product_id = id, removed_image, "product deleted");

    Ok(FormOutcome::redirect(
        PRODUCTS_PATH,
        "Produto excluído com sucesso!",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form_data::UploadedFile;
    use crate::memory::MemoryStore;
    use crate::models::User;
    use crate::security::AccessError;
    use image::{ImageFormat, Rgb, RgbImage};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;

    fn viewer(admin: bool) -> Viewer {
        Viewer::authenticated(User {
            id: 2,
            name: "Bruno Lima".to_string(),
            email: "bruno@example.com".to_string(),
            password_hash: String::new(),
            token: None,
            admin,
        })
    }

    fn product_form(nome: &str, preco: &str, descricao: &str) -> FormData {
        FormData::new()
            .with("nome", nome)
            .with("preco", preco)
            .with("descricao", descricao)
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([0, 90, 200])))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[rstest]
    #[case("12.50", Some(12.5))]
    #[case(" 12,50 ", Some(12.5))]
    #[case("0", Some(0.0))]
    #[case("-1", None)]
    #[case("abc", None)]
    #[case("NaN", None)]
    #[case("inf", None)]
    #[case("", None)]
    fn test_parse_price(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_price(raw), expected);
    }

    #[test]
    fn test_catalog_requires_login_only() {
        let store = MemoryStore::new();
        assert!(catalog(&store, &viewer(false)).unwrap().is_empty());
        assert!(matches!(
            catalog(&store, &Viewer::anonymous()),
            Err(FlowError::Access(AccessError::Unauthorized))
        ));
        assert!(matches!(
            list(&store, &viewer(false)),
            Err(FlowError::Access(AccessError::Forbidden))
        ));
    }

    #[test]
    fn test_insert_with_image() {
        let store = MemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        let form = product_form(" Caneca ", "19,90", "Caneca de cerâmica")
            .with_file(IMAGE_FIELD, UploadedFile::new("caneca.png", png(40, 20)));

        let outcome = insert(&store, &viewer(true), dir.path(), &form).unwrap();
        assert_eq!(
            outcome.as_redirect().unwrap().message.as_deref(),
            Some("Produto inserido com sucesso!")
        );

        let product = get(&store, &viewer(true), 1).unwrap();
        assert_eq!(product.name, "Caneca");
        assert_eq!(product.price, 19.9);

        let stored = image::open(dir.path().join("0001.jpg")).unwrap();
        assert_eq!((stored.width(), stored.height()), (20, 20));
    }

    #[test]
    fn test_insert_invalid_rerenders() {
        let store = MemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        let form = product_form("", "doze", " ")
            .with_file(IMAGE_FIELD, UploadedFile::new("x.png", b"nope".to_vec()));

        let outcome = insert(&store, &viewer(true), dir.path(), &form).unwrap();
        match outcome {
            FormOutcome::Rerender {
                template,
                errors,
                values,
            } => {
                assert_eq!(template, INSERT_TEMPLATE);
                assert_eq!(
                    errors.fields().collect::<Vec<_>>(),
                    vec!["nome", "descricao", "preco", IMAGE_FIELD]
                );
                assert_eq!(errors.first("preco"), Some("Preço deve ser um número válido."));
                assert_eq!(values.get("preco").map(String::as_str), Some("doze"));
            }
            FormOutcome::Redirect(_) => panic!("expected rerender"),
        }
        assert!(store.all_products().unwrap().is_empty());
    }

    #[test]
    fn test_empty_price_reports_required_only() {
        let store = MemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        let outcome = insert(&store, &viewer(true), dir.path(), &product_form("Caneca", "", "x"))
            .unwrap();
        assert_eq!(outcome.errors().unwrap().get("preco").map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_update_keeps_image_without_upload() {
        let store = MemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        let admin = viewer(true);
        let form = product_form("Caneca", "10", "Azul")
            .with_file(IMAGE_FIELD, UploadedFile::new("c.png", png(8, 8)));
        insert(&store, &admin, dir.path(), &form).unwrap();

        let outcome = update(
            &store,
            &admin,
            dir.path(),
            1,
            &product_form("Caneca Grande", "12.5", "Azul"),
        )
        .unwrap();
        assert!(outcome.is_redirect());
        assert_eq!(get(&store, &admin, 1).unwrap().name, "Caneca Grande");
        assert!(dir.path().join("0001.jpg").exists());

        let outcome = update(&store, &admin, dir.path(), 1, &product_form("", "1", "x")).unwrap();
        assert!(!outcome.is_redirect());
        assert_eq!(
            update(&store, &admin, dir.path(), 7, &product_form("a", "1", "b"))
                .unwrap_err()
                .status_code(),
            404
        );
    }

    /// A directory path that cannot be created because a file sits in the way
    fn unwritable_images_dir(root: &Path) -> std::path::PathBuf {
        let blocker = root.join("blocker");
        std::fs::write(&blocker, b"file").unwrap();
        blocker.join("img")
    }

    #[test]
    fn test_insert_image_failure_leaves_store_unchanged() {
        let store = MemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        let images = unwritable_images_dir(dir.path());
        let form = product_form("Caneca", "10", "Azul")
            .with_file(IMAGE_FIELD, UploadedFile::new("c.png", png(8, 8)));

        let err = insert(&store, &viewer(true), &images, &form).unwrap_err();
        assert!(matches!(err, FlowError::Image(_)));
        assert_eq!(err.status_code(), 500);
        assert!(store.all_products().unwrap().is_empty());
    }

    #[test]
    fn test_update_image_failure_leaves_record_unchanged() {
        let store = MemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        let admin = viewer(true);
        insert(&store, &admin, dir.path(), &product_form("Caneca", "10", "Azul")).unwrap();

        let images = unwritable_images_dir(dir.path());
        let form = product_form("Caneca Grande", "12", "Verde")
            .with_file(IMAGE_FIELD, UploadedFile::new("c.png", png(8, 8)));
        let err = update(&store, &admin, &images, 1, &form).unwrap_err();
        assert!(matches!(err, FlowError::Image(_)));

        let stored = get(&store, &admin, 1).unwrap();
        assert_eq!(stored.name, "Caneca");
        assert_eq!(stored.price, 10.0);
    }

    #[test]
    fn test_delete_removes_image() {
        let store = MemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        let admin = viewer(true);
        let form = product_form("Caneca", "10", "Azul")
            .with_file(IMAGE_FIELD, UploadedFile::new("c.png", png(8, 8)));
        insert(&store, &admin, dir.path(), &form).unwrap();

        let outcome = delete(&store, &admin, dir.path(), 1).unwrap();
        assert_eq!(
            outcome.as_redirect().unwrap().message.as_deref(),
            Some("Produto excluído com sucesso!")
        );
        assert!(!dir.path().join("0001.jpg").exists());
        assert!(matches!(
            delete(&store, &admin, dir.path(), 1),
            Err(FlowError::NotFound { id: 1, .. })
        ));
    }
}
