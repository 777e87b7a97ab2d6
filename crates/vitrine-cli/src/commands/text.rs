use anyhow::{bail, Result};
use vitrine::FilterRegistry;
use vitrine_validation::{capitalize_proper_noun, format_id as pad_id};

pub fn format_id(id: Option<i64>) -> Result<()> {
    println!("{}", pad_id(id));
    Ok(())
}

pub fn capitalize(text: &str) -> Result<()> {
    println!("{}", capitalize_proper_noun(text));
    Ok(())
}

pub fn filter(name: &str, value: &str) -> Result<()> {
    let registry = FilterRegistry::global();
    match registry.apply(name, value) {
        Some(rendered) => {
            println!("{}", rendered);
            Ok(())
        }
        None => {
            let known: Vec<_> = registry.names().collect();
            bail!("unknown filter '{}' (available: {})", name, known.join(", "))
        }
    }
}
