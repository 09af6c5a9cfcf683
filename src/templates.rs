use std::path::Path;
use tera::Tera;
use tracing::{info, warn};

/// Loads the HTML pages under `dir`. A missing folder gives an empty set so
/// the download endpoint keeps working without the form page.
pub fn load(dir: &Path) -> tera::Result<Tera> {
    if !dir.is_dir() {
        warn!("Page template folder {} not found", dir.display());
        return Ok(Tera::default());
    }

    let tera = Tera::new(&format!("{}/*.html", dir.display()))?;
    info!(
        "Loaded {} page templates from {}",
        tera.get_template_names().count(),
        dir.display()
    );
    Ok(tera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_html_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<p>{{ greeting }}</p>").unwrap();
        std::fs::write(dir.path().join("aiml_template.png"), b"not html").unwrap();

        let tera = load(dir.path()).unwrap();
        let names: Vec<_> = tera.get_template_names().collect();
        assert_eq!(names, vec!["index.html"]);

        let mut ctx = tera::Context::new();
        ctx.insert("greeting", "hi");
        assert_eq!(tera.render("index.html", &ctx).unwrap(), "<p>hi</p>");
    }

    #[test]
    fn missing_folder_gives_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let tera = load(&dir.path().join("nope")).unwrap();
        assert_eq!(tera.get_template_names().count(), 0);
    }
}
