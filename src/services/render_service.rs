//! MJML + Jinja template rendering pipeline.
//!
//! Templates are `.mjml` files that may contain `{{ variable }}` placeholders.
//! Rendering is a two-step pipeline:
//!
//! 1. Interpolate variables into the MJML source with minijinja
//! 2. Compile the rendered MJML into responsive HTML with mrml
//!
//! Subject lines run through step 1 only.

use std::path::PathBuf;

use minijinja::Environment;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::email::TemplateInfo;

/// Template renderer backed by a directory of `.mjml` files.
///
/// The minijinja environment uses a path loader, so templates are read
/// from disk on first use and cached by the engine afterwards.
pub struct RenderService {
    env: Environment<'static>,
    template_dir: PathBuf,
}

impl RenderService {
    /// Create a renderer for the given template directory.
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        let template_dir = template_dir.into();

        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(&template_dir));

        Self { env, template_dir }
    }

    /// Render a template to responsive HTML.
    ///
    /// # Arguments
    ///
    /// * `name` - Template file name, e.g. `welcome.mjml`
    /// * `variables` - JSON object interpolated into the template
    ///
    /// # Errors
    ///
    /// - `TemplateNotFound` if no such file exists in the template directory
    /// - `TemplateRender` if variable interpolation fails
    /// - `MjmlCompile` if the rendered source is not valid MJML
    pub fn render(&self, name: &str, variables: &Map<String, Value>) -> Result<String, AppError> {
        // Step 1: interpolate variables into the MJML source
        let template = self.env.get_template(name)?;
        let mjml = template.render(minijinja::Value::from_serialize(variables))?;

        // Step 2: compile MJML to HTML
        compile_mjml(&mjml)
    }

    /// Render a subject line with the same variables as the body.
    ///
    /// Subjects without placeholders skip the engine entirely, so plain
    /// subjects never fail on stray Jinja syntax.
    pub fn render_subject(
        &self,
        subject: &str,
        variables: &Map<String, Value>,
    ) -> Result<String, AppError> {
        if !subject.contains('{') {
            return Ok(subject.to_string());
        }

        let rendered = self
            .env
            .render_str(subject, minijinja::Value::from_serialize(variables))?;
        Ok(rendered)
    }

    /// List the `.mjml` templates available in the template directory.
    ///
    /// Entries are sorted by name so the listing is stable.
    pub fn list_templates(&self) -> Result<Vec<TemplateInfo>, AppError> {
        let mut templates = Vec::new();

        for entry in std::fs::read_dir(&self.template_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|ext| ext.to_str()) != Some("mjml") {
                continue;
            }

            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                templates.push(TemplateInfo {
                    name: name.to_string(),
                    size_bytes: entry.metadata()?.len(),
                });
            }
        }

        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }
}

/// Compile MJML source into responsive HTML.
fn compile_mjml(source: &str) -> Result<String, AppError> {
    let parsed = mrml::parse(source).map_err(|err| AppError::MjmlCompile(err.to_string()))?;

    let options = mrml::prelude::render::RenderOptions::default();
    parsed
        .render(&options)
        .map_err(|err| AppError::MjmlCompile(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    const WELCOME: &str = "<mjml><mj-body><mj-section><mj-column>\
        <mj-text>Hello {{ name }}!</mj-text>\
        </mj-column></mj-section></mj-body></mjml>";

    fn template_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mailcourier-test-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("welcome.mjml"), WELCOME).unwrap();
        fs::write(dir.join("notes.txt"), "not a template").unwrap();
        dir
    }

    fn variables(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn cleanup(dir: &Path) {
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn renders_variables_and_compiles_to_html() {
        let dir = template_dir();
        let service = RenderService::new(&dir);

        let html = service
            .render("welcome.mjml", &variables(json!({ "name": "Ada" })))
            .unwrap();

        assert!(html.contains("Hello Ada!"));
        assert!(html.contains("<html"));

        cleanup(&dir);
    }

    #[test]
    fn missing_template_is_not_found() {
        let dir = template_dir();
        let service = RenderService::new(&dir);

        let err = service
            .render("nope.mjml", &Map::new())
            .unwrap_err();
        assert!(matches!(err, AppError::TemplateNotFound(_)));

        cleanup(&dir);
    }

    #[test]
    fn invalid_mjml_is_a_compile_error() {
        let err = compile_mjml("<html>this is not mjml</html>").unwrap_err();
        assert!(matches!(err, AppError::MjmlCompile(_)));
    }

    #[test]
    fn subject_rendering() {
        let dir = template_dir();
        let service = RenderService::new(&dir);
        let vars = variables(json!({ "name": "Grace" }));

        let rendered = service
            .render_subject("Statement for {{ name }}", &vars)
            .unwrap();
        assert_eq!(rendered, "Statement for Grace");

        // Plain subjects bypass the engine
        let plain = service.render_subject("Monthly statement", &vars).unwrap();
        assert_eq!(plain, "Monthly statement");

        cleanup(&dir);
    }

    #[test]
    fn listing_only_includes_mjml_files() {
        let dir = template_dir();
        let service = RenderService::new(&dir);

        let listing = service.list_templates().unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "welcome.mjml");
        assert!(listing[0].size_bytes > 0);

        cleanup(&dir);
    }
}
