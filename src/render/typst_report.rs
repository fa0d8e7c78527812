//! Report renderer backed by Typst templates on disk.
//!
//! The template is plain Typst that reads its values from a `report`
//! dictionary; the renderer prepends that dictionary before compiling.

use std::fs;
use std::path::PathBuf;

use super::common::{escape_typst_string, get_static_dir, is_plain_file_name, report_filename};
use super::engine::TypstRenderEngine;
use super::{RenderError, RenderedDocument, ReportRenderer};
use crate::report::presentation::{CategoryView, ReportView};

pub struct TypstReportRenderer {
    template_dir: PathBuf,
    engine: TypstRenderEngine,
}

impl Default for TypstReportRenderer {
    fn default() -> Self {
        Self::new(get_static_dir(), TypstRenderEngine::default())
    }
}

impl TypstReportRenderer {
    pub fn new(template_dir: impl Into<PathBuf>, engine: TypstRenderEngine) -> Self {
        Self {
            template_dir: template_dir.into(),
            engine,
        }
    }

    pub fn load_template(&self, template_name: &str) -> Result<String, RenderError> {
        if !is_plain_file_name(template_name) {
            return Err(RenderError::TemplateName(template_name.to_string()));
        }
        fs::read_to_string(self.template_dir.join(template_name)).map_err(|source| {
            RenderError::TemplateIo {
                name: template_name.to_string(),
                source,
            }
        })
    }

    /// Full Typst source: data dictionary followed by the template body.
    pub fn build_source(template: &str, view: &ReportView) -> String {
        format!("{}\n{}", data_preamble(view), template)
    }
}

fn category_entry(category: &CategoryView) -> String {
    format!(
        r#"(kg: "{}", percent: "{}")"#,
        escape_typst_string(&category.kg),
        escape_typst_string(&category.percent)
    )
}

fn data_preamble(view: &ReportView) -> String {
    format!(
        r#"#let report = (
  cliente_nome: "{}",
  periodo: "{}",
  data_geracao: "{}",
  total_registros: {},
  peso_total: "{}",
  organico: {},
  reciclavel: {},
  rejeito: {},
)
"#,
        escape_typst_string(&view.cliente_nome),
        escape_typst_string(&view.periodo),
        escape_typst_string(&view.data_geracao),
        view.total_registros,
        escape_typst_string(&view.peso_total),
        category_entry(&view.organico),
        category_entry(&view.reciclavel),
        category_entry(&view.rejeito),
    )
}

impl ReportRenderer for TypstReportRenderer {
    fn render(
        &self,
        template_name: &str,
        view: &ReportView,
    ) -> Result<RenderedDocument, RenderError> {
        let template = self.load_template(template_name)?;
        let source = Self::build_source(&template, view);

        log::debug!(
            "Compiling template {} for '{}' ({} bytes of source)",
            template_name,
            view.cliente_nome,
            source.len()
        );
        let pdf = self.engine.compile(&source)?;

        Ok(RenderedDocument {
            filename: report_filename(&view.cliente_nome, &view.periodo),
            pdf,
        })
    }
}
