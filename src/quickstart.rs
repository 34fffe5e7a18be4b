//! Quickstart form view synchronizer
//!
//! The quickstart page shows a project-setup form and, derived from it, a
//! ready-to-paste command line plus a set of explanatory template sections.
//! `synchronize` is the pure center: form state in, render plan out. The
//! page renderer applies the plan to a pristine template on every request,
//! so no stale visibility can survive between invocations.

use crate::classes::ClassSet;
use crate::html::{document, Element};
use serde::Deserialize;

/// The optional fields a quickstart form can carry, in no particular order.
/// Each page variant decides which fields it reads and in what order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Assets,
    Patch,
    Textures,
    Maps,
    Scm,
    Run,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Assets => "assets",
            Field::Patch => "patch",
            Field::Textures => "textures",
            Field::Maps => "maps",
            Field::Scm => "scm",
            Field::Run => "run",
        }
    }
}

/// A snapshot of the form: every field is an optional string, where the
/// empty string means absent. Unknown or unreadable input never fails;
/// it just contributes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormState {
    pub project: String,
    pub assets: String,
    pub patch: String,
    pub textures: String,
    pub maps: String,
    pub scm: String,
    pub run: String,
}

impl FormState {
    /// Parse a submitted query string. Malformed input yields the default
    /// (all-absent) state rather than an error.
    pub fn from_query(query: &str) -> Self {
        serde_urlencoded::from_str(query).unwrap_or_default()
    }

    /// A field's value, or `None` when absent (empty).
    pub fn value(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Assets => &self.assets,
            Field::Patch => &self.patch,
            Field::Textures => &self.textures,
            Field::Maps => &self.maps,
            Field::Scm => &self.scm,
            Field::Run => &self.run,
        };
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// The fixed rule set of one quickstart page: which fields feed the
/// command line and in what order, which fields drive section visibility
/// (possibly a superset of the command fields), how tokens are joined,
/// and the program name shown in the preview.
#[derive(Debug, Clone)]
pub struct PageVariant {
    pub program: String,
    pub command_fields: Vec<Field>,
    pub section_fields: Vec<Field>,
    pub separator: String,
}

impl PageVariant {
    /// The canonical variant shipped with the site.
    pub fn standard(program: &str) -> Self {
        let fields = vec![
            Field::Assets,
            Field::Patch,
            Field::Textures,
            Field::Maps,
            Field::Scm,
            Field::Run,
        ];
        Self {
            program: program.to_string(),
            command_fields: fields.clone(),
            section_fields: fields,
            separator: " ".to_string(),
        }
    }
}

/// What the page must show for a given form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    /// Project name as displayed in the command preview.
    pub command_name: String,
    /// Present field values joined in variant order.
    pub command_args: String,
    /// The ordered token list behind `command_args`.
    pub tokens: Vec<String>,
    /// Section classes to mark visible; recomputed from scratch.
    pub visible_sections: ClassSet,
}

impl RenderPlan {
    /// The full command line: program, name, then the argument tokens.
    pub fn command_line(&self, program: &str) -> String {
        let mut line = format!("{} {}", program, self.command_name);
        if !self.command_args.is_empty() {
            line.push(' ');
            line.push_str(&self.command_args);
        }
        line
    }
}

/// Display form of the project name: quoted when empty or containing a
/// space, verbatim otherwise. This mirrors how the name would be typed on
/// a command line; quote characters inside the value are left alone
/// (display rule, not shell escaping).
pub fn quote_project_name(raw: &str) -> String {
    if raw.is_empty() || raw.contains(' ') {
        format!("\"{}\"", raw)
    } else {
        raw.to_string()
    }
}

/// Derive the render plan for one form snapshot.
///
/// Pure and total: every combination of present and absent fields maps to
/// exactly one plan, and calling it twice with the same state yields the
/// same plan.
pub fn synchronize(variant: &PageVariant, form: &FormState) -> RenderPlan {
    let mut tokens = Vec::new();
    for &field in &variant.command_fields {
        if let Some(value) = form.value(field) {
            tokens.push(value.to_string());
        }
    }

    let command_name = quote_project_name(&form.project);
    let command_args = tokens.join(&variant.separator);

    // Visibility derives from the section fields, which may not coincide
    // with the command fields. Start empty every time.
    let mut visible_sections = ClassSet::new();
    let section_tokens: Vec<&str> = variant
        .section_fields
        .iter()
        .filter_map(|&field| form.value(field))
        .collect();
    if !section_tokens.is_empty() {
        visible_sections.add("section-all");
        for token in &section_tokens {
            visible_sections.add(&format!("section-{}", token));
        }
    }

    RenderPlan {
        command_name,
        command_args,
        tokens,
        visible_sections,
    }
}

/// One explanatory block on the page, keyed by the form value that
/// reveals it.
#[derive(Debug, Clone)]
pub struct SectionDef {
    pub token: String,
    pub title: String,
    pub body: String,
}

impl SectionDef {
    pub fn new(token: &str, title: &str, body: &str) -> Self {
        Self {
            token: token.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}

/// The quickstart page handle: variant rules plus the section templates,
/// resolved once at setup. Rendering never looks anything up by name at
/// request time.
#[derive(Debug, Clone)]
pub struct QuickstartPage {
    pub variant: PageVariant,
    pub sections: Vec<SectionDef>,
}

impl QuickstartPage {
    /// The canonical page: standard variant, one section per form value
    /// the canonical form can submit.
    pub fn standard(program: &str) -> Self {
        Self {
            variant: PageVariant::standard(program),
            sections: vec![
                SectionDef::new(
                    "assets",
                    "Asset tree",
                    "Adds an asset directory tree and build targets for converting raw assets.",
                ),
                SectionDef::new(
                    "patch",
                    "Patch data",
                    "Adds a patch source directory and targets for compiling it into the project.",
                ),
                SectionDef::new(
                    "textures",
                    "Texture set",
                    "Adds texture source directories and targets for assembling the texture set.",
                ),
                SectionDef::new(
                    "maps",
                    "Maps",
                    "Adds a map source directory and targets for merging maps into the build.",
                ),
                SectionDef::new(
                    "git",
                    "Git repository",
                    "Initializes a Git repository with an ignore file suited to the project layout.",
                ),
                SectionDef::new(
                    "run",
                    "Run target",
                    "Adds a run target for launching the built project locally.",
                ),
            ],
        }
    }

    /// Render the whole page for one form snapshot.
    pub fn render(&self, form: &FormState) -> String {
        let plan = synchronize(&self.variant, form);
        let mut body = String::new();

        body.push_str(&Element::new("h1").text("Quickstart").render());
        body.push_str(&self.render_form(form).render());
        body.push_str(
            &Element::new("p")
                .attr("id", "command-preview")
                .attr("class", "command-preview")
                .text(&plan.command_line(&self.variant.program))
                .render(),
        );
        body.push_str(&self.render_sections(&plan));

        document("Quickstart", &body)
    }

    fn render_form(&self, form: &FormState) -> Element {
        let mut name_input = Element::new("input")
            .attr("type", "text")
            .attr("id", "project-name")
            .attr("name", "project")
            .attr("value", &form.project);
        if form.project.is_empty() {
            name_input = name_input.attr("placeholder", "MyProject");
        }

        let mut el = Element::new("form")
            .attr("id", "project-form")
            .attr("method", "get")
            .attr("action", "/quickstart")
            .child(
                Element::new("label")
                    .attr("for", "project-name")
                    .text("Project name"),
            )
            .child(name_input);

        for (field, value, label) in [
            (Field::Assets, "assets", "Asset conversion"),
            (Field::Patch, "patch", "Patch data"),
            (Field::Textures, "textures", "Texture set"),
            (Field::Maps, "maps", "Maps"),
            (Field::Run, "run", "Run target"),
        ] {
            let mut checkbox = Element::new("input")
                .attr("type", "checkbox")
                .attr("name", field.name())
                .attr("value", value);
            if form.value(field) == Some(value) {
                checkbox = checkbox.attr("checked", "checked");
            }
            el = el.child(Element::new("label").child(checkbox).text(label));
        }

        let mut git_option = Element::new("option").attr("value", "git").text("Git");
        if form.scm == "git" {
            git_option = git_option.attr("selected", "selected");
        }
        el = el.child(
            Element::new("label")
                .text("Version control")
                .child(
                    Element::new("select")
                        .attr("name", "scm")
                        .child(Element::new("option").attr("value", "").text("None"))
                        .child(git_option),
                ),
        );

        el.child(
            Element::new("button")
                .attr("type", "submit")
                .text("Update"),
        )
    }

    fn render_sections(&self, plan: &RenderPlan) -> String {
        let mut out = String::new();

        let mut all_classes = ClassSet::parse("template-section section-all");
        if plan.visible_sections.contains("section-all") {
            all_classes.add("visible-section");
        }
        out.push_str(
            &Element::new("div")
                .class(&all_classes)
                .child(Element::new("h2").text("Your project will include:"))
                .render(),
        );

        for section in &self.sections {
            let marker = format!("section-{}", section.token);
            let mut classes = ClassSet::parse("template-section");
            classes.add(&marker);
            if plan.visible_sections.contains(&marker) {
                classes.add("visible-section");
            }
            out.push_str(
                &Element::new("div")
                    .class(&classes)
                    .child(Element::new("h3").text(&section.title))
                    .child(Element::new("p").text(&section.body))
                    .render(),
            );
        }
        out
    }
}
