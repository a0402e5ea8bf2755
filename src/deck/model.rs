use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// CSS Anki uses when a note type brings none.
pub const DEFAULT_CSS: &str = ".card {\n font-family: arial;\n font-size: 20px;\n text-align: center;\n color: black;\n background-color: white;\n}\n";

const LATEX_PRE: &str = "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n";
const LATEX_POST: &str = "\\end{document}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    pub qfmt: &'static str,
    pub afmt: &'static str,
}

/// An Anki note type with a single card template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteModel {
    pub id: i64,
    pub name: &'static str,
    pub fields: &'static [&'static str],
    pub template: Template,
    pub css: Option<&'static str>,
}

pub const IMAGE_MODEL: NoteModel = NoteModel {
    id: 1536607853,
    name: "Chess PGN Image Model",
    fields: &["Current", "Next"],
    template: Template {
        name: "Image Card",
        qfmt: "{{Current}}",
        afmt: "{{Next}}",
    },
    css: None,
};

pub const NOTATION_MODEL: NoteModel = NoteModel {
    id: 1089711253,
    name: "Chess PGN Notation Model",
    fields: &["Current", "Next"],
    template: Template {
        name: "Notation Card",
        qfmt: "{{Current}}",
        afmt: "{{FrontSide}}<hr id='answer'>{{Next}}",
    },
    css: Some(".card {font-family: arial;font-size: 18px;line-height: 120%;text-align: center;}"),
};

#[derive(Serialize)]
struct FieldJson<'a> {
    name: &'a str,
    ord: usize,
    font: &'a str,
    media: [&'a str; 0],
    rtl: bool,
    size: u32,
    sticky: bool,
}

#[derive(Serialize)]
struct TemplateJson<'a> {
    name: &'a str,
    ord: usize,
    qfmt: &'a str,
    afmt: &'a str,
    bqfmt: &'a str,
    bafmt: &'a str,
    did: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelJson<'a> {
    css: &'a str,
    did: i64,
    flds: Vec<FieldJson<'a>>,
    id: String,
    latex_post: &'a str,
    latex_pre: &'a str,
    #[serde(rename = "mod")]
    modified: i64,
    name: &'a str,
    req: Value,
    sortf: usize,
    tags: [&'a str; 0],
    tmpls: Vec<TemplateJson<'a>>,
    #[serde(rename = "type")]
    kind: u8,
    usn: i64,
    vers: [&'a str; 0],
}

impl NoteModel {
    /// Entry of this model in the collection's `models` table column.
    pub fn to_json(&self, deck_id: i64, modified: i64) -> Result<Value> {
        let model = ModelJson {
            css: self.css.unwrap_or(DEFAULT_CSS),
            did: deck_id,
            flds: self
                .fields
                .iter()
                .enumerate()
                .map(|(ord, name)| FieldJson {
                    name,
                    ord,
                    font: "Liberation Sans",
                    media: [],
                    rtl: false,
                    size: 20,
                    sticky: false,
                })
                .collect(),
            id: self.id.to_string(),
            latex_post: LATEX_POST,
            latex_pre: LATEX_PRE,
            modified,
            name: self.name,
            // The question side only needs the first field.
            req: serde_json::json!([[0, "all", [0]]]),
            sortf: 0,
            tags: [],
            tmpls: vec![TemplateJson {
                name: self.template.name,
                ord: 0,
                qfmt: self.template.qfmt,
                afmt: self.template.afmt,
                bqfmt: "",
                bafmt: "",
                did: None,
            }],
            kind: 0,
            usn: -1,
            vers: [],
        };
        Ok(serde_json::to_value(model)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_json() {
        let json = NOTATION_MODEL.to_json(42, 7).unwrap();
        assert_eq!(json["id"], "1089711253");
        assert_eq!(json["did"], 42);
        assert_eq!(json["mod"], 7);
        assert_eq!(json["type"], 0);
        assert_eq!(json["flds"][1]["name"], "Next");
        assert_eq!(json["flds"][1]["ord"], 1);
        assert_eq!(
            json["tmpls"][0]["afmt"],
            "{{FrontSide}}<hr id='answer'>{{Next}}"
        );
        assert!(json["latexPre"].as_str().unwrap().contains("begin{document}"));
    }

    #[test]
    fn test_image_model_uses_default_css() {
        let json = IMAGE_MODEL.to_json(1, 0).unwrap();
        assert_eq!(json["css"], DEFAULT_CSS);
        assert_eq!(json["tmpls"][0]["qfmt"], "{{Current}}");
    }
}
