//! Packaged INCAR and sbatch templates
//!
//! Templates ship inside the binary via `include_str!`. INCAR presets are
//! looked up by stem, with or without the `.incar` extension; an unknown
//! name is a hard error listing what is available.

use log::info;

use crate::error::{Error, Result};
use crate::incar::Incar;

const INCAR_TEMPLATES: &[(&str, &str)] = &[
    ("dos", include_str!("../templates/incar/dos.incar")),
    ("relax", include_str!("../templates/incar/relax.incar")),
    ("static", include_str!("../templates/incar/static.incar")),
];

const SBATCH_TEMPLATES: &[(&str, &str)] = &[(
    "example.job",
    include_str!("../templates/sbatch/example.job"),
)];

/// Available INCAR template names (stems, sorted).
pub fn list_incar_templates() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = INCAR_TEMPLATES.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}

/// Load an INCAR template as a parsed document.
pub fn load_incar_template(name: &str) -> Result<Incar> {
    let stem = name.strip_suffix(".incar").unwrap_or(name);

    match INCAR_TEMPLATES.iter().find(|(tmpl, _)| *tmpl == stem) {
        Some((_, text)) => {
            let incar = Incar::from_text(text);
            info!("loaded INCAR template {:?} ({} params)", stem, incar.len());
            Ok(incar)
        }
        None => Err(Error::UnknownTemplate {
            name: name.to_string(),
            available: list_incar_templates().join(", "),
        }),
    }
}

/// Raw text of a packaged sbatch template.
pub fn load_sbatch_template(name: &str) -> Result<&'static str> {
    SBATCH_TEMPLATES
        .iter()
        .find(|(tmpl, _)| *tmpl == name)
        .map(|(_, text)| *text)
        .ok_or_else(|| Error::UnknownTemplate {
            name: name.to_string(),
            available: SBATCH_TEMPLATES
                .iter()
                .map(|(tmpl, _)| *tmpl)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_incar_templates_sorted() {
        assert_eq!(list_incar_templates(), vec!["dos", "relax", "static"]);
    }

    #[test]
    fn test_load_template_with_and_without_extension() {
        let a = load_incar_template("relax").unwrap();
        let b = load_incar_template("relax.incar").unwrap();
        assert_eq!(a.entries(), b.entries());
        assert!(a.contains("IBRION"));
    }

    #[test]
    fn test_unknown_incar_template_lists_available() {
        let err = load_incar_template("bogus").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bogus"));
        assert!(msg.contains("relax"));
    }

    #[test]
    fn test_sbatch_template_has_shebang() {
        let text = load_sbatch_template("example.job").unwrap();
        assert!(text.starts_with("#!/bin/bash"));
    }
}
