use promptly_core::enums::Template;
use promptly_core::templates::preset;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateEntry {
    name: &'static str,
    description: &'static str,
    system_message: &'static str,
}

fn entries() -> Vec<TemplateEntry> {
    Template::ALL
        .into_iter()
        .map(|template| TemplateEntry {
            name: template.as_str(),
            description: template.label(),
            system_message: preset(template),
        })
        .collect()
}

/// Handle `promptly templates`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&entries(), flags.format)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::entries;

    #[test]
    fn lists_every_template_in_menu_order() {
        let names: Vec<&str> = entries().iter().map(|entry| entry.name).collect();
        assert_eq!(
            names,
            vec!["default", "technical_writing", "creative_writing", "academic", "business"]
        );
        assert!(entries().iter().all(|entry| !entry.system_message.is_empty()));
    }
}
