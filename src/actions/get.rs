//! The `get` command.

use crate::actions::{flag, required_string};
use crate::commands::params::{PARAMETER_FORCE, PARAMETER_RESOURCE_ID, PARAMETER_SAVE_DIR};
use crate::configuration::Configuration;
use crate::error::CliError;
use crate::resolver::ContentMap;
use crate::session::Session;
use clap::ArgMatches;
use color_print::cprintln;
use ptree::TreeBuilder;
use std::path::{Path, PathBuf};
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct GetOptions {
    pub resource_id: String,
    pub save_dir: Option<PathBuf>,
    pub force: bool,
}

impl GetOptions {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, CliError> {
        Ok(Self {
            resource_id: required_string(matches, PARAMETER_RESOURCE_ID)?,
            save_dir: matches.get_one::<PathBuf>(PARAMETER_SAVE_DIR).cloned(),
            force: flag(matches, PARAMETER_FORCE),
        })
    }
}

fn confirm_overwrite(resource_dir: &Path) -> Result<bool, CliError> {
    let answer = inquire::Confirm::new(&format!(
        "{} already exists. Replace it?",
        resource_dir.display()
    ))
    .with_default(false)
    .with_help_message("The local copy is deleted before the download is unpacked")
    .prompt()?;
    Ok(answer)
}

/// Tree of the content files below their content directory
fn content_tree(root: &str, content: &ContentMap) -> ptree::item::StringItem {
    let mut tree = TreeBuilder::new(root.to_string());
    for name in content.keys() {
        tree.add_empty_child(name.clone());
    }
    tree.build()
}

pub async fn get_resource(
    configuration: &Configuration,
    options: GetOptions,
) -> Result<(), CliError> {
    trace!("Executing \"get\" command...");

    let mut session = Session::from_configuration(configuration, options.save_dir).await?;
    let resource_dir = session.download_dir().join(&options.resource_id);
    if resource_dir.exists() && !options.force && !confirm_overwrite(&resource_dir)? {
        println!("Download cancelled");
        return Ok(());
    }

    let resource_dir = session.get_resource(&options.resource_id).await?;
    cprintln!("Resource downloaded to <g>{}</g>", resource_dir.display());

    match session.get_content_path(&options.resource_id) {
        Some(content_path) if !session.content().is_empty() => {
            let tree = content_tree(&content_path.display().to_string(), session.content());
            ptree::print_tree(&tree)?;
        }
        _ => println!("The resource has no content files"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_tree_lists_files_in_order() {
        let mut content = ContentMap::new();
        content.insert("b.csv".to_string(), PathBuf::from("/tmp/b.csv"));
        content.insert("a.txt".to_string(), PathBuf::from("/tmp/a.txt"));

        let tree = content_tree("contents", &content);
        let mut rendered = Vec::new();
        ptree::write_tree(&tree, &mut rendered).unwrap();
        let rendered = String::from_utf8(rendered).unwrap();

        let a = rendered.find("a.txt").unwrap();
        let b = rendered.find("b.csv").unwrap();
        assert!(rendered.starts_with("contents"));
        assert!(a < b);
    }
}
