//! Build-system `PackageReference` resolver
//!
//! Reads `PackageReference` items from a well-formed MSBuild project and
//! expands `$(Property)` references against the properties the project
//! itself declares. It declines (rather than fails) whenever it cannot give a
//! complete answer, so the caller can fall back to the lenient XML scan.

use super::{
    min_version, ManifestResolver, Resolution, ResolutionError, ResolveRequest, ResolverOutcome,
    Strategy,
};
use crate::model::PackageId;
use roxmltree::{Document, Node};
use std::collections::HashMap;

pub struct ProjectReferenceResolver;

impl ManifestResolver for ProjectReferenceResolver {
    fn strategy(&self) -> Strategy {
        Strategy::ProjectReferences
    }

    fn resolve(&self, request: &ResolveRequest<'_>) -> Result<ResolverOutcome, ResolutionError> {
        let content = request.read_manifest()?;
        let doc = match Document::parse(&content) {
            Ok(doc) => doc,
            Err(e) => return Ok(unresolved(format!("project is not well-formed XML: {}", e))),
        };

        let root = doc.root_element();
        if !root.has_tag_name("Project") {
            return Ok(unresolved(format!(
                "root element is <{}>, not <Project>",
                root.tag_name().name()
            )));
        }

        let properties = declared_properties(root);
        let mut resolution = Resolution::default();

        for item in root.descendants().filter(|n| n.has_tag_name("PackageReference")) {
            let Some(id) = item
                .attribute("Include")
                .or_else(|| item.attribute("Update"))
                .map(str::trim)
                .filter(|id| !id.is_empty())
            else {
                return Ok(unresolved("PackageReference without Include or Update"));
            };

            let declared = item.attribute("Version").map(str::to_string).or_else(|| {
                item.children()
                    .find(|c| c.has_tag_name("Version"))
                    .and_then(|c| c.text())
                    .map(str::to_string)
            });

            let version = match declared {
                Some(raw) => match expand(&raw, &properties) {
                    Some(expanded) => min_version(&expanded),
                    None => {
                        return Ok(unresolved(format!(
                            "version '{}' of {} uses an undeclared property",
                            raw, id
                        )))
                    }
                },
                None => request.registry.latest_version(id),
            };

            match version {
                Some(version) => resolution.add_direct(PackageId::new(id, version)),
                None => return Ok(unresolved(format!("{} declares no version", id))),
            }
        }

        Ok(ResolverOutcome::Resolved(resolution))
    }
}

fn unresolved(reason: impl Into<String>) -> ResolverOutcome {
    ResolverOutcome::Unresolved {
        reason: reason.into(),
    }
}

/// Properties declared in any PropertyGroup; later declarations win.
fn declared_properties(root: Node<'_, '_>) -> HashMap<String, String> {
    root.children()
        .filter(|n| n.has_tag_name("PropertyGroup"))
        .flat_map(|group| group.children().filter(|n| n.is_element()))
        .map(|property| {
            (
                property.tag_name().name().to_string(),
                property.text().unwrap_or("").trim().to_string(),
            )
        })
        .collect()
}

/// Expands `$(Name)` references; `None` when one is not declared.
fn expand(value: &str, properties: &HashMap<String, String>) -> Option<String> {
    let mut result = String::new();
    let mut rest = value;

    while let Some(start) = rest.find("$(") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find(')')?;
        result.push_str(properties.get(&after[..end])?);
        rest = &after[end + 1..];
    }
    result.push_str(rest);

    Some(result)
}
