//! Lenient project-file scan
//!
//! Last resort when the build-system reader declines. Works on plain text so
//! it tolerates projects that are not well-formed XML, and additionally
//! picks up legacy `<Reference Include="Name, Version=...">` items and the
//! project's own `<Version>` property.

use super::{
    min_version, ManifestResolver, Resolution, ResolutionError, ResolveRequest, ResolverOutcome,
    Strategy,
};
use crate::model::PackageId;
use regex::Regex;
use tracing::warn;

pub struct ProjectXmlResolver;

struct Patterns {
    package_reference: Regex,
    attribute: Regex,
    version_element: Regex,
    legacy_reference: Regex,
    property_group: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            package_reference: Regex::new(
                r"(?s)<PackageReference\b([^>]*?)(?:/>|>(.*?)</PackageReference\s*>)",
            )?,
            attribute: Regex::new(r#"(\w+)\s*=\s*"([^"]*)""#)?,
            version_element: Regex::new(r"<Version>\s*([^<]*?)\s*</Version>")?,
            legacy_reference: Regex::new(r#"<Reference\s+Include\s*=\s*"([^"]+)""#)?,
            property_group: Regex::new(r"(?s)<PropertyGroup\b[^>]*>(.*?)</PropertyGroup\s*>")?,
        })
    }
}

impl ManifestResolver for ProjectXmlResolver {
    fn strategy(&self) -> Strategy {
        Strategy::ProjectXml
    }

    fn resolve(&self, request: &ResolveRequest<'_>) -> Result<ResolverOutcome, ResolutionError> {
        let content = request.read_manifest()?;
        let patterns = Patterns::compile().map_err(|e| request.malformed(e.to_string()))?;
        let mut resolution = Resolution::default();

        for caps in patterns.package_reference.captures_iter(&content) {
            let attributes = &caps[1];
            let mut id = None;
            let mut version = None;
            for attr in patterns.attribute.captures_iter(attributes) {
                match &attr[1] {
                    "Include" | "Update" if id.is_none() => id = Some(attr[2].trim().to_string()),
                    "Version" => version = min_version(&attr[2]).filter(|v| !v.contains("$(")),
                    _ => {}
                }
            }
            if version.is_none() {
                version = caps
                    .get(2)
                    .and_then(|body| patterns.version_element.captures(body.as_str()))
                    .and_then(|v| min_version(&v[1]));
            }

            let Some(id) = id.filter(|id| !id.is_empty()) else {
                continue;
            };
            match version.or_else(|| request.registry.latest_version(&id)) {
                Some(version) => resolution.add_direct(PackageId::new(id, version)),
                None => warn!(project = request.project_name, package = %id, "Skipping reference without a version"),
            }
        }

        for caps in patterns.legacy_reference.captures_iter(&content) {
            if let Some(package) = parse_assembly_reference(&caps[1]) {
                resolution.add_direct(package);
            }
        }

        resolution.project_version = patterns
            .property_group
            .captures_iter(&content)
            .filter_map(|group| {
                patterns
                    .version_element
                    .captures(group.get(1).map_or("", |m| m.as_str()))
                    .map(|v| v[1].to_string())
            })
            .filter(|v| !v.is_empty() && !v.contains("$("))
            .last();

        Ok(ResolverOutcome::Resolved(resolution))
    }
}

/// `Name, Version=1.2.3.4, Culture=neutral` → `Name/1.2.3.4`; framework
/// references without a version yield `None`.
fn parse_assembly_reference(include: &str) -> Option<PackageId> {
    let mut parts = include.split(',').map(str::trim);
    let name = parts.next().filter(|n| !n.is_empty())?;
    let version = parts.find_map(|part| {
        part.strip_prefix("Version=")
            .map(str::trim)
            .filter(|v| !v.is_empty())
    })?;
    Some(PackageId::new(name, version))
}
