//! Shared fixtures for integration tests
//!
//! A [`Workspace`] is a temporary directory holding a solution and its
//! projects on the real filesystem.

#![allow(dead_code)]

use nuget_inspector::{InspectionContext, InspectionOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CSHARP_PROJECT_TYPE: &str = "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}";
pub const SOLUTION_FOLDER_TYPE: &str = "{2150E333-8FDC-42A3-9474-1A3956D46DE8}";

pub struct Workspace {
    dir: TempDir,
    solution_lines: Vec<String>,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            solution_lines: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Adds a `Project(...)` entry to the solution; `relative_path` uses
    /// Windows separators as Visual Studio writes them.
    pub fn member(&mut self, name: &str, relative_path: &str, guid: &str) -> &mut Self {
        self.entry(CSHARP_PROJECT_TYPE, name, relative_path, guid)
    }

    pub fn folder(&mut self, name: &str, guid: &str) -> &mut Self {
        self.entry(SOLUTION_FOLDER_TYPE, name, name, guid)
    }

    fn entry(&mut self, type_guid: &str, name: &str, relative_path: &str, guid: &str) -> &mut Self {
        self.solution_lines.push(format!(
            "Project(\"{}\") = \"{}\", \"{}\", \"{}\"\r\nEndProject\r\n",
            type_guid, name, relative_path, guid
        ));
        self
    }

    /// Writes the accumulated entries as `<name>.sln` in the root.
    pub fn write_solution(&self, name: &str) -> PathBuf {
        let content = format!(
            "\u{feff}\r\nMicrosoft Visual Studio Solution File, Format Version 12.00\r\n\
             # Visual Studio Version 17\r\n{}Global\r\nEndGlobal\r\n",
            self.solution_lines.concat()
        );
        self.write(&format!("{}.sln", name), &content)
    }

    pub fn options(&self, target: &Path) -> InspectionOptions {
        InspectionOptions {
            output_directory: Some(self.path("out")),
            ..InspectionOptions::for_target(target)
        }
    }
}

pub fn context() -> InspectionContext {
    InspectionContext::for_options(&InspectionOptions::default())
}

pub fn sdk_project(packages: &[(&str, &str)]) -> String {
    let references: String = packages
        .iter()
        .map(|(id, version)| {
            format!(
                "    <PackageReference Include=\"{}\" Version=\"{}\" />\n",
                id, version
            )
        })
        .collect();
    format!(
        "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <PropertyGroup>\n    <TargetFramework>net8.0</TargetFramework>\n  </PropertyGroup>\n  <ItemGroup>\n{}  </ItemGroup>\n</Project>\n",
        references
    )
}

pub fn packages_config(packages: &[(&str, &str)]) -> String {
    let entries: String = packages
        .iter()
        .map(|(id, version)| {
            format!(
                "  <package id=\"{}\" version=\"{}\" targetFramework=\"net48\" />\n",
                id, version
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<packages>\n{}</packages>\n",
        entries
    )
}

pub const LEGACY_PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="15.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup Condition=" '$(Configuration)|$(Platform)' == 'Debug|AnyCPU' ">
    <OutputPath>bin\Debug\</OutputPath>
  </PropertyGroup>
  <PropertyGroup Condition=" '$(Configuration)|$(Platform)' == 'Release|AnyCPU' ">
    <OutputPath>bin\Release\</OutputPath>
  </PropertyGroup>
</Project>
"#;
