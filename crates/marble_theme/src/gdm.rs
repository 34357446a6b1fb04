//! GDM (login screen) theme
//!
//! GNOME Shell reads the login screen theme from a single gresource bundle.
//! Installing replaces that bundle with one rebuilt from the stock contents
//! plus an installed Marble theme; the stock bundle is kept as `.backup` and
//! restored on removal. Writing to the shell directory needs root.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Result, ThemeError};
use crate::installer::{InstallRequest, ThemeInstaller};
use crate::workspace::{copy_tree, Workspace};

/// Default GNOME Shell data directory
pub const DEFAULT_SHELL_DIR: &str = "/usr/share/gnome-shell";
/// Bundle file name inside the shell directory
pub const GRESOURCE_NAME: &str = "gnome-shell-theme.gresource";
/// Resource prefix of the shell theme inside the bundle
pub const RESOURCE_PREFIX: &str = "/org/gnome/shell/theme";

/// Access to the GLib resource tools
pub trait GresourceTool {
    /// Resource paths stored in `bundle`
    fn list(&self, bundle: &Path) -> Result<Vec<String>>;

    /// Raw bytes of one resource
    fn extract(&self, bundle: &Path, resource: &str) -> Result<Vec<u8>>;

    /// Compile `manifest` with files from `source_dir` into `target`
    fn compile(&self, manifest: &Path, source_dir: &Path, target: &Path) -> Result<()>;
}

/// Runs `gresource` and `glib-compile-resources` from `PATH`
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemGresource;

impl SystemGresource {
    fn run(program: &str, args: &[&OsStr]) -> Result<Vec<u8>> {
        debug!(program, ?args, "running");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| ThemeError::Gresource(format!("failed to run {program}: {e}")))?;

        if !output.status.success() {
            return Err(ThemeError::Gresource(format!(
                "{program} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(output.stdout)
    }
}

impl GresourceTool for SystemGresource {
    fn list(&self, bundle: &Path) -> Result<Vec<String>> {
        let stdout = Self::run("gresource", &[OsStr::new("list"), bundle.as_os_str()])?;
        Ok(String::from_utf8_lossy(&stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn extract(&self, bundle: &Path, resource: &str) -> Result<Vec<u8>> {
        Self::run(
            "gresource",
            &[OsStr::new("extract"), bundle.as_os_str(), OsStr::new(resource)],
        )
    }

    fn compile(&self, manifest: &Path, source_dir: &Path, target: &Path) -> Result<()> {
        let mut sourcedir = OsString::from("--sourcedir=");
        sourcedir.push(source_dir);
        let mut target_arg = OsString::from("--target=");
        target_arg.push(target);

        Self::run(
            "glib-compile-resources",
            &[sourcedir.as_os_str(), target_arg.as_os_str(), manifest.as_os_str()],
        )
        .map(|_| ())
    }
}

/// Login screen theme installer
#[derive(Debug)]
pub struct GlobalTheme<T: GresourceTool> {
    shell_dir: PathBuf,
    gresource: String,
    tool: T,
}

impl<T: GresourceTool> GlobalTheme<T> {
    pub fn new(shell_dir: impl Into<PathBuf>, tool: T) -> Self {
        Self {
            shell_dir: shell_dir.into(),
            gresource: GRESOURCE_NAME.to_string(),
            tool,
        }
    }

    /// Use a different bundle file name
    pub fn with_gresource(mut self, name: impl Into<String>) -> Self {
        self.gresource = name.into();
        self
    }

    pub fn gresource_path(&self) -> PathBuf {
        self.shell_dir.join(&self.gresource)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.shell_dir.join(format!("{}.backup", self.gresource))
    }

    /// Install the first request into the login screen bundle
    ///
    /// Later requests are ignored; the bundle holds a single theme.
    pub fn install(
        &self,
        installer: &ThemeInstaller<'_>,
        requests: &[InstallRequest],
        workspace: &Workspace,
    ) -> Result<()> {
        let request = requests.first().ok_or(ThemeError::NothingRequested)?;
        if requests.len() > 1 {
            debug!(ignored = requests.len() - 1, "GDM theme takes a single request");
        }

        self.ensure_backup()?;

        let extracted = workspace.join("gdm-extracted");
        self.extract_stock(&extracted)?;

        let theme_dir = workspace.join("gdm-theme");
        installer.install_to(request, &theme_dir)?;
        let stylesheet_name = format!("{}.css", installer.template().theme_type());
        let stylesheet = theme_dir.join(&stylesheet_name);
        merge_theme(&theme_dir, &stylesheet, &extracted)?;

        let manifest = workspace.join(format!("{}.xml", self.gresource));
        let xml = gresource_manifest(&extracted)?;
        fs::write(&manifest, xml).map_err(|e| ThemeError::io("Failed to write", &manifest, e))?;

        self.tool
            .compile(&manifest, &extracted, &self.gresource_path())?;

        info!(theme = %request.name(), bundle = %self.gresource_path().display(), "GDM theme installed");
        Ok(())
    }

    /// Restore the stock bundle
    ///
    /// Returns `false` when there is no backup to restore.
    pub fn remove(&self) -> Result<bool> {
        let backup = self.backup_path();
        if !backup.exists() {
            return Ok(false);
        }

        let target = self.gresource_path();
        fs::copy(&backup, &target).map_err(|e| ThemeError::io("Failed to restore", &target, e))?;
        fs::remove_file(&backup).map_err(|e| ThemeError::io("Failed to remove", &backup, e))?;
        info!(bundle = %target.display(), "GDM theme restored");
        Ok(true)
    }

    fn ensure_backup(&self) -> Result<()> {
        let backup = self.backup_path();
        if backup.exists() {
            return Ok(());
        }

        let original = self.gresource_path();
        fs::copy(&original, &backup).map_err(|e| ThemeError::io("Failed to back up", &original, e))?;
        debug!(backup = %backup.display(), "backed up stock bundle");
        Ok(())
    }

    fn extract_stock(&self, into: &Path) -> Result<()> {
        let backup = self.backup_path();
        let prefix = format!("{RESOURCE_PREFIX}/");

        for resource in self.tool.list(&backup)? {
            let Some(relative) = resource.strip_prefix(&prefix) else {
                continue;
            };
            let target = into.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| ThemeError::io("Failed to create", parent, e))?;
            }
            let bytes = self.tool.extract(&backup, &resource)?;
            fs::write(&target, bytes).map_err(|e| ThemeError::io("Failed to write", &target, e))?;
        }

        Ok(())
    }
}

/// Copy the theme over the extracted bundle and replace every shell
/// stylesheet variant with the theme stylesheet
fn merge_theme(theme_dir: &Path, stylesheet: &Path, extracted: &Path) -> Result<()> {
    copy_tree(theme_dir, extracted)?;

    let entries = fs::read_dir(extracted).map_err(|e| ThemeError::io("Failed to list", extracted, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ThemeError::io("Failed to list", extracted, e))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("gnome-shell") && name.ends_with(".css") {
            let target = entry.path();
            fs::copy(stylesheet, &target).map_err(|e| ThemeError::io("Failed to copy", stylesheet, e))?;
        }
    }

    Ok(())
}

/// `.gresource.xml` listing every file below `root`
fn gresource_manifest(root: &Path) -> Result<String> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| ThemeError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<gresources>\n");
    xml.push_str(&format!("  <gresource prefix=\"{RESOURCE_PREFIX}\">\n"));
    for file in files {
        xml.push_str(&format!("    <file>{}</file>\n", escape_xml(&file)));
    }
    xml.push_str("  </gresource>\n</gresources>\n");
    Ok(xml)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    use crate::schema::ColorSchema;
    use crate::template::TemplateBuilder;

    /// In-memory stand-in for the GLib tools
    #[derive(Default)]
    struct FakeTool {
        resources: BTreeMap<String, Vec<u8>>,
        compiled: RefCell<Option<(String, Vec<String>)>>,
    }

    impl GresourceTool for FakeTool {
        fn list(&self, _bundle: &Path) -> Result<Vec<String>> {
            Ok(self.resources.keys().cloned().collect())
        }

        fn extract(&self, _bundle: &Path, resource: &str) -> Result<Vec<u8>> {
            Ok(self.resources[resource].clone())
        }

        fn compile(&self, manifest: &Path, source_dir: &Path, target: &Path) -> Result<()> {
            let xml = fs::read_to_string(manifest).unwrap();
            let css = fs::read_to_string(source_dir.join("gnome-shell-dark.css")).unwrap();
            fs::write(target, b"compiled").unwrap();
            *self.compiled.borrow_mut() = Some((xml, vec![css]));
            Ok(())
        }
    }

    fn fixture() -> (tempfile::TempDir, ColorSchema) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("theme/gnome-shell");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(dir.path().join("theme/gnome-shell_css")).unwrap();
        fs::write(
            dir.path().join("theme/gnome-shell_css/main.css"),
            "#lockDialogGroup { background: @base; color: @accent-color; }",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("shell")).unwrap();
        fs::write(dir.path().join("shell").join(GRESOURCE_NAME), b"stock").unwrap();

        let schema = ColorSchema::parse(
            r##"{ "flavors": { "mocha": { "mode": "dark",
                "palette": { "base": "#1e1e2e" },
                "accents": { "blue": "#89b4fa", "red": "#f38ba8" } } } }"##,
        )
        .unwrap();
        (dir, schema)
    }

    fn tool() -> FakeTool {
        let mut resources = BTreeMap::new();
        resources.insert(
            format!("{RESOURCE_PREFIX}/gnome-shell-dark.css"),
            b"stock css".to_vec(),
        );
        resources.insert(
            format!("{RESOURCE_PREFIX}/icons/scalable/actions/pointer.svg"),
            b"<svg/>".to_vec(),
        );
        resources.insert("/org/other/ignored.txt".to_string(), b"x".to_vec());
        FakeTool {
            resources,
            ..FakeTool::default()
        }
    }

    #[test]
    fn install_rebuilds_bundle_from_first_request() {
        let (dir, schema) = fixture();
        let workspace = Workspace::create(Some(dir.path())).unwrap();
        let template = TemplateBuilder::new("gnome-shell", dir.path().join("theme/gnome-shell"))
            .prepare(&workspace)
            .unwrap();
        let installer = ThemeInstaller::new(&schema, &template, dir.path().join("themes"));
        let gdm = GlobalTheme::new(dir.path().join("shell"), tool());

        let requests = vec![
            InstallRequest::Palette {
                flavor: "mocha".into(),
                accent: "blue".into(),
            },
            InstallRequest::Palette {
                flavor: "mocha".into(),
                accent: "red".into(),
            },
        ];
        gdm.install(&installer, &requests, &workspace).unwrap();

        assert_eq!(fs::read(gdm.backup_path()).unwrap(), b"stock");
        assert_eq!(fs::read(gdm.gresource_path()).unwrap(), b"compiled");

        let (xml, css) = gdm.tool.compiled.borrow().clone().unwrap();
        assert!(xml.contains("<gresource prefix=\"/org/gnome/shell/theme\">"));
        assert!(xml.contains("<file>gnome-shell-dark.css</file>"));
        assert!(xml.contains("<file>gnome-shell.css</file>"));
        assert!(xml.contains("<file>icons/scalable/actions/pointer.svg</file>"));
        assert!(!xml.contains("ignored.txt"));
        assert!(css[0].contains("#89b4fa"));
        assert!(!css[0].contains("#f38ba8"));

        assert!(!dir.path().join("themes").exists());
    }

    #[test]
    fn install_without_requests_fails() {
        let (dir, schema) = fixture();
        let workspace = Workspace::create(Some(dir.path())).unwrap();
        let template = TemplateBuilder::new("gnome-shell", dir.path().join("theme/gnome-shell"))
            .prepare(&workspace)
            .unwrap();
        let installer = ThemeInstaller::new(&schema, &template, dir.path().join("themes"));
        let gdm = GlobalTheme::new(dir.path().join("shell"), tool());

        let err = gdm.install(&installer, &[], &workspace).unwrap_err();
        assert!(matches!(err, ThemeError::NothingRequested));
        assert!(!gdm.backup_path().exists());
    }

    #[test]
    fn remove_restores_backup() {
        let (dir, _) = fixture();
        let gdm = GlobalTheme::new(dir.path().join("shell"), tool());
        assert!(!gdm.remove().unwrap());

        fs::write(gdm.backup_path(), b"stock").unwrap();
        fs::write(gdm.gresource_path(), b"marble").unwrap();

        assert!(gdm.remove().unwrap());
        assert_eq!(fs::read(gdm.gresource_path()).unwrap(), b"stock");
        assert!(!gdm.backup_path().exists());
    }

    #[test]
    fn manifest_escapes_file_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a&b.svg"), "").unwrap();
        let xml = gresource_manifest(dir.path()).unwrap();
        assert!(xml.contains("<file>a&amp;b.svg</file>"));
    }
}
