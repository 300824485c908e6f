//! Build tooling for Prism OFX plugins.
//!
//! Usage: cargo xtask bundle <package> [--release] [--install]

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Plugin packages and the library names their cdylibs build under.
const PLUGINS: &[(&str, &str)] = &[
    ("prism-plugin-colorspace", "ColorSpace"),
    ("prism-plugin-display", "Display"),
    ("prism-plugin-displayview", "DisplayView"),
    ("prism-plugin-filetransform", "FileTransform"),
];

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 || args[1] != "bundle" {
        print_usage();
        std::process::exit(1);
    }

    let package = &args[2];
    let release = args.iter().any(|a| a == "--release");
    let install = args.iter().any(|a| a == "--install");

    if let Err(e) = bundle(package, release, install) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: cargo xtask bundle <package> [--release] [--install]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  bundle    Build a plugin and lay it out as an .ofx.bundle");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --release    Build in release mode");
    eprintln!("  --install    Install to the user OFX plugin directory");
    eprintln!();
    eprintln!("Packages:");
    for (package, _) in PLUGINS {
        eprintln!("  {}", package);
    }
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  cargo xtask bundle prism-plugin-colorspace --release --install");
    eprintln!("  cargo xtask bundle colorspace");
}

fn bundle(package: &str, release: bool, install: bool) -> Result<(), String> {
    let (package, lib_name) = resolve_plugin(package)?;

    println!("Bundling {} (release: {})...", package, release);

    let workspace_root = get_workspace_root()?;

    println!("Building...");
    let mut cmd = Command::new("cargo");
    cmd.arg("build")
        .arg("-p")
        .arg(package)
        .current_dir(&workspace_root);

    if release {
        cmd.arg("--release");
    }

    let status = cmd.status().map_err(|e| format!("Failed to run cargo: {}", e))?;
    if !status.success() {
        return Err("Build failed".to_string());
    }

    let profile = if release { "release" } else { "debug" };
    let target_dir = workspace_root.join("target").join(profile);

    let dylib_name = format!("{}{}{}", DLL_PREFIX, lib_name, DLL_SUFFIX);
    let dylib_path = target_dir.join(&dylib_name);

    if !dylib_path.exists() {
        return Err(format!("Built library not found: {}", dylib_path.display()));
    }

    // OFX bundle layout: Name.ofx.bundle/Contents/<arch>/Name.ofx
    let bundle_name = format!("{}.ofx.bundle", lib_name);
    let bundle_dir = target_dir.join(&bundle_name);
    let contents_dir = bundle_dir.join("Contents");
    let arch_dir = contents_dir.join(ofx_arch_dir());

    println!("Creating OFX bundle at {}...", bundle_dir.display());

    if bundle_dir.exists() {
        fs::remove_dir_all(&bundle_dir)
            .map_err(|e| format!("Failed to remove old bundle: {}", e))?;
    }

    fs::create_dir_all(&arch_dir).map_err(|e| format!("Failed to create arch dir: {}", e))?;

    let plugin_binary = arch_dir.join(format!("{}.ofx", lib_name));
    fs::copy(&dylib_path, &plugin_binary)
        .map_err(|e| format!("Failed to copy plugin library: {}", e))?;

    if cfg!(target_os = "macos") {
        let info_plist = create_info_plist(package, lib_name);
        fs::write(contents_dir.join("Info.plist"), info_plist)
            .map_err(|e| format!("Failed to write Info.plist: {}", e))?;
        fs::write(contents_dir.join("PkgInfo"), "BNDL????")
            .map_err(|e| format!("Failed to write PkgInfo: {}", e))?;
    }

    println!("OFX bundle created: {}", bundle_dir.display());

    if install {
        install_bundle(&bundle_dir, &bundle_name)?;
    }

    Ok(())
}

/// Accepts either the full package name or its short suffix, so
/// `cargo xtask bundle colorspace` works too.
fn resolve_plugin(name: &str) -> Result<(&'static str, &'static str), String> {
    for (package, lib_name) in PLUGINS {
        if name == *package || Some(name) == package.strip_prefix("prism-plugin-") {
            return Ok((package, lib_name));
        }
    }
    Err(format!("Unknown plugin package: {}", name))
}

/// The architecture directory name the OFX bundle layout prescribes.
fn ofx_arch_dir() -> &'static str {
    if cfg!(target_os = "macos") {
        "MacOS"
    } else if cfg!(target_os = "windows") {
        "Win64"
    } else {
        "Linux-x86-64"
    }
}

fn get_workspace_root() -> Result<PathBuf, String> {
    let output = Command::new("cargo")
        .args(["locate-project", "--workspace", "--message-format=plain"])
        .output()
        .map_err(|e| format!("Failed to locate workspace: {}", e))?;

    if !output.status.success() {
        return Err("Failed to locate workspace".to_string());
    }

    let cargo_toml = String::from_utf8_lossy(&output.stdout);
    let path = PathBuf::from(cargo_toml.trim());
    path.parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| "Invalid workspace path".to_string())
}

fn create_info_plist(package: &str, lib_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleDevelopmentRegion</key>
    <string>English</string>
    <key>CFBundleExecutable</key>
    <string>{lib_name}.ofx</string>
    <key>CFBundleIdentifier</key>
    <string>org.prism.{package}</string>
    <key>CFBundleInfoDictionaryVersion</key>
    <string>6.0</string>
    <key>CFBundleName</key>
    <string>{lib_name}</string>
    <key>CFBundlePackageType</key>
    <string>BNDL</string>
    <key>CFBundleSignature</key>
    <string>????</string>
    <key>CFBundleVersion</key>
    <string>0.1.0</string>
    <key>CFBundleShortVersionString</key>
    <string>0.1.0</string>
</dict>
</plist>
"#,
        lib_name = lib_name,
        package = package
    )
}

/// The per-user OFX plugin directory for the running platform.
fn user_plugin_dir() -> Result<PathBuf, String> {
    if cfg!(target_os = "macos") {
        let home = std::env::var("HOME").map_err(|_| "HOME not set")?;
        Ok(PathBuf::from(home).join("Library").join("OFX").join("Plugins"))
    } else if cfg!(target_os = "windows") {
        let program_files =
            std::env::var("CommonProgramFiles").map_err(|_| "CommonProgramFiles not set")?;
        Ok(PathBuf::from(program_files).join("OFX").join("Plugins"))
    } else {
        let home = std::env::var("HOME").map_err(|_| "HOME not set")?;
        Ok(PathBuf::from(home).join(".OFX").join("Plugins"))
    }
}

fn install_bundle(bundle_dir: &Path, bundle_name: &str) -> Result<(), String> {
    let plugin_dir = user_plugin_dir()?;

    fs::create_dir_all(&plugin_dir)
        .map_err(|e| format!("Failed to create plugin dir: {}", e))?;

    let dest = plugin_dir.join(bundle_name);

    if dest.exists() {
        fs::remove_dir_all(&dest)
            .map_err(|e| format!("Failed to remove old installation: {}", e))?;
    }

    copy_dir_all(bundle_dir, &dest)?;

    println!("Installed to: {}", dest.display());
    Ok(())
}

fn copy_dir_all(src: &Path, dst: &Path) -> Result<(), String> {
    fs::create_dir_all(dst).map_err(|e| format!("Failed to create dir: {}", e))?;

    for entry in fs::read_dir(src).map_err(|e| format!("Failed to read dir: {}", e))? {
        let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
        let ty = entry
            .file_type()
            .map_err(|e| format!("Failed to get file type: {}", e))?;

        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if ty.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)
                .map_err(|e| format!("Failed to copy file: {}", e))?;
        }
    }

    Ok(())
}
