//! Test utilities for building project fixtures and reading bundles back.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Contents of the fixture's plugin entry file.
pub const ENTRY_FILE_CONTENTS: &str = "<?php\n/**\n * Plugin Name: Test Plugin\n * Version: %%VERSION%%\n */\n";

/// Populates `root` with a small plugin project.
///
/// Layout:
///
/// ```text
/// test_plugin.php
/// deleteme/tmp.txt
/// dist/app.js.map
/// dist/style.css.map
/// dist/assets/css_asset.css
/// dist/assets/css_asset.min.css
/// dist/assets/js_asset.min.js
/// src/src_file.vue
/// src/deleteme/tmp.txt
/// src/child/b.vue.txt
/// src/child/grandchild/some_file.vue
/// src/child/grandchild/deleteme/tmp.txt
/// ```
pub fn create_plugin_fixture(root: &Path) {
    let files: [(&str, &str); 12] = [
        ("test_plugin.php", ENTRY_FILE_CONTENTS),
        ("deleteme/tmp.txt", "tmp"),
        ("dist/app.js.map", "{}"),
        ("dist/style.css.map", "{}"),
        ("dist/assets/css_asset.css", "body { color: red; }"),
        ("dist/assets/css_asset.min.css", "body{color:red}"),
        ("dist/assets/js_asset.min.js", "console.log(1)"),
        ("src/src_file.vue", "<template></template>"),
        ("src/deleteme/tmp.txt", "tmp"),
        ("src/child/b.vue.txt", "notes"),
        ("src/child/grandchild/some_file.vue", "<template></template>"),
        ("src/child/grandchild/deleteme/tmp.txt", "tmp"),
    ];

    for (relative, contents) in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
}

/// Reads every entry of a ZIP archive.
///
/// Directory entries map to `None`, files to their contents.
pub fn read_zip_entries(path: &Path) -> BTreeMap<String, Option<Vec<u8>>> {
    let file = File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entries = BTreeMap::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let name = entry.name().to_owned();
        if entry.is_dir() {
            entries.insert(name, None);
        } else {
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).unwrap();
            entries.insert(name, Some(contents));
        }
    }

    entries
}

/// Returns the entry names of a ZIP archive in archive order.
pub fn zip_entry_names(path: &Path) -> Vec<String> {
    let file = File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_owned())
        .collect()
}
