//! Torrent labelling plugin for Riptide.
//!
//! Lets the user group torrents under named labels. Labels persist as a
//! JSON list inside the host's config directory. Also serves as the
//! in-tree reference for the plugin-author side of the SDK contract.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use riptide_plugin_sdk::prelude::*;

const DEFAULT_LABELS: &[&str] = &["Movies", "Music", "Software"];

pub struct LabelPlugin {
    host: HostRef,
    labels: Vec<String>,
    active: bool,
}

impl LabelPlugin {
    pub fn new(host: HostRef) -> Self {
        Self {
            host,
            labels: Vec::new(),
            active: false,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn store_path(&self) -> PathBuf {
        self.host.services().config_dir().join("labels.json")
    }
}

impl Plugin for LabelPlugin {
    fn name(&self) -> String {
        "Label".to_string()
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn config_window(&self) -> Option<ConfigWindowDescriptor> {
        Some(ConfigWindowDescriptor {
            title: "Labels".to_string(),
            width: 420,
            height: 280,
        })
    }

    fn load(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }
        let store = self.store_path();
        self.labels = if store.exists() {
            serde_json::from_str(&fs::read_to_string(&store)?)?
        } else {
            DEFAULT_LABELS.iter().map(|label| label.to_string()).collect()
        };
        self.active = true;
        Ok(())
    }

    fn unload(&mut self) -> Result<()> {
        self.active = false;
        Ok(())
    }
}

declare_riptide_plugins!(LabelPlugin::new);
