use std::collections::{BTreeMap, BTreeSet};

use crate::render::escape_text;

/// The page a controller renders into: named containers whose HTML is
/// replaced wholesale on every render, plus which modals are showing.
#[derive(Debug, Default, Clone)]
pub struct Document {
    containers: BTreeMap<String, String>,
    open_modals: BTreeSet<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_html(&mut self, id: &str, html: impl Into<String>) {
        self.containers.insert(id.to_string(), html.into());
    }

    /// Like `textContent =`: the value is escaped before it is stored.
    pub fn set_text(&mut self, id: &str, text: &str) {
        self.set_html(id, escape_text(text));
    }

    pub fn html(&self, id: &str) -> Option<&str> {
        self.containers.get(id).map(String::as_str)
    }

    pub fn containers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.containers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn open_modal(&mut self, id: &str) {
        self.open_modals.insert(id.to_string());
    }

    pub fn close_modal(&mut self, id: &str) {
        self.open_modals.remove(id);
    }

    pub fn is_modal_open(&self, id: &str) -> bool {
        self.open_modals.contains(id)
    }
}
